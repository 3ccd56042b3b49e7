//! PR-summary row classification
//!
//! One blob becomes one row: a cell per registered category, in the order
//! the registry reports. The outcome decides the text and link of a cell;
//! the registry supplies labels and the evidence location.

use crate::links::LinkBuilder;
use rqboard_core::{
    CategoryMeta, CellDescriptor, ComparisonVariant, EvidenceUrl, Outcome, OutcomeMap,
    StatusTier, DEFAULT_SECONDARY_LABEL,
};

/// Classify the outcome of category `key` in `map`.
///
/// Total over every outcome: absent and pending outcomes get a placeholder
/// cell, comparison categories link to their results folder, everything
/// else links to the category's evidence log.
pub fn classify_outcome(
    key: &str,
    meta: &CategoryMeta,
    map: &OutcomeMap,
    links: &LinkBuilder<'_>,
) -> CellDescriptor {
    let outcome = map.outcome(key);
    let primary_label = if meta.primary_label.is_empty() {
        key.to_string()
    } else {
        meta.primary_label.clone()
    };

    let (display_text, evidence_url, tier) = match outcome {
        None | Some(Outcome::NotRun) => ("Not Run", EvidenceUrl::Placeholder, StatusTier::Default),
        Some(Outcome::Queued) => ("Queued", EvidenceUrl::Placeholder, StatusTier::Info),
        Some(Outcome::Running) => ("Running", EvidenceUrl::Placeholder, StatusTier::Primary),
        Some(settled) => {
            let variant = ComparisonVariant::from_category_key(key);
            let tier = match settled {
                Outcome::Error => StatusTier::Danger,
                Outcome::VariantToken(_) if variant.is_none() => StatusTier::Default,
                _ => StatusTier::Success,
            };
            let pr_number = map.pr_number();
            match variant {
                Some(variant) => (
                    variant.display_text(),
                    evidence_for(pr_number, || {
                        links.comparison_results(variant, map.base_ib(), pr_number, settled.as_token())
                    }),
                    tier,
                ),
                None => {
                    let text = if meta.secondary_label.is_empty() {
                        DEFAULT_SECONDARY_LABEL
                    } else {
                        meta.secondary_label.as_str()
                    };
                    (
                        text,
                        evidence_for(pr_number, || {
                            links.pr_evidence(pr_number, map.build_number(), &meta.evidence_location)
                        }),
                        tier,
                    )
                }
            }
        }
    };

    CellDescriptor {
        primary_label,
        display_text: display_text.to_string(),
        evidence_url,
        has_errors: outcome == Some(&Outcome::Error),
        tier,
    }
}

/// Evidence of a PR-path cell. Without a PR number no path can be formed.
fn evidence_for(pr_number: &str, url: impl FnOnce() -> String) -> EvidenceUrl {
    if pr_number.trim().is_empty() {
        EvidenceUrl::Unavailable
    } else {
        EvidenceUrl::Link(url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqboard_core::{DashboardConfig, IdentityKey};

    fn blob_map(outcome: Option<Outcome>) -> OutcomeMap {
        let mut map = OutcomeMap::new();
        map.set_identity(IdentityKey::PrNumber, "12345");
        map.set_identity(IdentityKey::BuildNumber, "7");
        map.set_identity(IdentityKey::BaseIb, "CMSSW_12_0_X_2024-01-01-1100");
        map.record("UNIT_TEST_RESULTS", outcome.clone());
        map.record("COMPARISON", outcome);
        map
    }

    fn unit_tests_meta() -> CategoryMeta {
        CategoryMeta::new("Unit Tests", "See Log", "unitTests.log")
    }

    #[test]
    fn test_pending_outcomes_are_placeholders() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let cases = [
            (None, "Not Run", StatusTier::Default),
            (Some(Outcome::NotRun), "Not Run", StatusTier::Default),
            (Some(Outcome::Queued), "Queued", StatusTier::Info),
            (Some(Outcome::Running), "Running", StatusTier::Primary),
        ];
        for (outcome, text, tier) in cases {
            let cell = classify_outcome("UNIT_TEST_RESULTS", &unit_tests_meta(), &blob_map(outcome), &links);
            assert_eq!(cell.display_text, text);
            assert_eq!(cell.evidence_url, EvidenceUrl::Placeholder);
            assert_eq!(cell.tier, tier);
            assert!(!cell.has_errors);
        }
    }

    #[test]
    fn test_error_outcome_links_and_flags() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let cell = classify_outcome(
            "UNIT_TEST_RESULTS",
            &unit_tests_meta(),
            &blob_map(Some(Outcome::Error)),
            &links,
        );
        assert!(cell.has_errors);
        assert_eq!(cell.tier, StatusTier::Danger);
        assert_eq!(cell.display_text, "See Log");
        assert_eq!(
            cell.evidence_url.as_href(),
            format!("{}PR-12345/7/unitTests.log", config.pr_results_root)
        );
    }

    #[test]
    fn test_comparison_token_is_path_segment() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let meta = CategoryMeta::new("Comparison with the baseline", "See Log", "unknown.log");
        let cell = classify_outcome(
            "COMPARISON",
            &meta,
            &blob_map(Outcome::from_token("5021")),
            &links,
        );
        assert_eq!(cell.display_text, "See Comparison Results");
        assert_eq!(
            cell.evidence_url.as_href(),
            format!(
                "{}CMSSW_12_0_X_2024-01-01-1100+12345/5021/",
                config.comparison_roots.baseline
            )
        );
        assert_eq!(cell.tier, StatusTier::Success);
    }

    #[test]
    fn test_unrecognised_token_is_neutral_outside_comparisons() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let cell = classify_outcome(
            "UNIT_TEST_RESULTS",
            &unit_tests_meta(),
            &blob_map(Outcome::from_token("maybe")),
            &links,
        );
        assert_eq!(cell.tier, StatusTier::Default);
        assert!(!cell.has_errors);
        assert!(cell.evidence_url.is_link());

        let passed = classify_outcome(
            "UNIT_TEST_RESULTS",
            &unit_tests_meta(),
            &blob_map(Some(Outcome::Success)),
            &links,
        );
        assert_eq!(passed.tier, StatusTier::Success);
    }

    #[test]
    fn test_missing_pr_number_has_no_link() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let mut map = OutcomeMap::new();
        map.set_identity(IdentityKey::BuildNumber, "7");
        map.record("UNIT_TEST_RESULTS", Some(Outcome::Error));
        map.record("COMPARISON", Outcome::from_token("5021"));

        let unit_tests = classify_outcome("UNIT_TEST_RESULTS", &unit_tests_meta(), &map, &links);
        assert_eq!(unit_tests.evidence_url, EvidenceUrl::Unavailable);
        assert!(unit_tests.has_errors);
        assert_eq!(unit_tests.tier, StatusTier::Danger);

        let meta = CategoryMeta::new("Comparison with the baseline", "See Log", "unknown.log");
        let comparison = classify_outcome("COMPARISON", &meta, &map, &links);
        assert_eq!(comparison.evidence_url, EvidenceUrl::Unavailable);
        assert_eq!(comparison.display_text, "See Comparison Results");
    }

    #[test]
    fn test_empty_labels_fall_back() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let meta = CategoryMeta::new("", "", "x.log");
        let cell = classify_outcome(
            "UNIT_TEST_RESULTS",
            &meta,
            &blob_map(Some(Outcome::Success)),
            &links,
        );
        assert_eq!(cell.primary_label, "UNIT_TEST_RESULTS");
        assert_eq!(cell.display_text, "See Log");
    }
}
