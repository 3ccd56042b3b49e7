//! Architecture cell classification
//!
//! A comparison table shows one cell per (architecture, category type).
//! Each cell comes from the first entry of the category's result list that
//! names the architecture. Missing entries are blank cells, never errors.

use crate::links::LinkBuilder;
use rqboard_core::{
    ArchitectureResultEntry, CategoryType, CellDescriptor, PassedFlag, ResultsByCategory,
    StatusTier, Tally,
};
use serde::{Deserialize, Serialize};

/// Verdict of one architecture result, before it is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ArchitectureVerdict {
    Passed,
    /// Build finished with warnings only
    Warnings { count: u64 },
    /// Build failed
    Errors { count: u64 },
    TestsFailing { count: u64 },
    /// Finished relvals with failures
    RelvalsFailing { tally: Tally },
    /// Binary failure without counters
    Failed,
    /// Status word the rules do not know
    Unknown,
    /// The category has not finished. Relvals carry their running tally.
    Incomplete {
        progress: Option<Tally>,
        passing: bool,
    },
}

impl ArchitectureVerdict {
    /// Decide the verdict of `entry` under the rules of `category`.
    pub fn of(entry: &ArchitectureResultEntry, category: CategoryType) -> Self {
        let passing = entry.passed.is_truthy();

        // An explicit done:false on relvals wins over the not-ready file.
        if category == CategoryType::RelVals && entry.is_in_progress() {
            return ArchitectureVerdict::Incomplete {
                progress: Some(entry.details.tally()),
                passing,
            };
        }
        if entry.file.is_not_ready() {
            return ArchitectureVerdict::Incomplete {
                progress: None,
                passing,
            };
        }
        if matches!(entry.passed, PassedFlag::Unrecognized(_)) {
            return ArchitectureVerdict::Unknown;
        }

        match category {
            CategoryType::UnitTests | CategoryType::GpuUnitTests => {
                match entry.passed.as_status() {
                    "passed" => ArchitectureVerdict::Passed,
                    "failed" => ArchitectureVerdict::TestsFailing {
                        count: entry.details.num_fails.unwrap_or(0),
                    },
                    _ => ArchitectureVerdict::Unknown,
                }
            }
            CategoryType::Builds | CategoryType::FwLite => match entry.passed.as_status() {
                "passed" => ArchitectureVerdict::Passed,
                "warning" => ArchitectureVerdict::Warnings {
                    count: entry.details.warning_total(),
                },
                _ => ArchitectureVerdict::Errors {
                    count: entry.details.error_total(),
                },
            },
            CategoryType::RelVals if passing => ArchitectureVerdict::Passed,
            CategoryType::RelVals => ArchitectureVerdict::RelvalsFailing {
                tally: entry.details.tally(),
            },
            CategoryType::AddOns | CategoryType::Other if passing => ArchitectureVerdict::Passed,
            CategoryType::AddOns | CategoryType::Other => ArchitectureVerdict::Failed,
        }
    }

    pub fn tier(&self, category: CategoryType) -> StatusTier {
        match self {
            ArchitectureVerdict::Passed => StatusTier::Success,
            ArchitectureVerdict::Warnings { .. } => StatusTier::Warning,
            ArchitectureVerdict::Errors { .. }
            | ArchitectureVerdict::TestsFailing { .. }
            | ArchitectureVerdict::RelvalsFailing { .. }
            | ArchitectureVerdict::Failed => StatusTier::Danger,
            ArchitectureVerdict::Unknown => StatusTier::Default,
            ArchitectureVerdict::Incomplete { .. } => category.incomplete_tier(),
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            ArchitectureVerdict::Passed | ArchitectureVerdict::Failed => "See Details".to_string(),
            ArchitectureVerdict::Warnings { count } => format!("{count} Warnings"),
            ArchitectureVerdict::Errors { count } => format!("{count} Errors"),
            ArchitectureVerdict::TestsFailing { count } => format!("{count} Tests Failing"),
            ArchitectureVerdict::RelvalsFailing { tally } => {
                format!("Pass: {} Fail: {}", tally.passed, tally.failed)
            }
            ArchitectureVerdict::Unknown => "Unknown".to_string(),
            ArchitectureVerdict::Incomplete { progress: None, .. } => "Not complete".to_string(),
            ArchitectureVerdict::Incomplete {
                progress: Some(tally),
                passing: true,
            } => format!("Pass: {}", tally.passed),
            ArchitectureVerdict::Incomplete {
                progress: Some(tally),
                passing: false,
            } => format!("Pass: {} Fail: {}", tally.passed, tally.failed),
        }
    }
}

/// Cell for `architecture` in the `category` column of IB `ib`.
///
/// Returns `None` when the category has no entry for the architecture.
pub fn build_architecture_cell(
    results: &ResultsByCategory,
    architecture: &str,
    category: CategoryType,
    ib: &str,
    links: &LinkBuilder<'_>,
) -> Option<CellDescriptor> {
    let entry = results
        .get(&category)?
        .iter()
        .find(|entry| entry.architecture == architecture)?;
    Some(describe_entry(entry, category, ib, links))
}

/// Cell for one already-located entry.
pub fn describe_entry(
    entry: &ArchitectureResultEntry,
    category: CategoryType,
    ib: &str,
    links: &LinkBuilder<'_>,
) -> CellDescriptor {
    let verdict = ArchitectureVerdict::of(entry, category);
    CellDescriptor {
        primary_label: category.column_label().to_string(),
        display_text: verdict.display_text(),
        evidence_url: links.architecture_evidence(category, &entry.file, &entry.architecture, ib),
        has_errors: false,
        tier: verdict.tier(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqboard_core::{DashboardConfig, EvidenceUrl, FileRef, PassedFlag, ResultDetails};
    use rqboard_test_utils::{build_log_path, entry};

    const ARCH: &str = "slc7_amd64_gcc700";
    const IB: &str = "CMSSW_11_0_X_2019-09-17-2300";

    fn text(value: &str) -> PassedFlag {
        PassedFlag::Text(value.to_string())
    }

    fn located(passed: PassedFlag, details: ResultDetails) -> ArchitectureResultEntry {
        entry(ARCH, passed, &build_log_path(ARCH, IB), details)
    }

    #[test]
    fn test_unit_test_rules() {
        let details = ResultDetails {
            num_fails: Some(4),
            ..ResultDetails::default()
        };
        let failed = ArchitectureVerdict::of(&located(text("failed"), details), CategoryType::UnitTests);
        assert_eq!(failed, ArchitectureVerdict::TestsFailing { count: 4 });
        assert_eq!(failed.display_text(), "4 Tests Failing");
        assert_eq!(failed.tier(CategoryType::UnitTests), StatusTier::Danger);

        let odd = ArchitectureVerdict::of(&located(text("skipped"), ResultDetails::default()), CategoryType::UnitTests);
        assert_eq!(odd, ArchitectureVerdict::Unknown);
        assert_eq!(odd.tier(CategoryType::UnitTests), StatusTier::Default);

        let passed = ArchitectureVerdict::of(&located(text("passed"), ResultDetails::default()), CategoryType::GpuUnitTests);
        assert_eq!(passed.display_text(), "See Details");
    }

    #[test]
    fn test_build_warning_sums_counters() {
        let details = ResultDetails {
            comp_warning: Some(3),
            link_warning: Some(1),
            ..ResultDetails::default()
        };
        let verdict = ArchitectureVerdict::of(&located(text("warning"), details), CategoryType::Builds);
        assert_eq!(verdict, ArchitectureVerdict::Warnings { count: 4 });
        assert_eq!(verdict.display_text(), "4 Warnings");
        assert_eq!(verdict.tier(CategoryType::Builds), StatusTier::Warning);
    }

    #[test]
    fn test_huge_build_counters_saturate() {
        let details = ResultDetails {
            comp_warning: Some(u64::MAX),
            link_warning: Some(1),
            ..ResultDetails::default()
        };
        let verdict = ArchitectureVerdict::of(&located(text("warning"), details), CategoryType::Builds);
        assert_eq!(verdict, ArchitectureVerdict::Warnings { count: u64::MAX });
    }

    #[test]
    fn test_unrecognized_flag_is_unknown() {
        let flag = PassedFlag::Unrecognized("1".to_string());
        for category in [CategoryType::Builds, CategoryType::UnitTests, CategoryType::RelVals] {
            let verdict = ArchitectureVerdict::of(&located(flag.clone(), ResultDetails::default()), category);
            assert_eq!(verdict, ArchitectureVerdict::Unknown);
            assert_eq!(verdict.tier(category), StatusTier::Default);
        }
        let pending = entry(ARCH, flag, "not-ready", ResultDetails::default());
        assert!(matches!(
            ArchitectureVerdict::of(&pending, CategoryType::Builds),
            ArchitectureVerdict::Incomplete { .. }
        ));
    }

    #[test]
    fn test_build_error_defaults_missing_counters() {
        let details = ResultDetails {
            misc_error: Some(2),
            ..ResultDetails::default()
        };
        let verdict = ArchitectureVerdict::of(&located(text("error"), details), CategoryType::FwLite);
        assert_eq!(verdict.display_text(), "2 Errors");
        assert_eq!(verdict.tier(CategoryType::FwLite), StatusTier::Danger);
    }

    #[test]
    fn test_not_ready_tiers() {
        let mut not_ready = entry(ARCH, text("passed"), "not-ready", ResultDetails::default());
        let verdict = ArchitectureVerdict::of(&not_ready, CategoryType::Builds);
        assert_eq!(verdict.display_text(), "Not complete");
        assert_eq!(verdict.tier(CategoryType::Builds), StatusTier::Info);
        assert_eq!(verdict.tier(CategoryType::RelVals), StatusTier::Primary);

        not_ready.passed = PassedFlag::Bool(true);
        let verdict = ArchitectureVerdict::of(&not_ready, CategoryType::RelVals);
        assert_eq!(verdict, ArchitectureVerdict::Incomplete { progress: None, passing: true });
    }

    #[test]
    fn test_relvals_done_false_wins_over_not_ready() {
        let mut relvals = entry(
            ARCH,
            PassedFlag::Bool(true),
            "not-ready",
            ResultDetails {
                num_passed: Some(10),
                ..ResultDetails::default()
            },
        );
        relvals.done = Some(false);
        let verdict = ArchitectureVerdict::of(&relvals, CategoryType::RelVals);
        assert_eq!(verdict.display_text(), "Pass: 10");
        assert_eq!(verdict.tier(CategoryType::RelVals), StatusTier::Primary);
    }

    #[test]
    fn test_finished_relvals() {
        let details = ResultDetails {
            num_passed: Some(7),
            num_failed: Some(2),
            ..ResultDetails::default()
        };
        let mut relvals = located(PassedFlag::Bool(false), details);
        relvals.done = Some(true);
        let verdict = ArchitectureVerdict::of(&relvals, CategoryType::RelVals);
        assert_eq!(verdict.display_text(), "Pass: 7 Fail: 2");
        assert_eq!(verdict.tier(CategoryType::RelVals), StatusTier::Danger);
    }

    #[test]
    fn test_addons_are_binary() {
        let ok = ArchitectureVerdict::of(&located(PassedFlag::Bool(true), ResultDetails::default()), CategoryType::AddOns);
        let bad = ArchitectureVerdict::of(&located(PassedFlag::Bool(false), ResultDetails::default()), CategoryType::Other);
        assert_eq!(ok.tier(CategoryType::AddOns), StatusTier::Success);
        assert_eq!(bad.tier(CategoryType::Other), StatusTier::Danger);
        assert_eq!(bad.display_text(), "See Details");
    }

    #[test]
    fn test_missing_architecture_is_blank() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let mut results = ResultsByCategory::new();
        assert_eq!(build_architecture_cell(&results, ARCH, CategoryType::Builds, IB, &links), None);

        results.insert(CategoryType::Builds, Vec::new());
        assert_eq!(build_architecture_cell(&results, ARCH, CategoryType::Builds, IB, &links), None);

        results.insert(
            CategoryType::Builds,
            vec![entry("cc8_amd64_gcc8", text("passed"), "not-ready", ResultDetails::default())],
        );
        assert_eq!(build_architecture_cell(&results, ARCH, CategoryType::Builds, IB, &links), None);
    }

    #[test]
    fn test_cell_uses_first_matching_entry() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let mut results = ResultsByCategory::new();
        results.insert(
            CategoryType::Builds,
            vec![
                located(text("passed"), ResultDetails::default()),
                located(text("error"), ResultDetails::default()),
            ],
        );
        let cell = build_architecture_cell(&results, ARCH, CategoryType::Builds, IB, &links).unwrap();
        assert_eq!(cell.tier, StatusTier::Success);
        assert_eq!(cell.primary_label, "Builds");
        assert!(cell.evidence_url.as_href().starts_with(&config.log_server.build_logs));
    }

    #[test]
    fn test_unrecognized_file_still_renders() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let odd = entry(ARCH, text("passed"), "odd/path.log", ResultDetails::default());
        assert!(matches!(odd.file, FileRef::Unrecognized(_)));
        let cell = describe_entry(&odd, CategoryType::Builds, IB, &links);
        assert_eq!(cell.evidence_url, EvidenceUrl::Unavailable);
        assert_eq!(cell.display_text, "See Details");
    }
}
