//! Record parser for line-oriented result blobs
//!
//! Each non-blank line is `KEY;VALUE[,LABEL[,SECONDARY_LABEL[,EVIDENCE_PATH]]]`.
//! Older producers write only `KEY;VALUE`; newer ones append the labels that
//! describe a category the dashboard has never seen. Both shapes go through
//! the same path, distinguished only by how many fields a line carries.

use rqboard_core::{
    CategoryMeta, IdentityKey, MetadataRegistry, Outcome, OutcomeMap, RecordIssue,
    RecordIssueKind, DEFAULT_EVIDENCE_LOCATION, DEFAULT_SECONDARY_LABEL,
};

// ============================================================================
// RECORD LINES
// ============================================================================

/// How many optional fields a category line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordShape {
    /// `KEY;VALUE`
    Bare,
    /// `KEY;VALUE,LABEL`
    Labelled,
    /// `KEY;VALUE,LABEL,SECONDARY`
    Described,
    /// `KEY;VALUE,LABEL,SECONDARY,LOCATION`
    Located,
}

/// One parsed blob line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine<'a> {
    /// A reserved key; the whole remainder is its value.
    Identity { key: IdentityKey, value: &'a str },
    Category(CategoryLine<'a>),
}

/// A category line split into its fields. Empty optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLine<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub primary_label: Option<&'a str>,
    pub secondary_label: Option<&'a str>,
    pub evidence_location: Option<&'a str>,
}

impl<'a> CategoryLine<'a> {
    pub fn shape(&self) -> RecordShape {
        if self.evidence_location.is_some() {
            RecordShape::Located
        } else if self.secondary_label.is_some() {
            RecordShape::Described
        } else if self.primary_label.is_some() {
            RecordShape::Labelled
        } else {
            RecordShape::Bare
        }
    }

    /// Metadata for a first sighting of this category, defaults filled in.
    pub fn to_meta(&self) -> CategoryMeta {
        CategoryMeta::new(
            self.primary_label.unwrap_or(self.key),
            self.secondary_label.unwrap_or(DEFAULT_SECONDARY_LABEL),
            self.evidence_location.unwrap_or(DEFAULT_EVIDENCE_LOCATION),
        )
    }

    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::from_token(self.value)
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|f| !f.is_empty())
}

/// Split one trimmed, non-blank line.
///
/// The key ends at the first `;`. For category keys the remainder splits on
/// `,` into at most four fields; a location may itself contain commas.
pub fn split_line(line: &str) -> Result<RecordLine<'_>, RecordIssueKind> {
    let (key, rest) = line
        .split_once(';')
        .ok_or(RecordIssueKind::MissingSeparator)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(RecordIssueKind::MissingKey);
    }

    if let Some(identity) = IdentityKey::from_key(key) {
        return Ok(RecordLine::Identity {
            key: identity,
            value: rest.trim(),
        });
    }

    let mut fields = rest.splitn(4, ',');
    let value = fields.next().unwrap_or_default().trim();
    Ok(RecordLine::Category(CategoryLine {
        key,
        value,
        primary_label: non_empty(fields.next()),
        secondary_label: non_empty(fields.next()),
        evidence_location: non_empty(fields.next()),
    }))
}

// ============================================================================
// PARSER
// ============================================================================

/// Everything a parse produced, including the lines it could not use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub outcomes: OutcomeMap,
    /// Malformed lines, in blob order
    pub issues: Vec<RecordIssue>,
    /// Categories this parse added to the registry, in blob order
    pub registered: Vec<String>,
}

/// Parse a result blob, registering unseen categories in `registry`.
///
/// Never fails: malformed lines are logged and skipped.
pub fn parse(raw: &str, registry: &mut MetadataRegistry) -> OutcomeMap {
    parse_with_report(raw, registry).outcomes
}

/// Parse a result blob and keep the diagnostics.
pub fn parse_with_report(raw: &str, registry: &mut MetadataRegistry) -> ParseReport {
    let mut report = ParseReport::default();

    for (index, raw_line) in raw.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;

        let record = match split_line(line) {
            Ok(record) => record,
            Err(kind) => {
                tracing::warn!(line_number, %kind, "skipping malformed record line");
                report.issues.push(RecordIssue {
                    line_number,
                    kind,
                    line: line.to_string(),
                });
                continue;
            }
        };

        match record {
            RecordLine::Identity { key, value } => {
                report.outcomes.set_identity(key, value);
            }
            RecordLine::Category(category) => {
                if category.value.is_empty() {
                    tracing::warn!(line_number, key = category.key, "record line has no value");
                    report.issues.push(RecordIssue {
                        line_number,
                        kind: RecordIssueKind::MissingValue,
                        line: line.to_string(),
                    });
                }

                if registry.insert_if_absent(category.key, category.to_meta()) {
                    tracing::debug!(
                        key = category.key,
                        shape = ?category.shape(),
                        "registered new category"
                    );
                    report.registered.push(category.key.to_string());
                } else if category.primary_label.is_some() {
                    tracing::trace!(key = category.key, "category already registered, labels ignored");
                }

                report.outcomes.record(category.key, category.outcome());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bare_line() {
        let line = split_line("UNIT_TEST_RESULTS;passed").unwrap();
        let RecordLine::Category(category) = line else {
            panic!("expected category line");
        };
        assert_eq!(category.key, "UNIT_TEST_RESULTS");
        assert_eq!(category.value, "passed");
        assert_eq!(category.shape(), RecordShape::Bare);
    }

    #[test]
    fn test_split_located_line() {
        let line = split_line("FOO_CHECK;ERROR,Foo Check,See Foo Log,foo.log").unwrap();
        let RecordLine::Category(category) = line else {
            panic!("expected category line");
        };
        assert_eq!(category.primary_label, Some("Foo Check"));
        assert_eq!(category.secondary_label, Some("See Foo Log"));
        assert_eq!(category.evidence_location, Some("foo.log"));
        assert_eq!(category.shape(), RecordShape::Located);
    }

    #[test]
    fn test_split_location_keeps_commas() {
        let line = split_line("X;passed,L,S,a,b.log").unwrap();
        let RecordLine::Category(category) = line else {
            panic!("expected category line");
        };
        assert_eq!(category.evidence_location, Some("a,b.log"));
    }

    #[test]
    fn test_split_identity_keeps_commas() {
        let line = split_line("ADDITIONAL_PRS;100,200").unwrap();
        assert_eq!(
            line,
            RecordLine::Identity {
                key: IdentityKey::AdditionalPrs,
                value: "100,200"
            }
        );
    }

    #[test]
    fn test_split_errors() {
        assert_eq!(split_line("no separator"), Err(RecordIssueKind::MissingSeparator));
        assert_eq!(split_line(";passed"), Err(RecordIssueKind::MissingKey));
    }

    #[test]
    fn test_empty_label_fields_fall_back() {
        let line = split_line("NEW_CHECK;passed,,,").unwrap();
        let RecordLine::Category(category) = line else {
            panic!("expected category line");
        };
        let meta = category.to_meta();
        assert_eq!(meta.primary_label, "NEW_CHECK");
        assert_eq!(meta.secondary_label, "See Log");
        assert_eq!(meta.evidence_location, "unknown.log");
    }

    #[test]
    fn test_parse_skips_blank_and_malformed() {
        let mut registry = MetadataRegistry::new();
        let report = parse_with_report("\n  \nbroken line\nFOO;passed\n", &mut registry);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line_number, 3);
        assert_eq!(report.outcomes.outcome("FOO"), Some(&Outcome::Success));
    }

    #[test]
    fn test_parse_missing_value_records_absent() {
        let mut registry = MetadataRegistry::new();
        let report = parse_with_report("FOO;\n", &mut registry);
        assert_eq!(report.issues[0].kind, RecordIssueKind::MissingValue);
        assert_eq!(report.outcomes.outcome("FOO"), None);
        assert!(registry.contains("FOO"));
    }

    #[test]
    fn test_parse_identity_not_registered() {
        let mut registry = MetadataRegistry::new();
        let map = parse("PR_NUMBER;12345\nBUILD_NUMBER;7\n", &mut registry);
        assert!(registry.is_empty());
        assert_eq!(map.pr_number(), "12345");
        assert_eq!(map.build_number(), "7");
        assert_eq!(map.categories().count(), 0);
    }

    #[test]
    fn test_parse_reports_registrations() {
        let mut registry = MetadataRegistry::seeded();
        let report = parse_with_report("UNIT_TEST_RESULTS;passed\nNEW_CHECK;passed\n", &mut registry);
        assert_eq!(report.registered, vec!["NEW_CHECK".to_string()]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let mut registry = MetadataRegistry::new();
        let map = parse("FOO;passed\r\nPR_NUMBER;1\r\n", &mut registry);
        assert_eq!(map.outcome("FOO"), Some(&Outcome::Success));
        assert_eq!(map.pr_number(), "1");
    }
}
