//! Integration tests for the result blob parser
//!
//! Tests verify:
//! - All four line shapes share one code path
//! - First-write-wins registration across blobs of one session
//! - Malformed lines are reported, never fatal
//! - Identity keys stay out of the registry

use rqboard_core::{IdentityKey, MetadataRegistry, Outcome, RecordIssueKind};
use rqboard_records::{parse, parse_with_report, split_line, RecordLine, RecordShape};
use rqboard_test_utils::{FOO_ERROR_BLOB, FOO_PASSED_BLOB, MIXED_BLOB, UNIT_TEST_BLOB};

#[test]
fn unit_test_blob_uses_seeded_metadata() {
    let mut registry = MetadataRegistry::seeded();
    let before = registry.len();
    let report = parse_with_report(UNIT_TEST_BLOB, &mut registry);

    assert!(report.registered.is_empty());
    assert!(report.issues.is_empty());
    assert_eq!(registry.len(), before);
    assert_eq!(report.outcomes.outcome("UNIT_TEST_RESULTS"), Some(&Outcome::Success));
    assert_eq!(report.outcomes.base_ib(), "CMSSW_12_0_X_2024-01-01-1100");
}

#[test]
fn second_blob_cannot_relabel() {
    let mut registry = MetadataRegistry::new();
    let first = parse(FOO_ERROR_BLOB, &mut registry);
    let second = parse(FOO_PASSED_BLOB, &mut registry);

    let meta = registry.get("FOO_CHECK").unwrap();
    assert_eq!(meta.primary_label, "Foo Check");
    assert_eq!(meta.secondary_label, "See Foo Log");
    assert_eq!(meta.evidence_location, "foo.log");
    assert_eq!(first.outcome("FOO_CHECK"), Some(&Outcome::Error));
    assert_eq!(second.outcome("FOO_CHECK"), Some(&Outcome::Success));
}

#[test]
fn shapes_are_read_from_field_count() {
    let shapes: Vec<RecordShape> = ["A;passed", "A;passed,L", "A;passed,L,S", "A;passed,L,S,x.log"]
        .iter()
        .map(|line| match split_line(line) {
            Ok(RecordLine::Category(category)) => category.shape(),
            other => panic!("unexpected split: {other:?}"),
        })
        .collect();
    assert_eq!(
        shapes,
        vec![
            RecordShape::Bare,
            RecordShape::Labelled,
            RecordShape::Described,
            RecordShape::Located
        ]
    );
}

#[test]
fn mixed_blob_keeps_every_state() {
    let mut registry = MetadataRegistry::seeded();
    let map = parse(MIXED_BLOB, &mut registry);

    assert_eq!(map.outcome("COMPILATION_RESULTS"), Some(&Outcome::Success));
    assert_eq!(map.outcome("UNIT_TEST_RESULTS"), Some(&Outcome::Error));
    assert_eq!(map.outcome("MATRIX_TESTS"), Some(&Outcome::Running));
    assert_eq!(map.outcome("ADDON_TESTS"), Some(&Outcome::Queued));
    assert_eq!(map.outcome("CLANG_COMPILATION_RESULTS"), Some(&Outcome::NotRun));
    assert_eq!(
        map.outcome("COMPARISON"),
        Some(&Outcome::VariantToken("5021".to_string()))
    );
    assert_eq!(map.additional_prs(), vec!["100", "200"]);
    assert_eq!(map.identity(IdentityKey::AdditionalPrs), Some("100,200"));
}

#[test]
fn malformed_lines_do_not_stop_the_parse() {
    let mut registry = MetadataRegistry::new();
    let blob = "GOOD_ONE;passed\nthis line has no separator\n;orphan value\nEMPTY;\nGOOD_TWO;ERROR\n";
    let report = parse_with_report(blob, &mut registry);

    let kinds: Vec<RecordIssueKind> = report.issues.iter().map(|issue| issue.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RecordIssueKind::MissingSeparator,
            RecordIssueKind::MissingKey,
            RecordIssueKind::MissingValue
        ]
    );
    assert_eq!(report.outcomes.outcome("GOOD_ONE"), Some(&Outcome::Success));
    assert_eq!(report.outcomes.outcome("GOOD_TWO"), Some(&Outcome::Error));
    assert_eq!(report.outcomes.outcome("EMPTY"), None);
    assert_eq!(report.registered, vec!["GOOD_ONE", "EMPTY", "GOOD_TWO"]);
}

#[test]
fn identity_keys_are_never_registered() {
    let mut registry = MetadataRegistry::new();
    let blob = IdentityKey::ALL
        .iter()
        .map(|key| format!("{key};1,Label,See,x.log"))
        .collect::<Vec<_>>()
        .join("\n");
    let map = parse(&blob, &mut registry);

    assert!(registry.is_empty());
    assert_eq!(map.categories().count(), 0);
    assert_eq!(map.identity(IdentityKey::ComparisonIb), Some("1,Label,See,x.log"));
}
