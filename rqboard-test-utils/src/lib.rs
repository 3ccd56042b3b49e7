//! RQBOARD Test Utilities
//!
//! Centralized test infrastructure for the RQBOARD workspace:
//! - Proptest generators for blob lines, outcome tokens, and result entries
//! - Fixtures for the result blobs and comparison documents seen in production
//! - Assertions on cell descriptors

pub use rqboard_core::{
    ArchitectureResultEntry, CategoryMeta, CategoryType, CellDescriptor, DashboardConfig,
    EvidenceUrl, FileRef, IdentityKey, LogLocation, MetadataRegistry, Outcome, OutcomeMap,
    PassedFlag, ResultDetails, StatusTier,
};

use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

/// PR blob with one passing unit-test category.
pub const UNIT_TEST_BLOB: &str = "UNIT_TEST_RESULTS;passed\nBASE_IB;CMSSW_12_0_X_2024-01-01-1100\nPR_NUMBER;12345\nBUILD_NUMBER;7\n";

/// PR blob introducing a new category with every label supplied.
pub const FOO_ERROR_BLOB: &str =
    "FOO_CHECK;ERROR,Foo Check,See Foo Log,foo.log\nPR_NUMBER;12345\nBUILD_NUMBER;7\n";

/// Second blob of a session that re-announces `FOO_CHECK` with another label.
pub const FOO_PASSED_BLOB: &str = "FOO_CHECK;passed,Different Label\nPR_NUMBER;12346\nBUILD_NUMBER;8\n";

/// A blob touching every pending state and the baseline comparison.
pub const MIXED_BLOB: &str = "\
PR_NUMBER;4242
ADDITIONAL_PRS;100,200
BASE_IB;CMSSW_12_0_X_2024-01-01-1100
BUILD_NUMBER;3
COMPILATION_RESULTS;passed
UNIT_TEST_RESULTS;ERROR
MATRIX_TESTS;RUNNING
ADDON_TESTS;QUEUED
CLANG_COMPILATION_RESULTS;NOTRUN
COMPARISON;5021
";

/// Build log path on the production log server.
pub fn build_log_path(arch: &str, release: &str) -> String {
    format!("/data/sdt/buildlogs/{arch}/www/tue/12.0-tue-11/{release}/logAnalysis.pkl")
}

/// Relval summary path on the production log server.
pub fn relval_log_path(arch: &str, release: &str) -> String {
    format!(
        "/data/sdt/buildlogs/{arch}/www/tue/12.0-tue-11/{release}/pyRelValMatrixLogs/run/runall-report-step123-.log"
    )
}

/// An architecture entry whose file resolves against the default marker.
pub fn entry(arch: &str, passed: PassedFlag, file: &str, details: ResultDetails) -> ArchitectureResultEntry {
    ArchitectureResultEntry {
        architecture: arch.to_string(),
        passed,
        file: FileRef::from_path(file, "www"),
        details,
        done: None,
    }
}

/// Comparison document with one architecture and every column filled.
pub fn comparison_json(current: &str, arch: &str) -> String {
    let build = build_log_path(arch, current);
    let relval = relval_log_path(arch, current);
    serde_json::json!({
        "compared_tags": format!("CMSSW_12_0_X_2024-01-01-1100-->{current}"),
        "tests_archs": [arch],
        "builds": [{"arch": arch, "passed": "warning", "file": build, "details": {"compWarning": 3, "linkWarning": "1"}}],
        "utests": [{"arch": arch, "passed": "failed", "file": build, "details": {"num_fails": "2"}}],
        "relvals": [{"arch": arch, "passed": false, "file": relval, "done": false,
                     "details": {"num_passed": 3, "num_failed": 1}}],
        "addons": [{"arch": arch, "passed": true, "file": build}],
        "fwlite": [{"arch": arch, "passed": "passed", "file": "not-ready"}],
        "cmsdistTags": {arch: format!("IB/{current}/{arch}")},
        "merged_prs": [{"number": 4711, "title": "Fix tracking", "author_login": "dev",
                        "url": "https://github.com/cms-sw/cmssw/pull/4711"}],
        "comp_baseline": "https://cmssdt.cern.ch/SDT/jenkins-artifacts/ib-baseline-tests/x",
        "comp_baseline_state": "ok",
        "dqm_tests": "found",
        "hlt_tests": "inprogress",
        "static_checks": "slc7_amd64_gcc900:reports/extra.txt:",
        "RVExceptions": false
    })
    .to_string()
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Category keys: upper-case words joined by `_`, never an identity key.
pub fn arb_category_key() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{1,8}(_[A-Z0-9]{1,8}){0,3}"
        .prop_filter("identity keys are reserved", |k| IdentityKey::from_key(k).is_none())
}

/// Any outcome token a producer writes, including the empty value.
pub fn arb_outcome_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("NOTRUN".to_string()),
        Just("QUEUED".to_string()),
        Just("RUNNING".to_string()),
        Just("ERROR".to_string()),
        Just("passed".to_string()),
        "[0-9]{1,6}",
        "[a-z]{1,10}",
    ]
}

/// Label text without the blob's separators.
pub fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ._-]{0,20}"
}

/// A well-formed category line in any of the four shapes.
pub fn arb_category_line() -> impl Strategy<Value = String> {
    (
        arb_category_key(),
        arb_outcome_token(),
        prop::option::of(arb_label()),
        prop::option::of(arb_label()),
        prop::option::of(arb_label()),
    )
        .prop_map(|(key, value, label, secondary, location)| {
            let mut line = format!("{key};{value}");
            let optional = [label, secondary, location];
            let present = optional.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
            for field in optional.iter().take(present) {
                line.push(',');
                line.push_str(field.as_deref().unwrap_or_default());
            }
            line
        })
}

/// Lines a broken producer might emit: no separator, no key, whitespace.
pub fn arb_noise_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,20}",
        ";[a-z]{0,10}",
        Just("   ".to_string()),
    ]
}

/// A result blob mixing well-formed lines, identity lines, and noise.
pub fn arb_blob() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        6 => arb_category_line(),
        1 => arb_noise_line(),
        1 => "[0-9]{1,6}".prop_map(|n| format!("PR_NUMBER;{n}")),
        1 => "[0-9]{1,3}".prop_map(|n| format!("BUILD_NUMBER;{n}")),
    ];
    prop::collection::vec(line, 0..30).prop_map(|lines| lines.join("\n"))
}

/// `passed` values as the producers write them.
pub fn arb_passed_flag() -> impl Strategy<Value = PassedFlag> {
    prop_oneof![
        any::<bool>().prop_map(PassedFlag::Bool),
        Just(PassedFlag::Text("passed".to_string())),
        Just(PassedFlag::Text("failed".to_string())),
        Just(PassedFlag::Text("warning".to_string())),
        Just(PassedFlag::Text("error".to_string())),
        "[a-z]{1,8}".prop_map(PassedFlag::Text),
        "[0-9]{1,3}".prop_map(PassedFlag::Unrecognized),
    ]
}

pub fn arb_details() -> impl Strategy<Value = ResultDetails> {
    let counter = || prop::option::of(0u64..500);
    (
        (counter(), counter(), counter(), counter()),
        (counter(), counter(), counter()),
        (counter(), counter(), counter()),
    )
        .prop_map(
            |(
                (num_fails, num_passed, num_failed, known_failed),
                (comp_warning, link_warning, misc_warning),
                (comp_error, link_error, misc_error),
            )| ResultDetails {
                num_fails,
                num_passed,
                num_failed,
                known_failed,
                comp_warning,
                link_warning,
                misc_warning,
                comp_error,
                link_error,
                misc_error,
            },
        )
}

/// Entries for `arch` with any flag, file state, and progress marker.
pub fn arb_entry(arch: String) -> impl Strategy<Value = ArchitectureResultEntry> {
    (
        arb_passed_flag(),
        prop_oneof![
            Just("not-ready".to_string()),
            Just(build_log_path(&arch, "CMSSW_12_0_X_2024-01-01-1100")),
            Just("odd/path.log".to_string()),
        ],
        arb_details(),
        prop::option::of(any::<bool>()),
    )
        .prop_map(move |(passed, file, details, done)| ArchitectureResultEntry {
            architecture: arch.clone(),
            passed,
            file: FileRef::from_path(&file, "www"),
            details,
            done,
        })
}

pub fn arb_category_type() -> impl Strategy<Value = CategoryType> {
    prop_oneof![
        Just(CategoryType::Builds),
        Just(CategoryType::UnitTests),
        Just(CategoryType::GpuUnitTests),
        Just(CategoryType::RelVals),
        Just(CategoryType::AddOns),
        Just(CategoryType::FwLite),
        Just(CategoryType::Other),
    ]
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Assert the descriptor is renderable: label and text present.
pub fn assert_renderable(cell: &CellDescriptor) {
    assert!(!cell.primary_label.is_empty(), "cell has no primary label: {cell:?}");
    assert!(!cell.display_text.is_empty(), "cell has no display text: {cell:?}");
}

/// Assert the descriptor links to exactly `url`.
pub fn assert_links_to(cell: &CellDescriptor, url: &str) {
    assert_eq!(
        cell.evidence_url,
        EvidenceUrl::Link(url.to_string()),
        "unexpected evidence url for {}",
        cell.primary_label
    );
}
