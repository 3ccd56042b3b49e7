//! Fuzz test for the result blob parser
//!
//! Feeds arbitrary UTF-8 to the parser. It must never panic, must never
//! register an identity key, and must account for every non-blank line.
//!
//! Run with: cargo +nightly fuzz run record_parser_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use rqboard_core::{IdentityKey, MetadataRegistry};
use rqboard_records::parse_with_report;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut registry = MetadataRegistry::seeded();
        let seeded = registry.len();
        let report = parse_with_report(input, &mut registry);

        for key in IdentityKey::ALL {
            assert!(!registry.contains(key.as_str()), "identity key registered: {}", key);
        }
        assert_eq!(registry.len(), seeded + report.registered.len());

        // Issues point at real, non-blank lines.
        let lines: Vec<&str> = input.lines().collect();
        for issue in &report.issues {
            assert!(issue.line_number >= 1 && issue.line_number <= lines.len());
            assert!(!lines[issue.line_number - 1].trim().is_empty());
        }

        // A second parse registers nothing new.
        let again = parse_with_report(input, &mut registry);
        assert!(again.registered.is_empty());
    }
});
