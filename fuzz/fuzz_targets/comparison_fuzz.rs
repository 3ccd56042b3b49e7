//! Fuzz test for comparison document decoding and table assembly
//!
//! Arbitrary bytes must decode to a comparison or a decode error, never a
//! panic. A decoded comparison always yields a full grid: one row per
//! architecture and one cell slot per column.
//!
//! Run with: cargo +nightly fuzz run comparison_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use rqboard_core::DashboardConfig;
use rqboard_matrix::MatrixBuilder;
use rqboard_records::decode_comparison;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(comparison) = decode_comparison(input, "www") else {
        return;
    };
    let Ok(builder) = MatrixBuilder::new(DashboardConfig::default()) else {
        return;
    };

    let table = builder.build_comparison_table(&comparison);
    assert_eq!(table.rows.len(), comparison.architectures.len());
    for row in &table.rows {
        assert_eq!(row.cells.len(), table.columns.len());
    }
    assert_eq!(table.merged.len(), comparison.merged_prs.len());
    assert_eq!(table.no_new_prs.is_some(), table.merged.is_empty());
});
