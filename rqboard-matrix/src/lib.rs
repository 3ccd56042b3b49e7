//! RQBOARD Matrix - Status Classifier & Matrix Builder
//!
//! Classifies parsed outcomes and architecture results into cell
//! descriptors and assembles them into rows and comparison tables:
//!
//! ```text
//! OutcomeMap + MetadataRegistry ──► build_row ──────────────► Vec<CellDescriptor>
//! Comparison ─────────────────────► build_comparison_table ─► ComparisonTable
//! ```
//!
//! Every operation is infallible; a cell that cannot be classified degrades
//! to a placeholder or "Unknown" instead of failing the render.

pub mod architecture;
pub mod links;
pub mod row;
pub mod summary;
pub mod table;

pub use architecture::{build_architecture_cell, describe_entry, ArchitectureVerdict};
pub use links::{LinkBuilder, TagLink};
pub use row::classify_outcome;
pub use summary::{HeaderLink, PrSummary};
pub use table::{
    build_comparison_table, build_release_queue, table_columns, ArchitectureRow, BuildProvenance,
    CheckReport, ComparisonTable, IbCheck, IbCheckLink, MergedItem, ReleaseQueueView,
};

use rqboard_core::{
    CategoryType, CellDescriptor, ConfigError, DashboardConfig, MetadataRegistry, OutcomeMap,
    ResultsByCategory,
};
use rqboard_records::Comparison;

// ============================================================================
// MATRIX BUILDER
// ============================================================================

/// Builds rows and tables against one validated configuration.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    config: DashboardConfig,
}

impl MatrixBuilder {
    /// Create a builder, validating the configuration first.
    pub fn new(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn links(&self) -> LinkBuilder<'_> {
        LinkBuilder::new(&self.config)
    }

    /// One cell per registered category, in the configured row order.
    pub fn build_row(&self, map: &OutcomeMap, registry: &MetadataRegistry) -> Vec<CellDescriptor> {
        let keys = registry.ordered_keys(self.config.row_order);
        self.build_row_for(map, registry, &keys)
    }

    /// One cell per key of `keys`, in that order. Keys the registry does not
    /// know are skipped.
    pub fn build_row_for(
        &self,
        map: &OutcomeMap,
        registry: &MetadataRegistry,
        keys: &[&str],
    ) -> Vec<CellDescriptor> {
        let links = self.links();
        let row: Vec<CellDescriptor> = keys
            .iter()
            .filter_map(|key| {
                let meta = registry.get(key);
                if meta.is_none() {
                    tracing::debug!(key, "skipping unregistered category");
                }
                meta.map(|meta| classify_outcome(key, meta, map, &links))
            })
            .collect();

        tracing::debug!(
            pr = map.pr_number(),
            build = map.build_number(),
            cells = row.len(),
            errors = row.iter().filter(|cell| cell.has_errors).count(),
            "built result row"
        );
        row
    }

    /// Header links and row of one PR test run.
    pub fn build_pr_summary(&self, map: &OutcomeMap, registry: &MetadataRegistry) -> PrSummary {
        let row = self.build_row(map, registry);
        PrSummary::new(map, row, &self.links())
    }

    /// Cell for one architecture and category type of IB `ib`.
    pub fn build_architecture_cell(
        &self,
        results: &ResultsByCategory,
        architecture: &str,
        category: CategoryType,
        ib: &str,
    ) -> Option<CellDescriptor> {
        build_architecture_cell(results, architecture, category, ib, &self.links())
    }

    pub fn build_comparison_table(&self, comparison: &Comparison) -> ComparisonTable {
        build_comparison_table(comparison, &self.links())
    }

    pub fn build_release_queue(&self, release_name: &str, comparisons: &[Comparison]) -> ReleaseQueueView {
        build_release_queue(release_name, comparisons, &self.links())
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
