//! Enum types for dashboard outcomes and cells

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Raw outcome of one category in a result blob, converted once at the
/// parse boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// `NOTRUN`
    NotRun,
    /// `QUEUED`
    Queued,
    /// `RUNNING`
    Running,
    /// `ERROR`
    Error,
    /// `passed`
    Success,
    /// Any other token. Comparison categories use it as a path segment
    /// (usually a build id).
    VariantToken(String),
}

impl Outcome {
    /// Convert a raw blob value. Returns `None` for an empty value, which the
    /// classifier treats exactly like an absent key.
    pub fn from_token(raw: &str) -> Option<Self> {
        let token = raw.trim();
        let outcome = match token {
            "" => return None,
            "NOTRUN" => Outcome::NotRun,
            "QUEUED" => Outcome::Queued,
            "RUNNING" => Outcome::Running,
            "ERROR" => Outcome::Error,
            crate::PASSED_TOKEN => Outcome::Success,
            other => Outcome::VariantToken(other.to_string()),
        };
        Some(outcome)
    }

    /// The token as it appeared in the blob.
    pub fn as_token(&self) -> &str {
        match self {
            Outcome::NotRun => "NOTRUN",
            Outcome::Queued => "QUEUED",
            Outcome::Running => "RUNNING",
            Outcome::Error => "ERROR",
            Outcome::Success => crate::PASSED_TOKEN,
            Outcome::VariantToken(token) => token,
        }
    }

    /// True while the check has not produced a verdict.
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::NotRun | Outcome::Queued | Outcome::Running)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

// ============================================================================
// STATUS TIERS
// ============================================================================

/// Visual tier of a cell. The renderer maps these to its own styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Success,
    Danger,
    Warning,
    /// Unfinished build or fwlite run
    Info,
    /// Unfinished relvals, running checks
    Primary,
    /// Not run, unknown
    #[default]
    Default,
}

impl StatusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Success => "success",
            StatusTier::Danger => "danger",
            StatusTier::Warning => "warning",
            StatusTier::Info => "info",
            StatusTier::Primary => "primary",
            StatusTier::Default => "default",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CATEGORY TYPES (comparison-table path)
// ============================================================================

/// Kind of per-architecture result list in a comparison document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Builds,
    UnitTests,
    GpuUnitTests,
    RelVals,
    AddOns,
    FwLite,
    Other,
}

impl CategoryType {
    /// Field name used in comparison documents.
    pub fn as_field(&self) -> &'static str {
        match self {
            CategoryType::Builds => "builds",
            CategoryType::UnitTests => "utests",
            CategoryType::GpuUnitTests => "gpu_utests",
            CategoryType::RelVals => "relvals",
            CategoryType::AddOns => "addons",
            CategoryType::FwLite => "fwlite",
            CategoryType::Other => "other",
        }
    }

    /// Column header shown above this category.
    pub fn column_label(&self) -> &'static str {
        match self {
            CategoryType::Builds => "Builds",
            CategoryType::UnitTests => "Unit Tests",
            CategoryType::GpuUnitTests => "GPU Unit Tests",
            CategoryType::RelVals => "RelVals",
            CategoryType::AddOns => "Other Tests",
            CategoryType::FwLite => "FWLite",
            CategoryType::Other => "Other",
        }
    }

    /// Tier used when the category has not finished yet.
    pub fn incomplete_tier(&self) -> StatusTier {
        match self {
            CategoryType::RelVals => StatusTier::Primary,
            _ => StatusTier::Info,
        }
    }
}

impl FromStr for CategoryType {
    type Err = CategoryTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "builds" => Ok(CategoryType::Builds),
            "utests" => Ok(CategoryType::UnitTests),
            "gpu_utests" => Ok(CategoryType::GpuUnitTests),
            "relvals" => Ok(CategoryType::RelVals),
            "addons" | "addOn" => Ok(CategoryType::AddOns),
            "fwlite" => Ok(CategoryType::FwLite),
            "other" => Ok(CategoryType::Other),
            _ => Err(CategoryTypeParseError(s.to_string())),
        }
    }
}

/// Error when parsing an unknown category type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTypeParseError(pub String);

impl fmt::Display for CategoryTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid category type: {}", self.0)
    }
}

impl std::error::Error for CategoryTypeParseError {}

// ============================================================================
// COMPARISON FAMILY
// ============================================================================

/// Comparison-family categories. Their outcome token is a folder suffix
/// under the variant's comparison root rather than a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonVariant {
    Baseline,
    Gpu,
    HighStats,
    Nano,
}

impl ComparisonVariant {
    pub const ALL: [ComparisonVariant; 4] = [
        ComparisonVariant::Baseline,
        ComparisonVariant::Gpu,
        ComparisonVariant::HighStats,
        ComparisonVariant::Nano,
    ];

    /// Category key used in result blobs.
    pub fn category_key(&self) -> &'static str {
        match self {
            ComparisonVariant::Baseline => "COMPARISON",
            ComparisonVariant::Gpu => "GPU_COMPARISON",
            ComparisonVariant::HighStats => "HIGH_STATS_COMPARISON",
            ComparisonVariant::Nano => "NANO_COMPARISON",
        }
    }

    pub fn from_category_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.category_key() == key)
    }

    /// Link text for a comparison that has results.
    pub fn display_text(&self) -> &'static str {
        match self {
            ComparisonVariant::Baseline => "See Comparison Results",
            ComparisonVariant::Gpu => "See GPU Comparison Results",
            ComparisonVariant::HighStats => "See High Stats Comparison Results",
            ComparisonVariant::Nano => "See Nano Comparison Results",
        }
    }
}

// ============================================================================
// ROW ORDER
// ============================================================================

/// Order in which a PR-summary row lists its categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    /// Order in which categories entered the registry
    #[default]
    Registration,
    /// Lexicographic by primary label
    Label,
}

impl FromStr for RowOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "registration" => Ok(RowOrder::Registration),
            "label" => Ok(RowOrder::Label),
            other => Err(format!("Invalid row order: {}", other)),
        }
    }
}
