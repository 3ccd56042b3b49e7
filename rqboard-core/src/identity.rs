//! Identity keys reserved in result blobs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys that parameterize link construction instead of reporting a check.
///
/// A blob line whose key is one of these is stored in the outcome map but is
/// never registered as a category and never produces a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentityKey {
    PrNumber,
    PrNumbers,
    AdditionalPrs,
    BaseIb,
    BuildNumber,
    ComparisonIb,
}

impl IdentityKey {
    /// Every reserved key, in a stable order.
    pub const ALL: [IdentityKey; 6] = [
        IdentityKey::PrNumber,
        IdentityKey::PrNumbers,
        IdentityKey::AdditionalPrs,
        IdentityKey::BaseIb,
        IdentityKey::BuildNumber,
        IdentityKey::ComparisonIb,
    ];

    /// Key as it appears in a result blob.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKey::PrNumber => "PR_NUMBER",
            IdentityKey::PrNumbers => "PR_NUMBERS",
            IdentityKey::AdditionalPrs => "ADDITIONAL_PRS",
            IdentityKey::BaseIb => "BASE_IB",
            IdentityKey::BuildNumber => "BUILD_NUMBER",
            IdentityKey::ComparisonIb => "COMPARISON_IB",
        }
    }

    /// Match a blob key against the reserved set. Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
