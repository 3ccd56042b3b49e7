//! Category metadata registry
//!
//! Maps a category key to the labels and evidence location used when its
//! cell is rendered. The registry is owned by the page session and handed to
//! every parser and classifier call. Entries are insert-if-absent: once a key
//! is registered its metadata never changes for the lifetime of the registry.

use crate::{ComparisonVariant, IdentityKey, RowOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display metadata for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMeta {
    /// Row header, e.g. "Unit Tests"
    pub primary_label: String,
    /// Link text, e.g. "See Log"
    pub secondary_label: String,
    /// Path of the evidence relative to the build's results folder
    pub evidence_location: String,
}

impl CategoryMeta {
    pub fn new(
        primary_label: impl Into<String>,
        secondary_label: impl Into<String>,
        evidence_location: impl Into<String>,
    ) -> Self {
        Self {
            primary_label: primary_label.into(),
            secondary_label: secondary_label.into(),
            evidence_location: evidence_location.into(),
        }
    }
}

/// Categories known before any blob is read: (key, label, link text, location).
const SEED_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("CMSSWTOOLCONF_RESULTS", "Externals compilation", "See Log", "cmsswtoolconf.log"),
    ("COMPILATION_RESULTS", "Compilation", "See Log", "build.log"),
    ("UNIT_TEST_RESULTS", "Unit Tests", "See Log", "unitTests.log"),
    ("MATRIX_TESTS", "Matrix Tests Outputs", "See Logs", "runTheMatrix-results"),
    ("ADDON_TESTS", "AddOn Tests Outputs", "See Logs", "addOnTests"),
    ("IGPROF", "Igprof for 25202", "See results", "igprof-results-data"),
    ("STATIC_CHECKS", "Static checks outputs", "See Static Checks", "llvm-analysis"),
    ("COMPARISON", "Comparison with the baseline", "See results", ""),
    ("GPU_COMPARISON", "GPU comparison with the baseline", "See results", ""),
    ("HIGH_STATS_COMPARISON", "High stats comparison with the baseline", "See results", ""),
    ("NANO_COMPARISON", "Nano comparison with the baseline", "See results", ""),
    ("DQM_TESTS", "DQM Tests", "See results", "DQMTestsResults"),
    ("CLANG_COMPILATION_RESULTS", "Clang Compilation", "See Log", "buildClang.log"),
    ("CODE_RULES", "CMSSW Code Rules", "See Log", "codeRules"),
    ("DUPLICATE_DICT_RULES", "Duplicate Dictionaries", "See Log", "dupDict"),
    ("MATERIAL_BUDGET", "Material budget", "See Log", "material-budget"),
];

/// Session-scoped registry of category metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    order: Vec<String>,
    entries: HashMap<String, CategoryMeta>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the well-known categories.
    pub fn seeded() -> Self {
        let mut registry = Self::new();
        for (key, label, secondary, location) in SEED_CATEGORIES {
            registry.insert_if_absent(*key, CategoryMeta::new(*label, *secondary, *location));
        }
        debug_assert!(ComparisonVariant::ALL
            .iter()
            .all(|v| registry.contains(v.category_key())));
        registry
    }

    /// Register `key` unless it is already known or reserved.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, meta: CategoryMeta) -> bool {
        let key = key.into();
        if IdentityKey::from_key(&key).is_some() || self.entries.contains_key(&key) {
            return false;
        }
        self.order.push(key.clone());
        self.entries.insert(key, meta);
        true
    }

    pub fn get(&self, key: &str) -> Option<&CategoryMeta> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryMeta)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|meta| (key.as_str(), meta)))
    }

    /// Keys in the requested row order. Label order is stable: categories
    /// sharing a label keep their registration order.
    pub fn ordered_keys(&self, order: RowOrder) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        if order == RowOrder::Label {
            keys.sort_by(|a, b| {
                let la = self.entries.get(*a).map(|m| m.primary_label.as_str());
                let lb = self.entries.get(*b).map(|m| m.primary_label.as_str());
                la.cmp(&lb)
            });
        }
        keys
    }
}
