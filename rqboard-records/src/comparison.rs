//! Comparison and release-queue documents
//!
//! A comparison document describes one tag (usually an IB) against the tag
//! before it: the pull requests merged in between, the per-architecture
//! results of every category, and the IB-level checks.

use crate::results::{de_entries, resolve_entries, RawArchitectureEntry};
use rqboard_core::{CategoryType, DecodeError, ResultsByCategory, RqboardResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// RAW DOCUMENTS
// ============================================================================

/// A pull request or merge commit listed in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPr {
    #[serde(deserialize_with = "de_string_or_number")]
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_login: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub is_merge_commit: bool,
    #[serde(default)]
    pub from_merge_commit: bool,
    #[serde(default, deserialize_with = "de_string_list")]
    pub brought_prs: Vec<String>,
}

/// Comparison document as the producer writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDocument {
    /// `PREVIOUS-->CURRENT`
    pub compared_tags: String,
    #[serde(default)]
    pub tests_archs: Vec<String>,
    #[serde(default, deserialize_with = "de_entries")]
    pub builds: Vec<RawArchitectureEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub utests: Vec<RawArchitectureEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub gpu_utests: Vec<RawArchitectureEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub relvals: Vec<RawArchitectureEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub addons: Vec<RawArchitectureEntry>,
    #[serde(default, deserialize_with = "de_entries")]
    pub fwlite: Vec<RawArchitectureEntry>,
    /// A `null` or non-text tag is kept as `None`
    #[serde(default, rename = "cmsdistTags", deserialize_with = "de_tag_map")]
    pub cmsdist_tags: BTreeMap<String, Option<String>>,
    #[serde(default, rename = "inProgress")]
    pub in_progress: bool,
    #[serde(default)]
    pub merged_prs: Vec<MergedPr>,
    #[serde(default)]
    pub comp_baseline: Option<String>,
    #[serde(default)]
    pub comp_baseline_state: Option<String>,
    #[serde(default)]
    pub dqm_tests: Option<String>,
    #[serde(default)]
    pub hlt_tests: Option<String>,
    #[serde(default)]
    pub valgrind: Option<String>,
    #[serde(default)]
    pub igprof: Option<String>,
    #[serde(default)]
    pub static_checks: Option<String>,
    #[serde(default)]
    pub material_budget: Option<String>,
    /// `true`/`false` or a status word
    #[serde(default, rename = "RVExceptions")]
    pub rv_exceptions: Option<serde_json::Value>,
}

/// All comparisons of one release queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseQueueDocument {
    pub release_name: String,
    #[serde(default)]
    pub comparisons: Vec<ComparisonDocument>,
}

// ============================================================================
// DECODED COMPARISONS
// ============================================================================

/// IB-level check values, still in their raw status-word form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IbCheckValues {
    pub comp_baseline: Option<String>,
    pub comp_baseline_state: Option<String>,
    pub dqm_tests: Option<String>,
    pub hlt_tests: Option<String>,
    pub valgrind: Option<String>,
    pub igprof: Option<String>,
    pub static_checks: Option<String>,
    pub material_budget: Option<String>,
    pub rv_exceptions: Option<String>,
}

/// A comparison with every result list resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub compared_tags: String,
    pub architectures: Vec<String>,
    pub results: ResultsByCategory,
    pub cmsdist_tags: BTreeMap<String, Option<String>>,
    pub in_progress: bool,
    pub merged_prs: Vec<MergedPr>,
    pub checks: IbCheckValues,
}

impl Comparison {
    /// Previous and current tag of `PREVIOUS-->CURRENT`. Without the arrow
    /// the whole string is the current tag.
    pub fn tags(&self) -> (&str, &str) {
        match self.compared_tags.split_once("-->") {
            Some((previous, current)) => (previous.trim(), current.trim()),
            None => ("", self.compared_tags.trim()),
        }
    }

    /// Recorded cmsdist tag of `architecture`.
    pub fn cmsdist_tag(&self, architecture: &str) -> Option<&str> {
        self.cmsdist_tags.get(architecture)?.as_deref()
    }

    /// Whether any entries exist for `category`.
    pub fn has_results(&self, category: CategoryType) -> bool {
        self.results
            .get(&category)
            .is_some_and(|entries| !entries.is_empty())
    }
}

impl ComparisonDocument {
    /// Resolve every result list against the log-server layout.
    pub fn resolve(self, log_path_marker: &str) -> Comparison {
        let lists = [
            (CategoryType::Builds, self.builds),
            (CategoryType::UnitTests, self.utests),
            (CategoryType::GpuUnitTests, self.gpu_utests),
            (CategoryType::RelVals, self.relvals),
            (CategoryType::AddOns, self.addons),
            (CategoryType::FwLite, self.fwlite),
        ];
        let mut results = ResultsByCategory::new();
        for (category, raw) in lists {
            if !raw.is_empty() {
                results.insert(category, resolve_entries(raw, log_path_marker));
            }
        }

        let rv_exceptions = self.rv_exceptions.and_then(|value| match value {
            serde_json::Value::Bool(true) => Some("found".to_string()),
            serde_json::Value::Bool(false) => Some("not-found".to_string()),
            serde_json::Value::String(text) => Some(text),
            _ => None,
        });

        Comparison {
            compared_tags: self.compared_tags,
            architectures: self.tests_archs,
            results,
            cmsdist_tags: self.cmsdist_tags,
            in_progress: self.in_progress,
            merged_prs: self.merged_prs,
            checks: IbCheckValues {
                comp_baseline: self.comp_baseline,
                comp_baseline_state: self.comp_baseline_state,
                dqm_tests: self.dqm_tests,
                hlt_tests: self.hlt_tests,
                valgrind: self.valgrind,
                igprof: self.igprof,
                static_checks: self.static_checks,
                material_budget: self.material_budget,
                rv_exceptions,
            },
        }
    }
}

/// Decode one comparison document.
pub fn decode_comparison(json: &str, log_path_marker: &str) -> RqboardResult<Comparison> {
    let doc: ComparisonDocument = serde_json::from_str(json).map_err(|e| DecodeError::Json {
        what: "comparison".to_string(),
        reason: e.to_string(),
    })?;
    Ok(doc.resolve(log_path_marker))
}

/// Decode a release-queue document into its name and comparisons, in
/// document order.
pub fn decode_release_queue(
    json: &str,
    log_path_marker: &str,
) -> RqboardResult<(String, Vec<Comparison>)> {
    let doc: ReleaseQueueDocument = serde_json::from_str(json).map_err(|e| DecodeError::Json {
        what: "release queue".to_string(),
        reason: e.to_string(),
    })?;
    let comparisons = doc
        .comparisons
        .into_iter()
        .map(|c| c.resolve(log_path_marker))
        .collect();
    Ok((doc.release_name, comparisons))
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

fn de_tag_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(arch, tag)| match tag {
            serde_json::Value::String(tag) => (arch, Some(tag)),
            _ => (arch, None),
        })
        .collect())
}

fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<StringOrNumber> = Vec::deserialize(deserializer)?;
    Ok(items.into_iter().map(StringOrNumber::into_string).collect())
}
