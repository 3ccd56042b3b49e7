//! Core dashboard structures

use crate::{CategoryType, IdentityKey, Outcome, StatusTier, NOT_READY_SENTINEL, PASSED_TOKEN};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// OUTCOME MAP
// ============================================================================

/// Parsed content of one result blob.
///
/// Identity keys are kept apart from category outcomes so that no cell can
/// ever be produced for them. Built by the record parser and read-only after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeMap {
    identity: BTreeMap<IdentityKey, String>,
    outcomes: HashMap<String, Outcome>,
    categories: Vec<String>,
}

impl OutcomeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an identity value. A repeated key replaces the earlier value.
    pub fn set_identity(&mut self, key: IdentityKey, value: impl Into<String>) {
        self.identity.insert(key, value.into());
    }

    /// Store a category outcome. `None` records the category with an absent
    /// outcome. A repeated key replaces the earlier outcome.
    pub fn record(&mut self, category: impl Into<String>, outcome: Option<Outcome>) {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category.clone());
        }
        match outcome {
            Some(outcome) => {
                self.outcomes.insert(category, outcome);
            }
            None => {
                self.outcomes.remove(&category);
            }
        }
    }

    pub fn identity(&self, key: IdentityKey) -> Option<&str> {
        self.identity.get(&key).map(String::as_str)
    }

    pub fn outcome(&self, category: &str) -> Option<&Outcome> {
        self.outcomes.get(category)
    }

    /// Categories in the order they first appeared in the blob.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn pr_number(&self) -> &str {
        self.identity(IdentityKey::PrNumber).unwrap_or_default()
    }

    pub fn build_number(&self) -> &str {
        self.identity(IdentityKey::BuildNumber).unwrap_or_default()
    }

    pub fn base_ib(&self) -> &str {
        self.identity(IdentityKey::BaseIb).unwrap_or_default()
    }

    /// `ADDITIONAL_PRS` split on commas, blanks dropped.
    pub fn additional_prs(&self) -> Vec<&str> {
        self.identity_list(IdentityKey::AdditionalPrs)
    }

    /// `PR_NUMBERS` split on commas, blanks dropped.
    pub fn pr_numbers(&self) -> Vec<&str> {
        self.identity_list(IdentityKey::PrNumbers)
    }

    /// IB the comparison results were produced against, when recorded.
    pub fn comparison_ib(&self) -> Option<&str> {
        self.identity(IdentityKey::ComparisonIb)
            .map(str::trim)
            .filter(|ib| !ib.is_empty())
    }

    fn identity_list(&self, key: IdentityKey) -> Vec<&str> {
        self.identity(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|pr| !pr.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// CELL DESCRIPTORS
// ============================================================================

/// Where a cell links to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum EvidenceUrl {
    /// Check has not produced evidence yet; the link goes nowhere.
    Placeholder,
    /// Evidence is available at this URL.
    Link(String),
    /// No link can be derived.
    Unavailable,
}

impl EvidenceUrl {
    /// Value for an `href` attribute.
    pub fn as_href(&self) -> &str {
        match self {
            EvidenceUrl::Placeholder => "#",
            EvidenceUrl::Link(url) => url,
            EvidenceUrl::Unavailable => "",
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, EvidenceUrl::Link(_))
    }
}

/// Rendering-ready unit for one (subject, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDescriptor {
    pub primary_label: String,
    pub display_text: String,
    pub evidence_url: EvidenceUrl,
    /// Renderer shows a warning indicator next to the link.
    pub has_errors: bool,
    pub tier: StatusTier,
}

// ============================================================================
// ARCHITECTURE RESULTS
// ============================================================================

/// `passed` field of an architecture result: a status word for builds and
/// unit tests, a boolean for relvals and add-ons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassedFlag {
    Bool(bool),
    Text(String),
    /// Any other JSON value, kept as its JSON text
    Unrecognized(String),
}

impl PassedFlag {
    /// Boolean reading of the flag. Only `true`, `passed` and `ok` count as
    /// success; other words such as `failed` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            PassedFlag::Bool(value) => *value,
            PassedFlag::Text(text) => {
                matches!(text.trim().to_lowercase().as_str(), PASSED_TOKEN | "true" | "ok")
            }
            PassedFlag::Unrecognized(_) => false,
        }
    }

    /// Reads any JSON value. Booleans and strings map directly; anything
    /// else is kept as unrecognized.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(flag) => PassedFlag::Bool(flag),
            serde_json::Value::String(text) => PassedFlag::Text(text),
            other => PassedFlag::Unrecognized(other.to_string()),
        }
    }

    /// Status word reading of the flag.
    pub fn as_status(&self) -> &str {
        match self {
            PassedFlag::Bool(true) => PASSED_TOKEN,
            PassedFlag::Bool(false) => "failed",
            PassedFlag::Text(text) | PassedFlag::Unrecognized(text) => text.as_str(),
        }
    }
}

/// Running pass/fail counts of an unfinished category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tally {
    pub passed: u64,
    pub failed: u64,
}

/// Structured breakdown attached to an architecture result. Counters are
/// written as numbers or numeric strings by different producers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultDetails {
    #[serde(deserialize_with = "de_counter")]
    pub num_fails: Option<u64>,
    #[serde(deserialize_with = "de_counter")]
    pub num_passed: Option<u64>,
    #[serde(deserialize_with = "de_counter")]
    pub num_failed: Option<u64>,
    #[serde(deserialize_with = "de_counter")]
    pub known_failed: Option<u64>,
    #[serde(rename = "compWarning", deserialize_with = "de_counter")]
    pub comp_warning: Option<u64>,
    #[serde(rename = "linkWarning", deserialize_with = "de_counter")]
    pub link_warning: Option<u64>,
    #[serde(rename = "miscWarning", deserialize_with = "de_counter")]
    pub misc_warning: Option<u64>,
    #[serde(rename = "compError", deserialize_with = "de_counter")]
    pub comp_error: Option<u64>,
    #[serde(rename = "linkError", deserialize_with = "de_counter")]
    pub link_error: Option<u64>,
    #[serde(rename = "miscError", deserialize_with = "de_counter")]
    pub misc_error: Option<u64>,
}

impl ResultDetails {
    /// Compile + link + misc warnings, missing counters read as 0.
    pub fn warning_total(&self) -> u64 {
        saturating_total([self.comp_warning, self.link_warning, self.misc_warning])
    }

    /// Compile + link + misc errors, missing counters read as 0.
    pub fn error_total(&self) -> u64 {
        saturating_total([self.comp_error, self.link_error, self.misc_error])
    }

    pub fn tally(&self) -> Tally {
        Tally {
            passed: self.num_passed.unwrap_or(0),
            failed: self.num_failed.unwrap_or(0),
        }
    }
}

fn saturating_total(counters: [Option<u64>; 3]) -> u64 {
    counters
        .into_iter()
        .fold(0u64, |total, c| total.saturating_add(c.unwrap_or(0)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CounterRepr {
    Int(u64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

fn de_counter<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr: Option<CounterRepr> = Option::deserialize(deserializer)?;
    Ok(repr.and_then(|repr| match repr {
        CounterRepr::Int(n) => Some(n),
        CounterRepr::Float(f) if f >= 0.0 => Some(f as u64),
        CounterRepr::Float(_) => None,
        CounterRepr::Text(text) => text.trim().parse().ok(),
        CounterRepr::Other(_) => None,
    }))
}

/// Structured identity of a log on the build-log server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogLocation {
    /// Architecture the log was produced on
    pub platform: String,
    /// Served area, the anchor segment
    pub area: String,
    pub day: String,
    pub queue: String,
    /// Release or IB name
    pub release: String,
}

impl LogLocation {
    /// Locate `marker` in `path` and read the platform before it and the
    /// day, queue and release after it.
    pub fn parse(path: &str, marker: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        let at = segments.iter().position(|s| *s == marker)?;
        let platform = segments.get(at.checked_sub(1)?)?;
        let day = segments.get(at + 1)?;
        let queue = segments.get(at + 2)?;
        let release = segments.get(at + 3)?;
        if [platform, day, queue, release].iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self {
            platform: platform.to_string(),
            area: marker.to_string(),
            day: day.to_string(),
            queue: queue.to_string(),
            release: release.to_string(),
        })
    }

    /// `platform/area/day/queue/release`
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.platform, self.area, self.day, self.queue, self.release
        )
    }
}

/// Result file reference, resolved at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileRef {
    /// The category has not produced its log yet.
    NotReady,
    Located(LogLocation),
    /// A path that does not follow the log-server layout.
    Unrecognized(String),
}

impl FileRef {
    pub fn from_path(path: &str, marker: &str) -> Self {
        if path.trim() == NOT_READY_SENTINEL {
            return FileRef::NotReady;
        }
        match LogLocation::parse(path, marker) {
            Some(location) => FileRef::Located(location),
            None => FileRef::Unrecognized(path.to_string()),
        }
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, FileRef::NotReady)
    }
}

/// One architecture's result for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureResultEntry {
    pub architecture: String,
    pub passed: PassedFlag,
    pub file: FileRef,
    pub details: ResultDetails,
    /// `Some(false)` while the category is still producing results.
    pub done: Option<bool>,
}

impl ArchitectureResultEntry {
    pub fn is_in_progress(&self) -> bool {
        self.done == Some(false)
    }
}

/// Per-category result lists of one comparison.
pub type ResultsByCategory = HashMap<CategoryType, Vec<ArchitectureResultEntry>>;
