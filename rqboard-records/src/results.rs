//! Decoding of per-architecture result lists
//!
//! Result lists arrive as JSON arrays of `{arch, passed, file, details?, done?}`.
//! File paths are resolved to a `FileRef` here, once, so the classifier never
//! slices paths itself.

use rqboard_core::{
    ArchitectureResultEntry, DecodeError, FileRef, PassedFlag, ResultDetails, RqboardResult,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Architecture result exactly as the producer wrote it. Every field is read
/// leniently so that one odd entry never rejects its whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArchitectureEntry {
    #[serde(default, deserialize_with = "de_text")]
    pub arch: String,
    /// Boolean or status word; other JSON values are kept as unrecognized.
    #[serde(default)]
    pub passed: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub file: Option<String>,
    /// Kept loose: producers disagree on its shape.
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default, deserialize_with = "de_opt_bool")]
    pub done: Option<bool>,
}

impl RawArchitectureEntry {
    /// Resolve into a typed entry. Entries without a `passed` value or a
    /// `file` carry nothing to show and resolve to `None`.
    pub fn resolve(self, log_path_marker: &str) -> Option<ArchitectureResultEntry> {
        let passed = self.passed.filter(|value| !value.is_null())?;
        let file = self.file?;
        let details = self
            .details
            .and_then(|value| serde_json::from_value::<ResultDetails>(value).ok())
            .unwrap_or_default();

        Some(ArchitectureResultEntry {
            architecture: self.arch,
            passed: PassedFlag::from_value(passed),
            file: FileRef::from_path(&file, log_path_marker),
            details,
            done: self.done,
        })
    }
}

/// Resolve a list of raw entries. The first entry of an architecture decides
/// its cell: when it has nothing to show the cell stays blank and later
/// entries for the same architecture are ignored.
pub fn resolve_entries(
    raw: Vec<RawArchitectureEntry>,
    log_path_marker: &str,
) -> Vec<ArchitectureResultEntry> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| {
            if !seen.insert(entry.arch.clone()) {
                tracing::debug!(arch = %entry.arch, "ignoring repeated architecture result");
                return None;
            }
            let arch = entry.arch.clone();
            let resolved = entry.resolve(log_path_marker);
            if resolved.is_none() {
                tracing::debug!(%arch, "blank architecture result without passed/file");
            }
            resolved
        })
        .collect()
}

/// Read a JSON array of entries, skipping elements that are not objects.
/// Anything but an array reads as an empty list.
pub(crate) fn de_entries<'de, D>(deserializer: D) -> Result<Vec<RawArchitectureEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => raw_entries(items),
        _ => Vec::new(),
    })
}

fn raw_entries(items: Vec<Value>) -> Vec<RawArchitectureEntry> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable architecture result");
                None
            }
        })
        .collect()
}

fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_text(deserializer)?.unwrap_or_default())
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

/// Decode a JSON result list.
pub fn decode_results_list(
    json: &str,
    log_path_marker: &str,
) -> RqboardResult<Vec<ArchitectureResultEntry>> {
    let items: Vec<Value> = serde_json::from_str(json).map_err(|e| DecodeError::Json {
        what: "result list".to_string(),
        reason: e.to_string(),
    })?;
    Ok(resolve_entries(raw_entries(items), log_path_marker))
}

/// First entry for `architecture`, if any.
pub fn find_entry<'a>(
    entries: &'a [ArchitectureResultEntry],
    architecture: &str,
) -> Option<&'a ArchitectureResultEntry> {
    entries.iter().find(|entry| entry.architecture == architecture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqboard_core::RqboardError;

    const LIST: &str = r#"[
        {"arch": "slc7_amd64_gcc700", "passed": "failed", "details": {"num_fails": "2"},
         "file": "/data/sdt/buildlogs/slc7_amd64_gcc700/www/tue/11.0-tue-23/CMSSW_11_0_X_2019-09-17-2300/unitTests-summary.log"},
        {"arch": "slc7_aarch64_gcc700", "passed": true, "file": "not-ready", "done": false},
        {"arch": "cc8_amd64_gcc8", "passed": null, "file": "x"},
        {"arch": "cc8_amd64_gcc8", "passed": "passed", "file": "not-ready"}
    ]"#;

    #[test]
    fn test_decode_results_list() {
        let entries = decode_results_list(LIST, "www").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].details.num_fails, Some(2));
        assert!(matches!(entries[0].file, FileRef::Located(_)));
        assert!(entries[1].file.is_not_ready());
        assert!(entries[1].is_in_progress());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = decode_results_list(r#"{"arch": 1}"#, "www").unwrap_err();
        assert!(matches!(err, RqboardError::Decode(_)));
    }

    #[test]
    fn test_malformed_details_become_empty() {
        let entries =
            decode_results_list(r#"[{"arch": "a", "passed": true, "file": "f", "details": [1, 2]}]"#, "www")
                .unwrap();
        assert_eq!(entries[0].details, ResultDetails::default());
    }

    #[test]
    fn test_odd_entry_keeps_the_rest_of_the_list() {
        let json = r#"[
            {"arch": "a", "passed": "passed", "file": "not-ready"},
            {"arch": "b", "passed": 1, "file": "x", "done": "yes"},
            {"arch": 7, "passed": true, "file": 42},
            "garbage"
        ]"#;
        let entries = decode_results_list(json, "www").unwrap();
        assert_eq!(entries.len(), 3);
        let odd = find_entry(&entries, "b").unwrap();
        assert_eq!(odd.passed, PassedFlag::Unrecognized("1".into()));
        assert_eq!(odd.done, None);
        let numeric = find_entry(&entries, "7").unwrap();
        assert_eq!(numeric.file, FileRef::Unrecognized("42".into()));
    }

    #[test]
    fn test_blank_first_entry_hides_later_duplicate() {
        let json = r#"[
            {"arch": "a", "passed": true, "file": null},
            {"arch": "a", "passed": true, "file": "not-ready"}
        ]"#;
        let entries = decode_results_list(json, "www").unwrap();
        assert!(entries.is_empty());
        assert!(find_entry(&entries, "a").is_none());
    }

    #[test]
    fn test_find_entry_first_match() {
        let entries = decode_results_list(LIST, "www").unwrap();
        assert!(find_entry(&entries, "slc7_aarch64_gcc700").is_some());
        assert!(find_entry(&entries, "cc8_amd64_gcc8").is_none());
        assert!(find_entry(&[], "slc7_amd64_gcc700").is_none());
    }
}
