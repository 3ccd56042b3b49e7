//! Release and integration-build tag names

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IB_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+_X_(?P<stamp>\d{4}-\d{2}-\d{2}-\d{4})$")
        .expect("Invalid IB tag regex")
});

/// What a tag name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// Dated integration build, e.g. `CMSSW_12_0_X_2024-01-01-1100`
    IntegrationBuild,
    /// Head of a release queue branch, e.g. `CMSSW_12_0_X`
    TopOfBranch,
    /// Published release, e.g. `CMSSW_12_0_0`
    Release,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        if tag.contains('-') {
            TagKind::IntegrationBuild
        } else if tag.contains('X') {
            TagKind::TopOfBranch
        } else {
            TagKind::Release
        }
    }
}

/// Build time of an integration build tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IbTag {
    pub built_at: NaiveDateTime,
}

impl IbTag {
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = IB_TAG.captures(tag.trim())?;
        let built_at = NaiveDateTime::parse_from_str(&caps["stamp"], "%Y-%m-%d-%H%M").ok()?;
        Some(Self { built_at })
    }

    /// Trailing part of the tag after the last `_`, e.g. `2024-01-01-1100`.
    pub fn stamp_suffix(tag: &str) -> &str {
        tag.rsplit_once('_').map(|(_, suffix)| suffix).unwrap_or(tag)
    }
}
