//! Configuration types
//!
//! Every URL root the classifier links to comes from here; nothing is
//! hard-derived inside the matrix builder.

use crate::{ConfigError, RowOrder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Roots of the comparison-family result folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonRoots {
    pub baseline: String,
    pub gpu: String,
    pub high_stats: String,
    pub nano: String,
}

/// Log-server endpoints used by the architecture path and IB-level links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogServerConfig {
    /// Build and unit-test logs, followed by a log location path
    pub build_logs: String,
    /// Add-on test logs, followed by a log location path
    pub addon_logs: String,
    /// FWLite build logs, followed by a log location path
    pub fwlite_logs: String,
    /// Relval detail page, followed by `#platform;release`
    pub relval_detail: String,
    /// Scram detail page for unfinished builds, followed by `#arch;ib`
    pub scram_detail: String,
    /// Q/A page, queried with `?arch=..&release=..`
    pub qa_root: String,
    /// Root of the per-IB artifact folders (DQM, HLT, valgrind, ...)
    pub artifacts_root: String,
    /// Relval exceptions page, followed by `#tag`
    pub relval_exceptions: String,
}

/// Master configuration struct for the dashboard core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base path of PR evidence: `<root>PR-<n>/<build>/<location>`
    pub pr_results_root: String,
    pub comparison_roots: ComparisonRoots,
    pub pr_page_root: String,
    pub ib_page_root: String,
    pub baseline_root: String,
    /// Source repository root (tree/, commits/, releases/tag/, compare/)
    pub repository_root: String,
    pub cmsdist_commits_root: String,
    pub log_server: LogServerConfig,
    /// Path segment that anchors log location parsing
    #[serde(default = "default_log_path_marker")]
    pub log_path_marker: String,
    #[serde(default)]
    pub row_order: RowOrder,
}

fn default_log_path_marker() -> String {
    "www".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pr_results_root: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/pull-request-integration/"
                .to_string(),
            comparison_roots: ComparisonRoots {
                baseline: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/baseLineComparisons/"
                    .to_string(),
                gpu: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/baseLineComparisonsGPU/"
                    .to_string(),
                high_stats:
                    "https://cmssdt.cern.ch/SDT/jenkins-artifacts/baseLineComparisonsHighStats/"
                        .to_string(),
                nano: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/baseLineComparisonsNANO/"
                    .to_string(),
            },
            pr_page_root: "https://github.com/cms-sw/cmssw/pull/".to_string(),
            ib_page_root: "https://cmssdt.cern.ch/SDT/html/showIB.html".to_string(),
            baseline_root: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/ib-baseline-tests/"
                .to_string(),
            repository_root: "https://github.com/cms-sw/cmssw/".to_string(),
            cmsdist_commits_root: "https://github.com/cms-sw/cmsdist/commits/".to_string(),
            log_server: LogServerConfig {
                build_logs: "https://cmssdt.cern.ch/SDT/cgi-bin/showBuildLogs.py/".to_string(),
                addon_logs: "https://cmssdt.cern.ch/SDT/cgi-bin/showAddOnLogs.py/".to_string(),
                fwlite_logs: "https://cmssdt.cern.ch/SDT/cgi-bin/showBuildLogs.py/fwlite/"
                    .to_string(),
                relval_detail: "https://cms-sw.github.io/relvalLogDetail.html".to_string(),
                scram_detail: "https://cms-sw.github.io/scramDetail.html".to_string(),
                qa_root: "https://cmssdt.cern.ch/SDT/cgi-bin/newQA.py".to_string(),
                artifacts_root: "https://cmssdt.cern.ch/SDT/jenkins-artifacts/".to_string(),
                relval_exceptions: "https://cms-sw.github.io/relvalsExceptions.html".to_string(),
            },
            log_path_marker: default_log_path_marker(),
            row_order: RowOrder::Registration,
        }
    }
}

impl DashboardConfig {
    /// Load and validate a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML config text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Production defaults overlaid with environment variables, then
    /// validated.
    ///
    /// Environment variables:
    /// - `RQBOARD_PR_RESULTS_ROOT`: base path of PR evidence logs
    /// - `RQBOARD_PR_PAGE_ROOT`: pull request page root
    /// - `RQBOARD_IB_PAGE_ROOT`: IB page root
    /// - `RQBOARD_ROW_ORDER`: `registration` or `label`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`DashboardConfig::from_env`] over an arbitrary variable lookup.
    /// A variable that is set but blank is an error, not a fallback.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::MissingRequired {
                    field: name.to_string(),
                }),
                other => Ok(other),
            }
        };
        let mut config = Self::default();

        if let Some(root) = var("RQBOARD_PR_RESULTS_ROOT")? {
            config.pr_results_root = root;
        }
        if let Some(root) = var("RQBOARD_PR_PAGE_ROOT")? {
            config.pr_page_root = root;
        }
        if let Some(root) = var("RQBOARD_IB_PAGE_ROOT")? {
            config.ib_page_root = root;
        }
        if let Some(order) = var("RQBOARD_ROW_ORDER")? {
            config.row_order = order.parse::<RowOrder>().map_err(|reason| ConfigError::InvalidValue {
                field: "RQBOARD_ROW_ORDER".to_string(),
                value: order.clone(),
                reason,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - every URL root is non-empty
    /// - roots that get a path appended end with `/`
    /// - `log_path_marker` is a single non-empty path segment
    pub fn validate(&self) -> Result<(), ConfigError> {
        let joined_roots = [
            ("pr_results_root", &self.pr_results_root),
            ("comparison_roots.baseline", &self.comparison_roots.baseline),
            ("comparison_roots.gpu", &self.comparison_roots.gpu),
            ("comparison_roots.high_stats", &self.comparison_roots.high_stats),
            ("comparison_roots.nano", &self.comparison_roots.nano),
            ("pr_page_root", &self.pr_page_root),
            ("baseline_root", &self.baseline_root),
            ("repository_root", &self.repository_root),
            ("cmsdist_commits_root", &self.cmsdist_commits_root),
            ("log_server.build_logs", &self.log_server.build_logs),
            ("log_server.addon_logs", &self.log_server.addon_logs),
            ("log_server.fwlite_logs", &self.log_server.fwlite_logs),
            ("log_server.artifacts_root", &self.log_server.artifacts_root),
        ];
        let anchored_pages = [
            ("ib_page_root", &self.ib_page_root),
            ("log_server.relval_detail", &self.log_server.relval_detail),
            ("log_server.scram_detail", &self.log_server.scram_detail),
            ("log_server.qa_root", &self.log_server.qa_root),
            ("log_server.relval_exceptions", &self.log_server.relval_exceptions),
        ];

        for (field, value) in joined_roots.iter().chain(anchored_pages.iter()) {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        for (field, value) in joined_roots {
            if !value.ends_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must end with '/'".to_string(),
                });
            }
        }

        if self.log_path_marker.is_empty() || self.log_path_marker.contains('/') {
            return Err(ConfigError::InvalidValue {
                field: "log_path_marker".to_string(),
                value: self.log_path_marker.clone(),
                reason: "must be a single path segment".to_string(),
            });
        }

        Ok(())
    }
}
