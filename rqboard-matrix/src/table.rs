//! Comparison table assembly
//!
//! Turns one decoded comparison into everything a renderer needs for an IB
//! panel: header links, the architecture × category grid, IB-level checks
//! and the merged pull requests.

use crate::architecture::build_architecture_cell;
use crate::links::{LinkBuilder, TagLink};
use crate::summary::HeaderLink;
use rqboard_core::{CategoryType, CellDescriptor, IbTag, TagKind};
use rqboard_records::{Comparison, IbCheckValues, MergedPr};
use serde::{Deserialize, Serialize};

const NOT_FOUND: &str = "not-found";
const IN_PROGRESS: &str = "inprogress";
const FOUND: &str = "found";

// ============================================================================
// TABLE TYPES
// ============================================================================

/// Where the externals of one architecture came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildProvenance {
    /// No cmsdist tag recorded
    Unknown,
    /// Externals built for this IB
    FullBuild { tag: String, url: String },
    /// Externals reused from an earlier IB
    PatchFrom {
        tag: String,
        url: String,
        base_ib: String,
        /// Timestamp part of the base IB name
        date: String,
    },
}

impl BuildProvenance {
    /// Read the cmsdist tag of `architecture` in IB `current`.
    ///
    /// `IB/<current>/<arch>` and `ERR/<current>/<arch>` mean a full build;
    /// any other tag names the IB the externals were taken from.
    pub fn derive(
        tag: Option<&str>,
        current: &str,
        architecture: &str,
        links: &LinkBuilder<'_>,
    ) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty() && *t != "Not Found") else {
            return BuildProvenance::Unknown;
        };
        let url = links.cmsdist_commits(tag);
        let own_tags = [
            format!("IB/{current}/{architecture}"),
            format!("ERR/{current}/{architecture}"),
        ];
        if own_tags.iter().any(|own| own == tag) {
            return BuildProvenance::FullBuild {
                tag: tag.to_string(),
                url,
            };
        }

        let base_ib = tag.split('/').nth(1).unwrap_or(tag).to_string();
        let date = IbTag::stamp_suffix(&base_ib).to_string();
        BuildProvenance::PatchFrom {
            tag: tag.to_string(),
            url,
            base_ib,
            date,
        }
    }
}

/// One architecture of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureRow {
    pub architecture: String,
    pub provenance: BuildProvenance,
    /// One per table column; `None` is a blank cell.
    pub cells: Vec<Option<CellDescriptor>>,
    pub qa_url: String,
}

/// State of an IB-level check. Checks that were not found are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "url", rename_all = "snake_case")]
pub enum IbCheck {
    InProgress,
    Found(String),
}

/// A report produced by an IB-level check next to its main link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbCheckLink {
    pub name: String,
    pub check: IbCheck,
    /// `Some(false)` when the check finished with a warning state
    pub healthy: Option<bool>,
    pub reports: Vec<CheckReport>,
}

impl IbCheckLink {
    fn new(name: &str, check: IbCheck) -> Self {
        Self {
            name: name.to_string(),
            check,
            healthy: None,
            reports: Vec::new(),
        }
    }
}

/// A pull request or merge commit between the two compared tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergedItem {
    PullRequest {
        number: String,
        url: String,
        author: String,
        title: String,
        /// Brought in by a merge commit listed separately
        from_merge_commit: bool,
    },
    MergeCommit {
        number: String,
        url: String,
        brought_prs: Vec<String>,
    },
}

impl MergedItem {
    fn from_merged_pr(pr: &MergedPr, links: &LinkBuilder<'_>) -> Self {
        if pr.is_merge_commit {
            MergedItem::MergeCommit {
                number: pr.number.clone(),
                url: links.commit(&pr.hash),
                brought_prs: pr.brought_prs.clone(),
            }
        } else {
            MergedItem::PullRequest {
                number: pr.number.clone(),
                url: pr.url.clone(),
                author: pr.author_login.clone(),
                title: pr.title.clone(),
                from_merge_commit: pr.from_merge_commit,
            }
        }
    }

    /// Text shown after the number.
    pub fn description(&self) -> String {
        match self {
            MergedItem::PullRequest { author, title, .. } => format!("from {author}: {title}"),
            MergedItem::MergeCommit { brought_prs, .. } => {
                let prs: Vec<String> = brought_prs.iter().map(|pr| format!("#{pr}")).collect();
                format!("Automatic merge of {}", prs.join(" "))
            }
        }
    }
}

/// Everything shown for one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub current_tag: String,
    pub previous_tag: String,
    pub tag_kind: TagKind,
    pub tag_link: TagLink,
    pub in_progress: bool,
    pub columns: Vec<CategoryType>,
    pub rows: Vec<ArchitectureRow>,
    pub ib_checks: Vec<IbCheckLink>,
    pub merged: Vec<MergedItem>,
    /// Compare view between the two tags, only when something was merged
    pub compare_url: Option<String>,
    /// Shown instead of the merged list when it is empty
    pub no_new_prs: Option<String>,
}

impl ComparisonTable {
    pub fn column_labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(CategoryType::column_label).collect()
    }
}

/// All comparisons of one release queue, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseQueueView {
    pub release_name: String,
    /// Relval exceptions summary of the whole queue
    pub relval_exceptions: HeaderLink,
    pub tables: Vec<ComparisonTable>,
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Columns of a comparison, GPU unit tests only when it has some.
pub fn table_columns(comparison: &Comparison) -> Vec<CategoryType> {
    let mut columns = vec![CategoryType::Builds, CategoryType::UnitTests];
    if comparison.has_results(CategoryType::GpuUnitTests) {
        columns.push(CategoryType::GpuUnitTests);
    }
    columns.extend([CategoryType::RelVals, CategoryType::AddOns, CategoryType::FwLite]);
    columns
}

pub fn build_comparison_table(comparison: &Comparison, links: &LinkBuilder<'_>) -> ComparisonTable {
    let (previous, current) = comparison.tags();
    let tag_link = links.tag(current);
    let columns = table_columns(comparison);

    let rows: Vec<ArchitectureRow> = comparison
        .architectures
        .iter()
        .map(|architecture| ArchitectureRow {
            architecture: architecture.clone(),
            provenance: BuildProvenance::derive(
                comparison.cmsdist_tag(architecture),
                current,
                architecture,
                links,
            ),
            cells: columns
                .iter()
                .map(|category| {
                    build_architecture_cell(&comparison.results, architecture, *category, current, links)
                })
                .collect(),
            qa_url: links.qa(architecture, current),
        })
        .collect();

    let ib_checks = if tag_link.kind == TagKind::TopOfBranch {
        Vec::new()
    } else {
        ib_check_links(&comparison.checks, current, links)
    };

    let merged: Vec<MergedItem> = comparison
        .merged_prs
        .iter()
        .map(|pr| MergedItem::from_merged_pr(pr, links))
        .collect();
    let compare_url =
        (!merged.is_empty() && !previous.is_empty()).then(|| links.compare(previous, current));
    let no_new_prs = merged.is_empty().then(|| {
        if previous.is_empty() {
            "No new pull requests".to_string()
        } else {
            format!("No new pull requests since {previous}")
        }
    });

    tracing::debug!(
        current,
        rows = rows.len(),
        columns = columns.len(),
        checks = ib_checks.len(),
        "built comparison table"
    );

    ComparisonTable {
        current_tag: current.to_string(),
        previous_tag: previous.to_string(),
        tag_kind: tag_link.kind,
        tag_link,
        in_progress: comparison.in_progress,
        columns,
        rows,
        ib_checks,
        merged,
        compare_url,
        no_new_prs,
    }
}

/// Tables of a release queue, newest comparison first.
///
/// Dated IB tags are ordered by build time. Undated tags (branch heads,
/// releases) come first; ties keep reversed document order.
pub fn build_release_queue(
    release_name: &str,
    comparisons: &[Comparison],
    links: &LinkBuilder<'_>,
) -> ReleaseQueueView {
    let mut ordered: Vec<&Comparison> = comparisons.iter().rev().collect();
    ordered.sort_by_key(|comparison| {
        let built = IbTag::parse(comparison.tags().1);
        std::cmp::Reverse((built.is_none(), built))
    });

    ReleaseQueueView {
        release_name: release_name.to_string(),
        relval_exceptions: HeaderLink {
            label: format!("Relvals Exceptions Summary for {release_name}"),
            url: links.relval_exceptions(release_name),
        },
        tables: ordered
            .into_iter()
            .map(|comparison| build_comparison_table(comparison, links))
            .collect(),
    }
}

// ============================================================================
// IB-LEVEL CHECKS
// ============================================================================

/// `not-found` and missing values omit the check; `inprogress` marks it
/// running; `found` links to the check's artifact folder.
fn artifact_check(
    name: &str,
    value: Option<&str>,
    folder: &str,
    tag: &str,
    links: &LinkBuilder<'_>,
) -> Option<IbCheckLink> {
    match value? {
        IN_PROGRESS => Some(IbCheckLink::new(name, IbCheck::InProgress)),
        FOUND => Some(IbCheckLink::new(name, IbCheck::Found(links.artifact(folder, tag)))),
        _ => None,
    }
}

fn ib_check_links(checks: &IbCheckValues, tag: &str, links: &LinkBuilder<'_>) -> Vec<IbCheckLink> {
    let mut found = Vec::new();

    // Comparison baseline: the value is the result URL itself.
    match checks.comp_baseline.as_deref() {
        None | Some(NOT_FOUND) => {}
        Some(IN_PROGRESS) => found.push(IbCheckLink::new("Comparison Baseline", IbCheck::InProgress)),
        Some(url) => {
            let mut link = IbCheckLink::new("Comparison Baseline", IbCheck::Found(url.to_string()));
            link.healthy = Some(checks.comp_baseline_state.as_deref() == Some("ok"));
            found.push(link);
        }
    }

    found.extend(artifact_check("DQM Tests", checks.dqm_tests.as_deref(), "ib-dqm-tests", tag, links));
    found.extend(artifact_check("HLT Validation", checks.hlt_tests.as_deref(), "HLT-Validation", tag, links));
    found.extend(artifact_check("Valgrind", checks.valgrind.as_deref(), "valgrind", tag, links));
    found.extend(artifact_check("IgProf", checks.igprof.as_deref(), "igprof", tag, links));

    match checks.static_checks.as_deref() {
        None | Some(NOT_FOUND) => {}
        Some(IN_PROGRESS) => found.push(IbCheckLink::new("Static Analyzer", IbCheck::InProgress)),
        Some(value) => found.push(static_analyzer(value, tag, links)),
    }

    match checks.rv_exceptions.as_deref() {
        None | Some(NOT_FOUND) => {}
        Some(IN_PROGRESS) => found.push(IbCheckLink::new("RelVal Exceptions", IbCheck::InProgress)),
        Some(_) => found.push(IbCheckLink::new(
            "RelVal Exceptions",
            IbCheck::Found(links.relval_exceptions(tag)),
        )),
    }

    found.extend(artifact_check(
        "Material Budget",
        checks.material_budget.as_deref(),
        "material-budget",
        tag,
        links,
    ));

    found
}

/// Static analyzer value: `<arch>:<extra report>:<extra report>...`.
fn static_analyzer(value: &str, tag: &str, links: &LinkBuilder<'_>) -> IbCheckLink {
    let mut parts = value.split(':');
    let architecture = parts.next().unwrap_or_default();
    let root = links.static_analysis(tag, architecture);

    let mut link = IbCheckLink::new(
        "Static Analyzer",
        IbCheck::Found(format!("{root}llvm-analysis/index.html")),
    );
    link.reports.push(CheckReport {
        label: "modules2statics".to_string(),
        url: format!("{root}reports/modules2statics.txt"),
    });
    for extra in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let label = extra
            .rsplit('/')
            .next()
            .unwrap_or(extra)
            .trim_end_matches(".txt")
            .to_string();
        link.reports.push(CheckReport {
            label,
            url: format!("{root}{extra}"),
        });
    }
    link.reports.push(CheckReport {
        label: "tlf2esd".to_string(),
        url: format!("{root}reports/tlf2esd.txt"),
    });
    link
}
