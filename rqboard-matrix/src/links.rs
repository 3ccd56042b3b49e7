//! Link derivation
//!
//! Every URL a cell or table header points at is assembled here from the
//! roots in `DashboardConfig`. Functions are pure string concatenation, so
//! identical inputs always produce byte-identical URLs.

use rqboard_core::{
    CategoryType, ComparisonVariant, DashboardConfig, EvidenceUrl, FileRef, TagKind,
};
use serde::{Deserialize, Serialize};

/// A header link of the comparison table, e.g. the tag or branch link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLink {
    pub kind: TagKind,
    pub label: String,
    pub url: String,
}

/// URL builder over the configured roots.
#[derive(Debug, Clone, Copy)]
pub struct LinkBuilder<'c> {
    config: &'c DashboardConfig,
}

impl<'c> LinkBuilder<'c> {
    pub fn new(config: &'c DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'c DashboardConfig {
        self.config
    }

    // ========================================================================
    // PR SUMMARY PATH
    // ========================================================================

    /// `<pr_results_root>PR-<pr>/<build>/<location>`
    pub fn pr_evidence(&self, pr_number: &str, build_number: &str, location: &str) -> String {
        format!(
            "{}PR-{}/{}/{}",
            self.config.pr_results_root, pr_number, build_number, location
        )
    }

    /// `<variant root><base_ib>+<pr>/<token>/`
    pub fn comparison_results(
        &self,
        variant: ComparisonVariant,
        base_ib: &str,
        pr_number: &str,
        token: &str,
    ) -> String {
        let roots = &self.config.comparison_roots;
        let root = match variant {
            ComparisonVariant::Baseline => &roots.baseline,
            ComparisonVariant::Gpu => &roots.gpu,
            ComparisonVariant::HighStats => &roots.high_stats,
            ComparisonVariant::Nano => &roots.nano,
        };
        format!("{root}{base_ib}+{pr_number}/{token}/")
    }

    pub fn pull_request(&self, pr_number: &str) -> String {
        format!("{}{}", self.config.pr_page_root, pr_number)
    }

    /// IB page anchored at one IB.
    pub fn ib_page(&self, ib: &str) -> String {
        format!("{}#{}", self.config.ib_page_root, ib)
    }

    pub fn ib_baseline(&self, ib: &str) -> String {
        format!("{}{}", self.config.baseline_root, ib)
    }

    // ========================================================================
    // ARCHITECTURE PATH
    // ========================================================================

    /// Evidence link of one architecture result.
    pub fn architecture_evidence(
        &self,
        category: CategoryType,
        file: &FileRef,
        architecture: &str,
        ib: &str,
    ) -> EvidenceUrl {
        let logs = &self.config.log_server;
        match (file, category) {
            (FileRef::Unrecognized(_), _) => EvidenceUrl::Unavailable,
            (
                FileRef::Located(location),
                CategoryType::Builds | CategoryType::UnitTests | CategoryType::GpuUnitTests,
            ) => EvidenceUrl::Link(format!("{}{}", logs.build_logs, location.path())),
            (FileRef::NotReady, CategoryType::Builds | CategoryType::UnitTests | CategoryType::GpuUnitTests) => {
                EvidenceUrl::Link(format!("{}#{};{}", logs.scram_detail, architecture, ib))
            }
            (FileRef::Located(location), CategoryType::RelVals) => EvidenceUrl::Link(format!(
                "{}#{};{}",
                logs.relval_detail, location.platform, location.release
            )),
            (FileRef::NotReady, CategoryType::RelVals) => {
                EvidenceUrl::Link(format!("{}#{};{}", logs.relval_detail, architecture, ib))
            }
            (FileRef::Located(location), CategoryType::FwLite) => {
                EvidenceUrl::Link(format!("{}{}", logs.fwlite_logs, location.path()))
            }
            (FileRef::Located(location), CategoryType::AddOns | CategoryType::Other) => {
                EvidenceUrl::Link(format!("{}{}/addOnTests/", logs.addon_logs, location.path()))
            }
            (FileRef::NotReady, _) => EvidenceUrl::Unavailable,
        }
    }

    /// `<qa_root>?arch=<arch>&release=<release>`
    pub fn qa(&self, architecture: &str, release: &str) -> String {
        format!(
            "{}?arch={}&release={}",
            self.config.log_server.qa_root, architecture, release
        )
    }

    pub fn cmsdist_commits(&self, tag: &str) -> String {
        format!("{}{}", self.config.cmsdist_commits_root, tag)
    }

    // ========================================================================
    // TAGS AND MERGED PULL REQUESTS
    // ========================================================================

    /// Link for a comparison's current tag: the tree of an IB, the commits of
    /// a branch head, or the release page.
    pub fn tag(&self, tag: &str) -> TagLink {
        let kind = TagKind::of(tag);
        let repository = &self.config.repository_root;
        let (label, url) = match kind {
            TagKind::IntegrationBuild => ("See tag", format!("{repository}tree/{tag}")),
            TagKind::TopOfBranch => ("See branch", format!("{repository}commits/{tag}")),
            TagKind::Release => ("See release", format!("{repository}releases/tag/{tag}")),
        };
        TagLink {
            kind,
            label: label.to_string(),
            url,
        }
    }

    /// GitHub compare view between two tags.
    pub fn compare(&self, previous: &str, current: &str) -> String {
        format!(
            "{}compare/{}...{}",
            self.config.repository_root, previous, current
        )
    }

    pub fn commit(&self, hash: &str) -> String {
        format!("{}commit/{}", self.config.repository_root, hash)
    }

    // ========================================================================
    // IB-LEVEL CHECKS
    // ========================================================================

    /// Artifact folder of an IB-level check, e.g. `ib-dqm-tests/<tag>`.
    pub fn artifact(&self, folder: &str, tag: &str) -> String {
        format!("{}{}/{}", self.config.log_server.artifacts_root, folder, tag)
    }

    /// Root of the static analyzer output of one IB and architecture.
    pub fn static_analysis(&self, tag: &str, architecture: &str) -> String {
        format!(
            "{}ib-static-analysis/{}/{}/",
            self.config.log_server.artifacts_root, tag, architecture
        )
    }

    /// Relval exceptions page anchored at an IB or a whole release queue.
    pub fn relval_exceptions(&self, tag: &str) -> String {
        format!("{}#{}", self.config.log_server.relval_exceptions, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqboard_core::LogLocation;

    const BUILD_LOG: &str =
        "/data/sdt/buildlogs/slc7_amd64_gcc700/www/tue/11.0-tue-23/CMSSW_11_0_X_2019-09-17-2300/logAnalysis.pkl";
    const IB: &str = "CMSSW_11_0_X_2019-09-17-2300";

    fn located() -> FileRef {
        FileRef::Located(LogLocation::parse(BUILD_LOG, "www").unwrap())
    }

    #[test]
    fn test_pr_evidence() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        assert_eq!(
            links.pr_evidence("12345", "7", "unitTests.log"),
            "https://cmssdt.cern.ch/SDT/jenkins-artifacts/pull-request-integration/PR-12345/7/unitTests.log"
        );
    }

    #[test]
    fn test_comparison_results_per_variant() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        assert_eq!(
            links.comparison_results(ComparisonVariant::Gpu, IB, "12345", "5021"),
            format!("https://cmssdt.cern.ch/SDT/jenkins-artifacts/baseLineComparisonsGPU/{IB}+12345/5021/")
        );
        assert!(links
            .comparison_results(ComparisonVariant::Nano, IB, "1", "2")
            .starts_with(&config.comparison_roots.nano));
    }

    #[test]
    fn test_build_log_links() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let url = links.architecture_evidence(CategoryType::Builds, &located(), "slc7_amd64_gcc700", IB);
        assert_eq!(
            url,
            EvidenceUrl::Link(format!(
                "https://cmssdt.cern.ch/SDT/cgi-bin/showBuildLogs.py/slc7_amd64_gcc700/www/tue/11.0-tue-23/{IB}"
            ))
        );
    }

    #[test]
    fn test_not_ready_links() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let arch = "slc7_amd64_gcc700";
        assert_eq!(
            links.architecture_evidence(CategoryType::UnitTests, &FileRef::NotReady, arch, IB),
            EvidenceUrl::Link(format!("https://cms-sw.github.io/scramDetail.html#{arch};{IB}"))
        );
        assert_eq!(
            links.architecture_evidence(CategoryType::RelVals, &FileRef::NotReady, arch, IB),
            EvidenceUrl::Link(format!("https://cms-sw.github.io/relvalLogDetail.html#{arch};{IB}"))
        );
        assert_eq!(
            links.architecture_evidence(CategoryType::FwLite, &FileRef::NotReady, arch, IB),
            EvidenceUrl::Unavailable
        );
        assert_eq!(
            links.architecture_evidence(CategoryType::AddOns, &FileRef::NotReady, arch, IB),
            EvidenceUrl::Unavailable
        );
    }

    #[test]
    fn test_relval_and_addon_links() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        assert_eq!(
            links.architecture_evidence(CategoryType::RelVals, &located(), "x", IB),
            EvidenceUrl::Link(format!(
                "https://cms-sw.github.io/relvalLogDetail.html#slc7_amd64_gcc700;{IB}"
            ))
        );
        let addon = links.architecture_evidence(CategoryType::AddOns, &located(), "x", IB);
        assert!(addon.as_href().ends_with(&format!("{IB}/addOnTests/")));
        assert!(addon.as_href().starts_with(&config.log_server.addon_logs));
    }

    #[test]
    fn test_unrecognized_file_has_no_link() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        let file = FileRef::Unrecognized("odd.log".to_string());
        for category in [CategoryType::Builds, CategoryType::RelVals, CategoryType::Other] {
            assert_eq!(
                links.architecture_evidence(category, &file, "x", IB),
                EvidenceUrl::Unavailable
            );
        }
    }

    #[test]
    fn test_tag_links() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        assert_eq!(
            links.tag(IB).url,
            format!("https://github.com/cms-sw/cmssw/tree/{IB}")
        );
        assert_eq!(
            links.tag("CMSSW_11_0_X").url,
            "https://github.com/cms-sw/cmssw/commits/CMSSW_11_0_X"
        );
        let release = links.tag("CMSSW_11_0_0");
        assert_eq!(release.kind, TagKind::Release);
        assert_eq!(release.url, "https://github.com/cms-sw/cmssw/releases/tag/CMSSW_11_0_0");
    }

    #[test]
    fn test_header_links() {
        let config = DashboardConfig::default();
        let links = LinkBuilder::new(&config);
        assert_eq!(links.ib_page(IB), format!("https://cmssdt.cern.ch/SDT/html/showIB.html#{IB}"));
        assert_eq!(links.pull_request("42"), "https://github.com/cms-sw/cmssw/pull/42");
        assert_eq!(
            links.compare("A", "B"),
            "https://github.com/cms-sw/cmssw/compare/A...B"
        );
        assert_eq!(
            links.qa("slc7_amd64_gcc700", IB),
            format!("https://cmssdt.cern.ch/SDT/cgi-bin/newQA.py?arch=slc7_amd64_gcc700&release={IB}")
        );
        assert_eq!(
            links.artifact("ib-dqm-tests", IB),
            format!("https://cmssdt.cern.ch/SDT/jenkins-artifacts/ib-dqm-tests/{IB}")
        );
    }
}
