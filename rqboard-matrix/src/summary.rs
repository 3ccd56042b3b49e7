//! PR summary assembly

use crate::links::LinkBuilder;
use rqboard_core::{CellDescriptor, OutcomeMap};
use serde::{Deserialize, Serialize};

/// A labelled header link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLink {
    pub label: String,
    pub url: String,
}

/// Header links and result row of one PR test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrSummary {
    pub pr_number: String,
    pub build_number: String,
    pub base_ib: String,
    /// IB page of the base IB
    pub ib_link: HeaderLink,
    pub pr_link: HeaderLink,
    /// Pull requests tested together with the main one, from
    /// `ADDITIONAL_PRS` then `PR_NUMBERS`, without repeats
    pub additional_prs: Vec<HeaderLink>,
    /// IB page of the IB the comparisons ran against
    pub comparison_ib: Option<HeaderLink>,
    /// Baseline results of the base IB
    pub baseline_link: HeaderLink,
    pub row: Vec<CellDescriptor>,
}

impl PrSummary {
    pub(crate) fn new(map: &OutcomeMap, row: Vec<CellDescriptor>, links: &LinkBuilder<'_>) -> Self {
        let base_ib = map.base_ib();
        let pr_number = map.pr_number();
        Self {
            pr_number: pr_number.to_string(),
            build_number: map.build_number().to_string(),
            base_ib: base_ib.to_string(),
            ib_link: HeaderLink {
                label: base_ib.to_string(),
                url: links.ib_page(base_ib),
            },
            pr_link: HeaderLink {
                label: format!("#{pr_number}"),
                url: links.pull_request(pr_number),
            },
            additional_prs: companion_prs(map)
                .into_iter()
                .map(|pr| HeaderLink {
                    label: format!("#{pr}"),
                    url: links.pull_request(pr),
                })
                .collect(),
            comparison_ib: map.comparison_ib().map(|ib| HeaderLink {
                label: ib.to_string(),
                url: links.ib_page(ib),
            }),
            baseline_link: HeaderLink {
                label: "See baseline results".to_string(),
                url: links.ib_baseline(base_ib),
            },
            row,
        }
    }
}

fn companion_prs(map: &OutcomeMap) -> Vec<&str> {
    let mut prs: Vec<&str> = Vec::new();
    for pr in map.additional_prs().into_iter().chain(map.pr_numbers()) {
        if pr != map.pr_number() && !prs.contains(&pr) {
            prs.push(pr);
        }
    }
    prs
}
