pub mod csv;
pub mod json;
pub mod terminal;

use crate::aggregator::{Collections, Summary, SummaryBuilder, aggregate};
use crate::error::Result;
use crate::model::{Host, HostKey, Report};
use crate::ranking::HostRankings;

/// Everything an exporter reads: the report, its aggregated collections and
/// both host orderings. Computed once per export.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub report: &'a Report,
    pub collections: Collections<'a>,
    pub summary: Summary,
    /// Host keys by severity counts.
    pub severity_ranking: Vec<HostKey>,
    /// Host keys by cumulative CVSS.
    pub cumulative_ranking: Vec<HostKey>,
    pub top_hosts: usize,
}

impl<'a> ReportContext<'a> {
    /// Validate `report` once and derive the collections and rankings.
    pub fn new(report: &'a Report, top_hosts: usize) -> Result<Self> {
        report.validate()?;
        let collections = aggregate(&report.vulnerabilities)?;
        let rankings = HostRankings::from_validated(&report.tree);
        let summary = SummaryBuilder::new().with_collections(&collections).build();

        Ok(Self {
            report,
            collections,
            summary,
            severity_ranking: rankings.by_severity,
            cumulative_ranking: rankings.by_cumulative_cvss,
            top_hosts,
        })
    }

    /// Resolve ranked keys to hosts, skipping any key not in the registry.
    fn resolve<'k>(&'k self, keys: &'k [HostKey]) -> impl Iterator<Item = &'a Host> + 'k {
        keys.iter().filter_map(|key| self.report.tree.get(key))
    }

    /// The first `top_hosts` hosts by severity that have findings.
    pub fn top_ranked_hosts(&self) -> Vec<&'a Host> {
        self.resolve(&self.severity_ranking)
            .filter(|h| !h.is_empty())
            .take(self.top_hosts)
            .collect()
    }

    /// Hosts with findings, by cumulative CVSS.
    pub fn hosts_by_cumulative_cvss(&self) -> Vec<&'a Host> {
        self.resolve(&self.cumulative_ranking)
            .filter(|h| !h.is_empty())
            .collect()
    }
}

pub trait Reporter {
    fn report(&self, ctx: &ReportContext<'_>) -> Result<String>;
}
