use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregator::{FamilyCounts, LevelRow};
use crate::error::Result;
use crate::model::Host;
use crate::reporter::{ReportContext, Reporter};
use crate::severity::{Level, LevelCounts};

#[derive(Debug, Serialize)]
struct Totals {
    vulnerabilities: usize,
    hosts: usize,
    affected_hosts: usize,
}

#[derive(Debug, Serialize)]
struct VulnerabilityEntry<'a> {
    name: &'a str,
    cvss: f64,
    level: Level,
    family: &'a str,
    hosts: usize,
}

#[derive(Debug, Serialize)]
struct HostEntry<'a> {
    ip: &'a str,
    hostname: &'a str,
    levels: &'a LevelCounts,
    total: usize,
    higher_cvss: f64,
    level: Level,
}

impl<'a> HostEntry<'a> {
    fn from_host(host: &'a Host) -> Self {
        Self {
            ip: &host.ip,
            hostname: &host.host_name,
            levels: host.nv(),
            total: host.total(),
            higher_cvss: host.higher_cvss(),
            level: host.max_level(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    generated_at: DateTime<Utc>,
    totals: Totals,
    levels: &'a [LevelRow],
    families: &'a FamilyCounts,
    vulnerabilities: Vec<VulnerabilityEntry<'a>>,
    host_ranking: Vec<HostEntry<'a>>,
}

/// Pretty-printed JSON summary document.
pub struct JsonReporter {
    generated_at: DateTime<Utc>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
        }
    }

    /// Fix the timestamp written to `generated_at`.
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn report(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let document = SummaryDocument {
            generated_at: self.generated_at,
            totals: Totals {
                vulnerabilities: ctx.summary.total_vulnerabilities,
                hosts: ctx.report.host_count(),
                affected_hosts: ctx.summary.distinct_hosts,
            },
            levels: &ctx.summary.levels,
            families: &ctx.collections.family_counts,
            vulnerabilities: ctx
                .collections
                .sorted
                .iter()
                .map(|v| VulnerabilityEntry {
                    name: &v.name,
                    cvss: v.cvss(),
                    level: v.level(),
                    family: &v.family,
                    hosts: v.distinct_host_count(),
                })
                .collect(),
            host_ranking: ctx
                .top_ranked_hosts()
                .into_iter()
                .map(HostEntry::from_host)
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }
}
