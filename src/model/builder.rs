//! Report construction from flat finding records.
//!
//! Scanner output arrives as one record per (host, port, vulnerability)
//! finding. The builder merges records describing the same vulnerability,
//! assigns host keys, and cross-links vulnerabilities and hosts so that the
//! finished [`Report`] satisfies the registry contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{trace, warn};

use super::host::{Host, HostKey, HostRef};
use super::port::Port;
use super::registry::ResultTree;
use super::vulnerability::Vulnerability;
use crate::error::{ReportError, Result};
use crate::severity::{Level, NO_CVSS, Thresholds};

/// One finding as produced by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingRecord {
    pub ip: String,
    pub hostname: String,
    /// Port number; absent for findings with no port information.
    pub port: Option<u16>,
    pub protocol: String,
    pub port_result: String,
    pub name: String,
    pub family: String,
    #[serde(default = "default_cvss")]
    pub cvss: f64,
    pub description: String,
    pub impact: String,
    pub solution: String,
    pub solution_type: String,
    pub insight: String,
    pub detect: String,
    pub affected: String,
    pub vuln_id: String,
    pub cves: Vec<String>,
    pub references: Vec<String>,
}

fn default_cvss() -> f64 {
    NO_CVSS
}

impl FindingRecord {
    fn port(&self) -> Option<Port> {
        self.port.map(|number| {
            let protocol = if self.protocol.is_empty() {
                "tcp"
            } else {
                self.protocol.as_str()
            };
            Port::new(number, protocol).with_result(self.port_result.clone())
        })
    }

    /// Merge key: the scanner's identifier, or the name when it has none.
    fn identity(&self) -> &str {
        if self.vuln_id.is_empty() {
            &self.name
        } else {
            &self.vuln_id
        }
    }
}

/// A finished report: the host registry plus the flat vulnerability list.
///
/// Both views share the same `Arc<Vulnerability>` values.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub tree: ResultTree,
    pub vulnerabilities: Vec<Arc<Vulnerability>>,
}

impl Report {
    pub fn host_count(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vulnerabilities.is_empty()
    }

    /// Check the registry and that every occurrence resolves into it.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()?;

        for (position, vuln) in self.vulnerabilities.iter().enumerate() {
            for occurrence in &vuln.hosts {
                let host = self.tree.get(&occurrence.host.key).ok_or_else(|| {
                    ReportError::invalid(
                        format!("vulnerability #{} '{}'", position + 1, vuln.name),
                        format!("references unknown host '{}'", occurrence.host.key),
                    )
                })?;
                if host.ip != occurrence.host.ip {
                    return Err(ReportError::invalid(
                        format!("vulnerability #{} '{}'", position + 1, vuln.name),
                        format!(
                            "occurrence IP {} does not match host '{}' ({})",
                            occurrence.host.ip, occurrence.host.key, host.ip
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
struct StagedHost {
    key: HostKey,
    ip: String,
    host_name: String,
}

#[derive(Debug)]
struct Placement {
    host: usize,
    vuln: usize,
    port: Option<Port>,
}

/// Accumulates finding records into a [`Report`].
#[derive(Debug)]
pub struct ReportBuilder {
    thresholds: Thresholds,
    min_level: Level,
    hosts: Vec<StagedHost>,
    host_index: HashMap<String, usize>,
    vulns: Vec<Vulnerability>,
    vuln_index: HashMap<String, usize>,
    placements: Vec<Placement>,
    records: usize,
    filtered: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl ReportBuilder {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            min_level: Level::None,
            hosts: Vec::new(),
            host_index: HashMap::new(),
            vulns: Vec::new(),
            vuln_index: HashMap::new(),
            placements: Vec::new(),
            records: 0,
            filtered: 0,
        }
    }

    /// Drop findings classified below `level`.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Add one finding.
    ///
    /// Returns `Ok(false)` when the record was filtered by the minimum level
    /// or repeats an occurrence already recorded.
    pub fn add(&mut self, record: &FindingRecord) -> Result<bool> {
        self.records += 1;
        let entry = format!("finding #{}", self.records);

        if record.ip.trim().is_empty() {
            return Err(ReportError::invalid(entry, "missing host IP"));
        }
        if record.name.trim().is_empty() {
            return Err(ReportError::invalid(entry, "missing vulnerability name"));
        }

        let level = self
            .thresholds
            .classify(record.cvss)
            .map_err(|e| ReportError::invalid(&entry, e.to_string()))?;
        if level < self.min_level {
            trace!(name = %record.name, %level, "below minimum level, skipped");
            self.filtered += 1;
            return Ok(false);
        }

        let host = self.stage_host(record);
        let vuln = self.stage_vuln(record)?;
        let port = record.port();

        let host_ref = HostRef::new(self.hosts[host].key.clone(), self.hosts[host].ip.clone());
        if !self.vulns[vuln].add_occurrence(host_ref, port.clone()) {
            warn!(
                ip = %record.ip,
                name = %record.name,
                "duplicate finding for the same host and port, skipped"
            );
            return Ok(false);
        }

        trace!(ip = %record.ip, name = %record.name, %level, "finding added");
        self.placements.push(Placement { host, vuln, port });
        Ok(true)
    }

    /// Add every record, stopping at the first invalid one.
    pub fn add_all<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a FindingRecord>,
    ) -> Result<usize> {
        let mut added = 0;
        for record in records {
            if self.add(record)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn stage_host(&mut self, record: &FindingRecord) -> usize {
        if let Some(&index) = self.host_index.get(&record.ip) {
            let staged = &mut self.hosts[index];
            if staged.host_name.is_empty() && !record.hostname.is_empty() {
                staged.host_name = record.hostname.clone();
            }
            return index;
        }

        let index = self.hosts.len();
        self.hosts.push(StagedHost {
            key: HostKey::new(format!("host-{}", index + 1)),
            ip: record.ip.clone(),
            host_name: record.hostname.clone(),
        });
        self.host_index.insert(record.ip.clone(), index);
        index
    }

    fn stage_vuln(&mut self, record: &FindingRecord) -> Result<usize> {
        if let Some(&index) = self.vuln_index.get(record.identity()) {
            let existing = &mut self.vulns[index];
            if existing.cvss() != record.cvss {
                warn!(
                    name = %record.name,
                    kept = existing.cvss(),
                    ignored = record.cvss,
                    "conflicting CVSS for the same vulnerability"
                );
            }
            existing.cves.extend(record.cves.iter().cloned());
            for reference in &record.references {
                if !existing.references.contains(reference) {
                    existing.references.push(reference.clone());
                }
            }
            return Ok(index);
        }

        let mut vuln = Vulnerability::new(record.name.clone(), record.cvss, &self.thresholds)?
            .with_family(record.family.clone())
            .with_vuln_id(record.vuln_id.clone())
            .with_cves(record.cves.iter().cloned())
            .with_references(record.references.iter().cloned());
        vuln.description = record.description.clone();
        vuln.impact = record.impact.clone();
        vuln.solution = record.solution.clone();
        vuln.solution_type = record.solution_type.clone();
        vuln.insight = record.insight.clone();
        vuln.detect = record.detect.clone();
        vuln.affected = record.affected.clone();

        let index = self.vulns.len();
        self.vulns.push(vuln);
        self.vuln_index.insert(record.identity().to_string(), index);
        Ok(index)
    }

    /// Number of records skipped by the minimum level filter.
    pub fn filtered(&self) -> usize {
        self.filtered
    }

    /// Freeze the staged data into a cross-linked report.
    pub fn build(self) -> Report {
        let vulnerabilities: Vec<Arc<Vulnerability>> =
            self.vulns.into_iter().map(Arc::new).collect();

        let mut tree = ResultTree::new();
        for staged in &self.hosts {
            tree.insert(
                staged.key.clone(),
                Host::new(staged.ip.clone(), staged.host_name.clone()),
            );
        }

        for placement in self.placements {
            let key = &self.hosts[placement.host].key;
            if let Some(host) = tree.get_mut(key) {
                host.push(
                    Arc::clone(&vulnerabilities[placement.vuln]),
                    placement.port,
                );
            }
        }

        Report {
            tree,
            vulnerabilities,
        }
    }
}
