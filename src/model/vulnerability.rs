use std::collections::{BTreeSet, HashSet};

use super::host::HostRef;
use super::port::Port;
use crate::severity::{Level, SeverityError, Thresholds};

/// One (host, port) pairing a vulnerability was reported on.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub host: HostRef,
    pub port: Option<Port>,
}

/// A reported vulnerability, shared by every host it was found on.
///
/// `level` is derived from `cvss` at construction and the pair cannot be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Vulnerability {
    pub name: String,
    pub family: String,
    cvss: f64,
    level: Level,
    pub description: String,
    pub impact: String,
    pub solution: String,
    pub solution_type: String,
    pub insight: String,
    pub detect: String,
    pub affected: String,
    pub vuln_id: String,
    pub cves: BTreeSet<String>,
    pub references: Vec<String>,
    /// Occurrences in insertion order. Append through
    /// [`add_occurrence`](Self::add_occurrence) so the duplicate index stays
    /// in step.
    pub hosts: Vec<Occurrence>,
    seen: HashSet<(HostRef, Option<Port>)>,
}

impl Vulnerability {
    /// Create a vulnerability, classifying `cvss` with `thresholds`.
    pub fn new(
        name: impl Into<String>,
        cvss: f64,
        thresholds: &Thresholds,
    ) -> Result<Self, SeverityError> {
        let level = thresholds.classify(cvss)?;
        Ok(Self {
            name: name.into(),
            family: String::new(),
            cvss,
            level,
            description: String::new(),
            impact: String::new(),
            solution: String::new(),
            solution_type: String::new(),
            insight: String::new(),
            detect: String::new(),
            affected: String::new(),
            vuln_id: String::new(),
            cves: BTreeSet::new(),
            references: Vec::new(),
            hosts: Vec::new(),
            seen: HashSet::new(),
        })
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_vuln_id(mut self, vuln_id: impl Into<String>) -> Self {
        self.vuln_id = vuln_id.into();
        self
    }

    pub fn with_cves<I, S>(mut self, cves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cves.extend(cves.into_iter().map(Into::into));
        self
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for reference in references.into_iter().map(Into::into) {
            if !self.references.contains(&reference) {
                self.references.push(reference);
            }
        }
        self
    }

    /// Record an occurrence on `host`/`port`.
    ///
    /// Returns `false` without recording when the same pairing is already
    /// present.
    pub fn add_occurrence(&mut self, host: HostRef, port: Option<Port>) -> bool {
        if !self.seen.insert((host.clone(), port.clone())) {
            return false;
        }
        self.hosts.push(Occurrence { host, port });
        true
    }

    pub fn cvss(&self) -> f64 {
        self.cvss
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of distinct host IPs among the occurrences.
    pub fn distinct_host_count(&self) -> usize {
        self.hosts
            .iter()
            .map(|o| o.host.ip.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
