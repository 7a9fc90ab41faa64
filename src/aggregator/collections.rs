//! Per-report collections: sorted vulnerabilities and summary counters.

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::error::{ReportError, Result};
use crate::model::Vulnerability;
use crate::severity::{CVSS_MAX, CVSS_MIN, Level, LevelCounts};

/// Vulnerability counts per family, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyCounts {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FamilyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, family: &str) {
        match self.index.get(family) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(family.to_string(), self.entries.len());
                self.entries.push((family.to_string(), 1));
            }
        }
    }

    pub fn get(&self, family: &str) -> usize {
        self.index
            .get(family)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for FamilyCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        #[derive(Serialize)]
        struct Entry<'a> {
            family: &'a str,
            count: usize,
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (family, count) in self.iter() {
            seq.serialize_element(&Entry { family, count })?;
        }
        seq.end()
    }
}

/// Everything exporters need from one vulnerability list.
#[derive(Debug, Clone)]
pub struct Collections<'a> {
    /// CVSS descending, name ascending on ties.
    pub sorted: Vec<&'a Vulnerability>,
    /// Vulnerabilities (not occurrences) per level.
    pub level_counts: LevelCounts,
    /// Distinct host IPs per level.
    pub affected_host_counts: LevelCounts,
    pub family_counts: FamilyCounts,
}

impl Collections<'_> {
    /// Distinct host IPs across all levels.
    pub fn distinct_hosts(&self) -> usize {
        self.sorted
            .iter()
            .flat_map(|v| v.hosts.iter().map(|o| o.host.ip.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Order vulnerabilities by CVSS descending, then name ascending.
///
/// Two stable passes (name, then CVSS) so equal scores keep name order and
/// re-sorting a sorted sequence is a no-op.
pub fn sort_vulnerabilities<V: Borrow<Vulnerability>>(vulnerabilities: &[V]) -> Vec<&Vulnerability> {
    let mut sorted: Vec<&Vulnerability> = vulnerabilities.iter().map(Borrow::borrow).collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted.sort_by(|a, b| b.cvss().total_cmp(&a.cvss()));
    sorted
}

fn validate<V: Borrow<Vulnerability>>(vulnerabilities: &[V]) -> Result<()> {
    for (position, vuln) in vulnerabilities.iter().map(Borrow::borrow).enumerate() {
        let entry = || format!("vulnerability #{}", position + 1);

        if vuln.name.trim().is_empty() {
            return Err(ReportError::invalid(entry(), "missing name"));
        }
        if !(CVSS_MIN..=CVSS_MAX).contains(&vuln.cvss()) {
            return Err(ReportError::invalid(
                entry(),
                format!("'{}' has CVSS {} outside [-1.0, 10.0]", vuln.name, vuln.cvss()),
            ));
        }
        if let Some(o) = vuln.hosts.iter().find(|o| o.host.ip.trim().is_empty()) {
            return Err(ReportError::invalid(
                entry(),
                format!("'{}' has an occurrence on host '{}' without an IP", vuln.name, o.host.key),
            ));
        }
    }
    Ok(())
}

/// Sort `vulnerabilities` and derive the per-level and per-family counters.
///
/// Every element is validated before any counting starts. The input is only
/// borrowed; the sorted view is a new vector.
pub fn aggregate<V: Borrow<Vulnerability>>(vulnerabilities: &[V]) -> Result<Collections<'_>> {
    validate(vulnerabilities)?;
    let sorted = sort_vulnerabilities(vulnerabilities);

    let mut level_counts = LevelCounts::new();
    let mut family_counts = FamilyCounts::new();
    let mut hosts_by_level: [HashSet<&str>; Level::COUNT] = Default::default();

    for vuln in &sorted {
        let level = vuln.level();
        level_counts.increment(level);
        hosts_by_level[level.index()].extend(vuln.hosts.iter().map(|o| o.host.ip.as_str()));
        family_counts.increment(&vuln.family);
    }

    let mut affected_host_counts = LevelCounts::new();
    for level in Level::ALL {
        affected_host_counts.set(level, hosts_by_level[level.index()].len());
    }

    debug!(
        vulnerabilities = sorted.len(),
        critical = level_counts[Level::Critical],
        high = level_counts[Level::High],
        medium = level_counts[Level::Medium],
        low = level_counts[Level::Low],
        none = level_counts[Level::None],
        families = family_counts.len(),
        "aggregated vulnerabilities"
    );
    for (family, count) in family_counts.iter() {
        trace!(family, count, "family count");
    }

    Ok(Collections {
        sorted,
        level_counts,
        affected_host_counts,
        family_counts,
    })
}
