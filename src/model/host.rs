use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::port::Port;
use super::vulnerability::Vulnerability;
use crate::severity::{Level, LevelCounts, NO_CVSS};

/// Synthetic registry key for a host.
///
/// Keys carry no meaning beyond uniqueness; presentation order always comes
/// from the ranking functions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostKey(String);

impl HostKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HostKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HostKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for HostKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning back-reference from a vulnerability occurrence to a host.
///
/// Resolves through the registry by `key`; `ip` is carried alongside so that
/// aggregation can deduplicate hosts without a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostRef {
    pub key: HostKey,
    pub ip: String,
}

impl HostRef {
    pub fn new(key: impl Into<HostKey>, ip: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ip: ip.into(),
        }
    }
}

/// One entry of a host's finding list: a shared vulnerability and the port
/// it was seen on for this host.
#[derive(Debug, Clone)]
pub struct HostFinding {
    pub vuln: Arc<Vulnerability>,
    pub port: Option<Port>,
}

/// A scanned host and the findings reported against it.
///
/// `nv` and `higher_cvss` are caches over `vuln_list`; they are recomputed on
/// every change and cannot be set directly.
#[derive(Debug, Clone)]
pub struct Host {
    pub ip: String,
    pub host_name: String,
    vuln_list: Vec<HostFinding>,
    nv: LevelCounts,
    higher_cvss: f64,
}

impl Host {
    pub fn new(ip: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            host_name: host_name.into(),
            vuln_list: Vec::new(),
            nv: LevelCounts::new(),
            higher_cvss: NO_CVSS,
        }
    }

    /// Attach a finding and refresh the derived caches.
    pub fn push(&mut self, vuln: Arc<Vulnerability>, port: Option<Port>) {
        self.vuln_list.push(HostFinding { vuln, port });
        self.recompute();
    }

    /// Rebuild `nv` and `higher_cvss` from `vuln_list`.
    fn recompute(&mut self) {
        let mut nv = LevelCounts::new();
        let mut higher = NO_CVSS;
        for finding in &self.vuln_list {
            nv.increment(finding.vuln.level());
            higher = higher.max(finding.vuln.cvss());
        }
        self.nv = nv;
        self.higher_cvss = higher;
    }

    pub fn vuln_list(&self) -> &[HostFinding] {
        &self.vuln_list
    }

    /// Findings per level.
    pub fn nv(&self) -> &LevelCounts {
        &self.nv
    }

    pub fn count(&self, level: Level) -> usize {
        self.nv.get(level)
    }

    /// Highest CVSS across the host's findings, `-1.0` when there are none.
    pub fn higher_cvss(&self) -> f64 {
        self.higher_cvss
    }

    /// Sum of CVSS scores across findings; unscored findings add nothing.
    pub fn cumulative_cvss(&self) -> f64 {
        self.vuln_list
            .iter()
            .map(|f| f.vuln.cvss().max(0.0))
            .sum()
    }

    /// Most severe level among the findings, `None` for an empty host.
    pub fn max_level(&self) -> Level {
        Level::ALL
            .into_iter()
            .find(|&level| self.nv.get(level) > 0)
            .unwrap_or(Level::None)
    }

    pub fn total(&self) -> usize {
        self.vuln_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vuln_list.is_empty()
    }

    /// Display label, `ip - host_name` or just the IP when unnamed.
    pub fn label(&self) -> String {
        if self.host_name.is_empty() {
            self.ip.clone()
        } else {
            format!("{} - {}", self.ip, self.host_name)
        }
    }
}
