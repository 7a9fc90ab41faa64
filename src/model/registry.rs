use std::collections::hash_map;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::host::{Host, HostKey};
use super::port::Port;
use super::vulnerability::Vulnerability;
use crate::error::{ReportError, Result};

type OccurrenceSet<'a> = HashSet<(&'a HostKey, &'a str, Option<&'a Port>)>;

/// Keyed container of hosts for one report.
///
/// Iteration order is unspecified; use the ranking functions for any order
/// that reaches output.
#[derive(Debug, Clone, Default)]
pub struct ResultTree {
    hosts: HashMap<HostKey, Host>,
}

impl ResultTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a host, returning the previous entry stored under `key`.
    pub fn insert(&mut self, key: HostKey, host: Host) -> Option<Host> {
        self.hosts.insert(key, host)
    }

    pub fn get(&self, key: &HostKey) -> Option<&Host> {
        self.hosts.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &HostKey) -> Option<&mut Host> {
        self.hosts.get_mut(key)
    }

    pub fn keys(&self) -> hash_map::Keys<'_, HostKey, Host> {
        self.hosts.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, HostKey, Host> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Check every entry against the host contract.
    ///
    /// Entries are visited in key order so the same registry always reports
    /// the same first problem. Checks: non-empty IP, IPs unique across the
    /// registry, and every finding on a host carries a matching occurrence
    /// pointing back at that host.
    ///
    /// Each shared vulnerability's occurrences are indexed once, the first
    /// time a host referencing it is checked.
    pub fn validate(&self) -> Result<()> {
        let mut keys: Vec<&HostKey> = self.hosts.keys().collect();
        keys.sort();

        let mut seen_ips: HashMap<&str, &HostKey> = HashMap::new();
        let mut occurrences: HashMap<*const Vulnerability, OccurrenceSet<'_>> = HashMap::new();

        for key in keys {
            let host = &self.hosts[key];
            let entry = format!("host '{}'", key);

            if host.ip.trim().is_empty() {
                return Err(ReportError::invalid(entry, "empty IP address"));
            }

            if let Some(other) = seen_ips.insert(host.ip.as_str(), key) {
                return Err(ReportError::invalid(
                    entry,
                    format!("IP {} is already registered under '{}'", host.ip, other),
                ));
            }

            for finding in host.vuln_list() {
                let linked = occurrences
                    .entry(Arc::as_ptr(&finding.vuln))
                    .or_insert_with(|| {
                        finding
                            .vuln
                            .hosts
                            .iter()
                            .map(|o| (&o.host.key, o.host.ip.as_str(), o.port.as_ref()))
                            .collect()
                    })
                    .contains(&(key, host.ip.as_str(), finding.port.as_ref()));
                if !linked {
                    return Err(ReportError::invalid(
                        entry,
                        format!(
                            "finding '{}' has no occurrence pointing back at {}",
                            finding.vuln.name, host.ip
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultTree {
    type Item = (&'a HostKey, &'a Host);
    type IntoIter = hash_map::Iter<'a, HostKey, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HostRef, Port};
    use crate::test_utils::fixtures::vuln;
    use std::sync::Arc;

    fn linked_host(key: &str, ip: &str, name: &str, cvss: f64) -> Host {
        let mut v = vuln(name, cvss);
        v.add_occurrence(HostRef::new(key, ip), Some(Port::new(80, "tcp")));
        let mut host = Host::new(ip, "");
        host.push(Arc::new(v), Some(Port::new(80, "tcp")));
        host
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut tree = ResultTree::new();
        assert!(tree.is_empty());
        tree.insert(HostKey::from("host-1"), Host::new("10.0.0.1", "a"));
        tree.insert(HostKey::from("host-2"), Host::new("10.0.0.2", "b"));

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(&HostKey::from("host-1")).unwrap().ip, "10.0.0.1");
        assert_eq!(tree.get(&HostKey::from("host-2")).unwrap().host_name, "b");
        assert!(tree.get(&HostKey::from("host-9")).is_none());
    }

    #[test]
    fn test_validate_accepts_linked_entries() {
        let mut tree = ResultTree::new();
        tree.insert(
            HostKey::from("host-1"),
            linked_host("host-1", "10.0.0.1", "A", 9.0),
        );
        tree.insert(HostKey::from("host-2"), Host::new("10.0.0.2", ""));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_ip() {
        let mut tree = ResultTree::new();
        tree.insert(HostKey::from("host-1"), Host::new("  ", ""));
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("empty IP address"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ip() {
        let mut tree = ResultTree::new();
        tree.insert(HostKey::from("host-1"), Host::new("10.0.0.1", ""));
        tree.insert(HostKey::from("host-2"), Host::new("10.0.0.1", ""));
        let err = tree.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid host 'host-2': IP 10.0.0.1 is already registered under 'host-1'"
        );
    }

    #[test]
    fn test_validate_rejects_unlinked_finding() {
        let mut host = Host::new("10.0.0.1", "");
        host.push(Arc::new(vuln("Orphan", 5.0)), None);

        let mut tree = ResultTree::new();
        tree.insert(HostKey::from("host-1"), host);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("'Orphan' has no occurrence"));
    }

    #[test]
    fn test_validate_rejects_occurrence_on_other_port() {
        let mut v = vuln("Telnet", 6.0);
        v.add_occurrence(HostRef::new("host-1", "10.0.0.1"), Some(Port::new(23, "tcp")));
        let mut host = Host::new("10.0.0.1", "");
        host.push(Arc::new(v), Some(Port::new(2323, "tcp")));

        let mut tree = ResultTree::new();
        tree.insert(HostKey::from("host-1"), host);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("'Telnet' has no occurrence"));
    }

    #[test]
    fn test_validate_shared_vulnerability_on_many_hosts() {
        let mut shared = vuln("ICMP timestamp", 2.1);
        let keys: Vec<(String, String)> = (0..5_000u32)
            .map(|i| (format!("host-{i}"), format!("10.0.{}.{}", i / 256, i % 256)))
            .collect();
        for (key, ip) in &keys {
            shared.add_occurrence(HostRef::new(key.as_str(), ip.as_str()), None);
        }
        let shared = Arc::new(shared);

        let mut tree = ResultTree::new();
        for (key, ip) in &keys {
            let mut host = Host::new(ip.as_str(), "");
            host.push(Arc::clone(&shared), None);
            tree.insert(HostKey::from(key.as_str()), host);
        }
        assert!(tree.validate().is_ok());

        // one host whose finding is not backed by an occurrence
        let mut stray = Host::new("10.9.9.9", "");
        stray.push(Arc::clone(&shared), None);
        tree.insert(HostKey::from("host-stray"), stray);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().starts_with("Invalid host 'host-stray'"));
    }
}
