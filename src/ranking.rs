//! Host ordering for host-centric report sections.
//!
//! Registry iteration order is unspecified, so every ordering ends with an
//! IP comparison; IPs are unique within a validated registry, which makes
//! the result a total order.

use std::cmp::Ordering;
use std::net::IpAddr;
use tracing::debug;

use crate::error::Result;
use crate::model::{Host, HostKey, ResultTree};
use crate::severity::Level;

/// Ascending IP order over the key `(parsed address, text)`.
///
/// Strings that do not parse as an address sort before all addresses,
/// among themselves by text; addresses compare numerically. The key is
/// total, so mixed registries still sort deterministically.
pub fn compare_ips(a: &str, b: &str) -> Ordering {
    ip_key(a).cmp(&ip_key(b))
}

fn ip_key(ip: &str) -> (Option<IpAddr>, &str) {
    (ip.parse::<IpAddr>().ok(), ip)
}

fn severity_order(a: &Host, b: &Host) -> Ordering {
    // hosts with findings first
    a.is_empty()
        .cmp(&b.is_empty())
        .then_with(|| b.count(Level::Critical).cmp(&a.count(Level::Critical)))
        .then_with(|| b.count(Level::High).cmp(&a.count(Level::High)))
        .then_with(|| b.count(Level::Medium).cmp(&a.count(Level::Medium)))
        .then_with(|| b.count(Level::Low).cmp(&a.count(Level::Low)))
        .then_with(|| b.higher_cvss().total_cmp(&a.higher_cvss()))
        .then_with(|| compare_ips(&a.ip, &b.ip))
}

fn cumulative_order(a: &Host, b: &Host) -> Ordering {
    b.cumulative_cvss()
        .total_cmp(&a.cumulative_cvss())
        .then_with(|| compare_ips(&a.ip, &b.ip))
}

fn rank_by(registry: &ResultTree, order: fn(&Host, &Host) -> Ordering) -> Vec<HostKey> {
    let mut entries: Vec<(&HostKey, &Host)> = registry.iter().collect();
    entries.sort_by(|(_, a), (_, b)| order(a, b));

    debug!(hosts = entries.len(), "ranked hosts");
    entries.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Host keys ordered by critical, high, medium and low counts (descending),
/// then highest CVSS (descending), then IP. Hosts without findings come last.
pub fn rank_hosts_by_severity(registry: &ResultTree) -> Result<Vec<HostKey>> {
    registry.validate()?;
    Ok(rank_by(registry, severity_order))
}

/// Host keys ordered by the sum of their findings' CVSS (descending), then IP.
pub fn rank_hosts_by_cumulative_cvss(registry: &ResultTree) -> Result<Vec<HostKey>> {
    registry.validate()?;
    Ok(rank_by(registry, cumulative_order))
}

/// Both host orderings of one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRankings {
    pub by_severity: Vec<HostKey>,
    pub by_cumulative_cvss: Vec<HostKey>,
}

impl HostRankings {
    /// Validate `registry` once and compute both orderings.
    pub fn new(registry: &ResultTree) -> Result<Self> {
        registry.validate()?;
        Ok(Self::from_validated(registry))
    }

    /// Both orderings of a registry the caller has already validated.
    pub(crate) fn from_validated(registry: &ResultTree) -> Self {
        Self {
            by_severity: rank_by(registry, severity_order),
            by_cumulative_cvss: rank_by(registry, cumulative_order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReportBuilder;
    use crate::severity::NO_CVSS;
    use crate::test_utils::fixtures::record;

    fn ips_of(registry: &ResultTree, keys: &[HostKey]) -> Vec<String> {
        keys.iter()
            .map(|k| registry.get(k).unwrap().ip.clone())
            .collect()
    }

    #[test]
    fn test_critical_count_outranks_total() {
        let mut builder = ReportBuilder::default();
        builder.add(&record("10.0.0.1", "crit", 9.8)).unwrap();
        builder.add(&record("10.0.0.1", "low", 1.0)).unwrap();
        builder.add(&record("10.0.0.2", "high-a", 7.5)).unwrap();
        builder.add(&record("10.0.0.2", "high-b", 8.0)).unwrap();
        let report = builder.build();

        let ranked = rank_hosts_by_severity(&report.tree).unwrap();
        assert_eq!(ips_of(&report.tree, &ranked), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_level_priority_chain() {
        let mut builder = ReportBuilder::default();
        // same high count, more medium wins
        builder.add(&record("10.0.0.1", "h", 7.0)).unwrap();
        builder.add(&record("10.0.0.2", "h", 7.0)).unwrap();
        builder.add(&record("10.0.0.2", "m", 5.0)).unwrap();
        // only low findings
        builder.add(&record("10.0.0.3", "l1", 1.0)).unwrap();
        builder.add(&record("10.0.0.3", "l2", 2.0)).unwrap();
        let report = builder.build();

        let ranked = rank_hosts_by_severity(&report.tree).unwrap();
        assert_eq!(
            ips_of(&report.tree, &ranked),
            vec!["10.0.0.2", "10.0.0.1", "10.0.0.3"]
        );
    }

    #[test]
    fn test_higher_cvss_then_ip_tiebreak() {
        let mut builder = ReportBuilder::default();
        builder.add(&record("10.0.0.10", "a", 9.1)).unwrap();
        builder.add(&record("10.0.0.2", "b", 9.1)).unwrap();
        builder.add(&record("10.0.0.3", "c", 9.9)).unwrap();
        let report = builder.build();

        let ranked = rank_hosts_by_severity(&report.tree).unwrap();
        assert_eq!(
            ips_of(&report.tree, &ranked),
            vec!["10.0.0.3", "10.0.0.2", "10.0.0.10"]
        );
    }

    #[test]
    fn test_hosts_without_findings_last() {
        let mut builder = ReportBuilder::default();
        builder.add(&record("10.0.0.5", "info", NO_CVSS)).unwrap();
        let mut report = builder.build();
        report.tree.insert(
            HostKey::from("host-empty"),
            crate::model::Host::new("10.0.0.1", "idle"),
        );

        let ranked = rank_hosts_by_severity(&report.tree).unwrap();
        assert_eq!(ranked.last(), Some(&HostKey::from("host-empty")));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let mut builder = ReportBuilder::default();
        for i in 1..=20 {
            builder
                .add(&record(&format!("192.168.1.{}", i), "same", 5.0))
                .unwrap();
        }
        let report = builder.build();

        let first = rank_hosts_by_severity(&report.tree).unwrap();
        let second = rank_hosts_by_severity(&report.tree).unwrap();
        assert_eq!(first, second);
        assert_eq!(report.tree.get(&first[0]).unwrap().ip, "192.168.1.1");
        assert_eq!(report.tree.get(&first[19]).unwrap().ip, "192.168.1.20");
    }

    #[test]
    fn test_cumulative_cvss_order() {
        let mut builder = ReportBuilder::default();
        builder.add(&record("10.0.0.1", "crit", 9.0)).unwrap();
        builder.add(&record("10.0.0.2", "m1", 5.0)).unwrap();
        builder.add(&record("10.0.0.2", "m2", 5.0)).unwrap();
        builder.add(&record("10.0.0.3", "info", NO_CVSS)).unwrap();
        builder.add(&record("10.0.0.4", "zero", 0.0)).unwrap();
        let report = builder.build();

        let ranked = rank_hosts_by_cumulative_cvss(&report.tree).unwrap();
        assert_eq!(
            ips_of(&report.tree, &ranked),
            vec!["10.0.0.2", "10.0.0.1", "10.0.0.3", "10.0.0.4"]
        );
    }

    #[test]
    fn test_host_rankings_match_single_orderings() {
        let mut builder = ReportBuilder::default();
        builder.add(&record("10.0.0.1", "crit", 9.8)).unwrap();
        builder.add(&record("10.0.0.2", "m1", 6.0)).unwrap();
        builder.add(&record("10.0.0.2", "m2", 6.0)).unwrap();
        let report = builder.build();

        let rankings = HostRankings::new(&report.tree).unwrap();
        assert_eq!(
            rankings.by_severity,
            rank_hosts_by_severity(&report.tree).unwrap()
        );
        assert_eq!(
            rankings.by_cumulative_cvss,
            rank_hosts_by_cumulative_cvss(&report.tree).unwrap()
        );
        assert_eq!(ips_of(&report.tree, &rankings.by_severity), vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(
            ips_of(&report.tree, &rankings.by_cumulative_cvss),
            vec!["10.0.0.2", "10.0.0.1"]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ResultTree::new();
        assert!(rank_hosts_by_severity(&registry).unwrap().is_empty());
        assert!(rank_hosts_by_cumulative_cvss(&registry).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_registry_fails_before_ranking() {
        let mut registry = ResultTree::new();
        registry.insert(HostKey::from("host-1"), crate::model::Host::new("10.0.0.1", ""));
        registry.insert(HostKey::from("host-2"), crate::model::Host::new("", ""));

        let err = rank_hosts_by_severity(&registry).unwrap_err();
        assert!(err.to_string().contains("host 'host-2'"));
        assert!(rank_hosts_by_cumulative_cvss(&registry).is_err());
        assert!(HostRankings::new(&registry).is_err());
    }

    #[test]
    fn test_compare_ips() {
        assert_eq!(compare_ips("10.0.0.2", "10.0.0.10"), Ordering::Less);
        assert_eq!(compare_ips("10.0.0.10", "10.0.0.10"), Ordering::Equal);
        assert_eq!(compare_ips("host-b", "host-a"), Ordering::Greater);
    }

    #[test]
    fn test_compare_ips_is_transitive_for_mixed_values() {
        let (a, b, c) = ("10.0.0.2", "10.0.0.10", "10.0.0.1x");
        assert_eq!(compare_ips(a, b), Ordering::Less);
        // non-addresses sort before every address
        assert_eq!(compare_ips(c, a), Ordering::Less);
        assert_eq!(compare_ips(c, b), Ordering::Less);
    }

    #[test]
    fn test_mixed_ip_ranking_independent_of_insertion_order() {
        let ips = ["10.0.0.2", "10.0.0.10", "10.0.0.1x"];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in orders {
            let mut builder = ReportBuilder::default();
            for i in order {
                builder.add(&record(ips[i], "same", 5.0)).unwrap();
            }
            let report = builder.build();

            let by_severity = rank_hosts_by_severity(&report.tree).unwrap();
            let by_cumulative = rank_hosts_by_cumulative_cvss(&report.tree).unwrap();
            let expected = vec!["10.0.0.1x", "10.0.0.2", "10.0.0.10"];
            assert_eq!(ips_of(&report.tree, &by_severity), expected);
            assert_eq!(ips_of(&report.tree, &by_cumulative), expected);
        }
    }
}
