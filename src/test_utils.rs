#[cfg(test)]
pub mod fixtures {
    use crate::model::{
        FindingRecord, HostKey, HostRef, Report, ReportBuilder, ResultTree, Vulnerability,
    };
    use crate::severity::Thresholds;

    /// A vulnerability classified with the default thresholds.
    pub fn vuln(name: &str, cvss: f64) -> Vulnerability {
        Vulnerability::new(name, cvss, &Thresholds::default())
            .unwrap()
            .with_family("General")
    }

    /// A vulnerability with one portless occurrence per IP.
    pub fn vuln_on(name: &str, cvss: f64, ips: &[&str]) -> Vulnerability {
        let mut v = vuln(name, cvss);
        for ip in ips {
            v.add_occurrence(HostRef::new(format!("host-{ip}"), *ip), None);
        }
        v
    }

    pub fn record(ip: &str, name: &str, cvss: f64) -> FindingRecord {
        FindingRecord {
            ip: ip.to_string(),
            name: name.to_string(),
            family: "General".to_string(),
            cvss,
            ..Default::default()
        }
    }

    /// Four vulnerabilities over three hosts:
    ///
    /// - 10.0.0.1 (web): A 9.5 on 443/tcp, B 9.5 on general/tcp
    /// - 10.0.0.2 (db): B 9.5, D 5.0 on 3306/tcp
    /// - 10.0.0.3: C 2.0
    pub fn sample_report() -> Report {
        let mut a = record("10.0.0.1", "A", 9.5);
        a.hostname = "web".to_string();
        a.port = Some(443);
        a.protocol = "tcp".to_string();
        a.family = "Web application abuses".to_string();
        a.cves = vec!["CVE-2021-0002".to_string(), "CVE-2021-0001".to_string()];
        a.solution_type = "VendorFix".to_string();

        let mut b_web = record("10.0.0.1", "B", 9.5);
        b_web.port = Some(0);
        b_web.protocol = "tcp".to_string();

        let mut b_db = record("10.0.0.2", "B", 9.5);
        b_db.hostname = "db".to_string();

        let mut d = record("10.0.0.2", "D", 5.0);
        d.port = Some(3306);
        d.family = "Databases".to_string();

        let c = record("10.0.0.3", "C", 2.0);

        let mut builder = ReportBuilder::default();
        builder.add_all([&a, &b_web, &b_db, &d, &c]).unwrap();
        builder.build()
    }

    /// Key of the registered host with `ip`.
    pub fn key_for_ip<'t>(tree: &'t ResultTree, ip: &str) -> Option<&'t HostKey> {
        tree.iter()
            .find(|(_, host)| host.ip == ip)
            .map(|(key, _)| key)
    }
}
