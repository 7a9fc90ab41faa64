use std::fmt::Write;

use crate::cli::ReportType;
use crate::error::Result;
use crate::model::{Host, Port, Vulnerability};
use crate::reporter::{ReportContext, Reporter};

const FINDING_COLUMNS: [&str; 18] = [
    "hostname",
    "ip",
    "port",
    "protocol",
    "vulnerability",
    "cvss",
    "threat",
    "family",
    "description",
    "detection",
    "insight",
    "impact",
    "affected",
    "solution",
    "solution_type",
    "vuln_id",
    "cve",
    "references",
];

const SUMMARY_COLUMNS: [&str; 3] = ["level", "count", "host_count"];

/// Quote a field when it contains a separator, quote or line break.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    write!(out, "{}\r\n", line)?;
    Ok(())
}

fn finding_row(host: &Host, port: Option<&Port>, vuln: &Vulnerability) -> Vec<String> {
    let (number, protocol) = match port {
        Some(p) => (p.number.to_string(), p.protocol.clone()),
        None => (String::new(), String::new()),
    };
    vec![
        host.host_name.clone(),
        host.ip.clone(),
        number,
        protocol,
        vuln.name.clone(),
        format!("{:.1}", vuln.cvss()),
        vuln.level().to_string(),
        vuln.family.clone(),
        vuln.description.clone(),
        vuln.detect.clone(),
        vuln.insight.clone(),
        vuln.impact.clone(),
        vuln.affected.clone(),
        vuln.solution.clone(),
        vuln.solution_type.clone(),
        vuln.vuln_id.clone(),
        vuln.cves.iter().cloned().collect::<Vec<_>>().join(" - "),
        vuln.references.join(" - "),
    ]
}

/// Comma separated output in the Excel dialect (CRLF rows).
pub struct CsvReporter {
    report_type: ReportType,
}

impl CsvReporter {
    pub fn new(report_type: ReportType) -> Self {
        Self { report_type }
    }

    /// One row per occurrence, vulnerabilities in CVSS/name order.
    fn by_vulnerability(&self, ctx: &ReportContext<'_>, out: &mut String) -> Result<()> {
        write_row(out, &FINDING_COLUMNS)?;
        for vuln in &ctx.collections.sorted {
            for occurrence in &vuln.hosts {
                let Some(host) = ctx.report.tree.get(&occurrence.host.key) else {
                    continue;
                };
                write_row(out, &finding_row(host, occurrence.port.as_ref(), vuln))?;
            }
        }
        Ok(())
    }

    /// One row per host finding, hosts by cumulative CVSS.
    fn by_host(&self, ctx: &ReportContext<'_>, out: &mut String) -> Result<()> {
        write_row(out, &FINDING_COLUMNS)?;
        for host in ctx.hosts_by_cumulative_cvss() {
            for finding in host.vuln_list() {
                write_row(out, &finding_row(host, finding.port.as_ref(), &finding.vuln))?;
            }
        }
        Ok(())
    }

    fn summary(&self, ctx: &ReportContext<'_>, out: &mut String) -> Result<()> {
        write_row(out, &SUMMARY_COLUMNS)?;
        for row in &ctx.summary.levels {
            write_row(
                out,
                &[
                    row.level.to_string(),
                    row.count.to_string(),
                    row.host_count.to_string(),
                ],
            )?;
        }
        Ok(())
    }
}

impl Reporter for CsvReporter {
    fn report(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let mut out = String::new();
        match self.report_type {
            ReportType::Vulnerability => self.by_vulnerability(ctx, &mut out)?,
            ReportType::Host => self.by_host(ctx, &mut out)?,
            ReportType::Summary => self.summary(ctx, &mut out)?,
        }
        Ok(out)
    }
}
