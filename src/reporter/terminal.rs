use colored::{ColoredString, Colorize};

use crate::error::Result;
use crate::model::Host;
use crate::reporter::{ReportContext, Reporter};
use crate::severity::Level;

const RULE_WIDTH: usize = 60;

/// Human readable summary: level table, families and the host ranking.
pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn level_label(&self, level: Level) -> ColoredString {
        let label = format!("{:<10}", level.label());
        match level {
            Level::Critical | Level::High => label.color(level.color_name()).bold(),
            _ => label.color(level.color_name()),
        }
    }

    fn heading(&self, title: &str) -> String {
        format!("{}\n{}\n", title.bold(), "━".repeat(RULE_WIDTH).dimmed())
    }

    fn format_levels(&self, ctx: &ReportContext<'_>) -> String {
        let mut output = self.heading("Vulnerabilities by level");
        output.push_str(&format!("  {:<10} {:>8} {:>8}\n", "Level", "Vulns", "Hosts"));

        for row in &ctx.summary.levels {
            output.push_str(&format!(
                "  {} {:>8} {:>8}\n",
                self.level_label(row.level),
                row.count,
                row.host_count
            ));
        }
        output.push_str(&format!(
            "  {:<10} {:>8} {:>8}\n",
            "Total".bold(),
            ctx.summary.total_vulnerabilities,
            ctx.summary.total_host_count
        ));
        output.push('\n');
        output
    }

    fn format_families(&self, ctx: &ReportContext<'_>) -> String {
        let mut output = self.heading("Vulnerabilities by family");
        for (family, count) in ctx.collections.family_counts.iter() {
            let family = if family.is_empty() { "(unknown)" } else { family };
            output.push_str(&format!("  {:<48} {:>8}\n", family, count));
        }
        output.push('\n');
        output
    }

    fn format_host(&self, rank: usize, host: &Host) -> String {
        let counts = Level::ALL
            .into_iter()
            .filter(|&level| level != Level::None)
            .map(|level| {
                format!("{:>3}", host.count(level))
                    .color(level.color_name())
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut line = format!(
            "  {:>3}. {:<32} {} {:>5} {:>5.1}\n",
            rank,
            host.label(),
            counts,
            host.total(),
            host.higher_cvss().max(0.0)
        );

        if self.verbose {
            for finding in host.vuln_list() {
                let port = finding
                    .port
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_default();
                line.push_str(&format!(
                    "         {} {} {}\n",
                    self.level_label(finding.vuln.level()),
                    finding.vuln.name,
                    port.dimmed()
                ));
            }
        }
        line
    }

    fn format_ranking(&self, ctx: &ReportContext<'_>) -> String {
        let mut output = self.heading(&format!("Top {} hosts", ctx.top_hosts));
        output.push_str(&format!(
            "  {:>3}  {:<32} {:>3} {:>3} {:>3} {:>3} {:>5} {:>5}\n",
            "#", "Host", "C", "H", "M", "L", "Total", "CVSS"
        ));

        for (position, host) in ctx.top_ranked_hosts().into_iter().enumerate() {
            output.push_str(&self.format_host(position + 1, host));
        }
        output.push('\n');
        output
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("vuln-report v{}", env!("CARGO_PKG_VERSION")).bold()
        ));

        if ctx.report.is_empty() {
            output.push_str(&"No vulnerabilities reported.\n".green().to_string());
            return Ok(output);
        }

        output.push_str(&self.format_levels(ctx));
        output.push_str(&self.format_families(ctx));
        output.push_str(&self.format_ranking(ctx));

        output.push_str(&format!(
            "Summary: {} critical, {} high, {} medium, {} low on {} host(s)\n",
            ctx.summary
                .row(Level::Critical)
                .map_or(0, |r| r.count)
                .to_string()
                .magenta()
                .bold(),
            ctx.summary
                .row(Level::High)
                .map_or(0, |r| r.count)
                .to_string()
                .red()
                .bold(),
            ctx.summary
                .row(Level::Medium)
                .map_or(0, |r| r.count)
                .to_string()
                .yellow(),
            ctx.summary
                .row(Level::Low)
                .map_or(0, |r| r.count)
                .to_string()
                .green(),
            ctx.summary.distinct_hosts
        ));

        Ok(output)
    }
}
