//! Parsing of woke's line-delimited JSON output.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::WokeError;
use crate::alternatives::AlternativesMap;
use crate::diagnostic::{Finding, LineRange, Severity};

/// Line woke prints instead of a report when nothing was found.
pub const NO_VIOLATIONS_SENTINEL: &str = "No violations found...";

/// One report object; woke prints one per line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(default)]
    pub results: Vec<ReportResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportResult {
    pub rule: ReportRule,
    #[serde(default)]
    pub reason: String,
    pub start_position: StartPosition,
    pub end_position: EndPosition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRule {
    pub name: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub alternatives: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartPosition {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndPosition {
    pub column: u32,
}

impl ReportResult {
    /// Converts the result to a finding. Lines are 1-based in the report.
    pub fn into_finding(self) -> Finding {
        let line = self.start_position.line.saturating_sub(1);
        Finding {
            severity: Severity::from_tool(self.rule.severity.as_deref()),
            code: self.rule.name,
            reason: self.reason,
            range: LineRange::new(line, self.start_position.column, self.end_position.column),
            alternatives: self.rule.alternatives.unwrap_or_default(),
        }
    }
}

/// Parses a single report line.
pub fn parse_report_line(line: &str) -> Result<Report, serde_json::Error> {
    serde_json::from_str(line)
}

/// Splits on `\r\n`, `\r` and `\n`.
pub fn split_lines(output: &str) -> impl Iterator<Item = &str> {
    output.split('\n').flat_map(|line| line.split('\r'))
}

/// Parses the complete standard output of a successful woke run.
///
/// Every rule seen overwrites its entry in `alternatives`. Malformed lines are
/// logged and skipped.
pub fn parse_report(output: &str, alternatives: &AlternativesMap) -> Vec<Finding> {
    let mut findings = Vec::new();

    for line in split_lines(output) {
        if line.is_empty() || line == NO_VIOLATIONS_SENTINEL {
            continue;
        }

        let report = match parse_report_line(line) {
            Ok(report) => report,
            Err(e) => {
                let e = WokeError::LineParse(format!("{} ({})", line, e));
                warn!("Skipping line. {}", e);
                continue;
            }
        };

        for result in report.results {
            let finding = result.into_finding();
            alternatives.record(finding.code.clone(), finding.alternatives.clone());
            findings.push(finding);
        }
    }

    debug!("Parsed {} findings from woke output", findings.len());
    findings
}
