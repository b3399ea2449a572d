//! Finding and diagnostic types.

use serde::{Deserialize, Serialize};

/// Source tag attached to every diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "woke";

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    #[default]
    Info,
    /// Should be reviewed.
    Warning,
    /// Must be fixed.
    Error,
}

impl Severity {
    /// Maps a severity string reported by woke.
    ///
    /// Anything other than `"error"` or `"warning"` is informational.
    pub fn from_tool(value: Option<&str>) -> Self {
        match value {
            Some("error") => Severity::Error,
            Some("warning") => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Returns the lowercase name of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A span on a single line.
///
/// `line` is 0-based. Columns are passed through from the tool unchanged and
/// are measured in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineRange {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Creates a new range.
    pub const fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }
}

/// One violation reported by woke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule name, used as the diagnostic code.
    pub code: String,
    pub severity: Severity,
    pub reason: String,
    pub range: LineRange,
    /// Replacement suggestions of the rule.
    pub alternatives: Vec<String>,
}

/// Editor-facing diagnostic derived from a [`Finding`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The rule that produced this diagnostic.
    pub code: String,

    /// The diagnostic message.
    pub message: String,

    /// Location in the document.
    pub range: LineRange,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Fixed source tag.
    pub source: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(code: impl Into<String>, message: impl Into<String>, range: LineRange) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            range,
            severity: Severity::Info,
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Builds the diagnostic for a finding.
    pub fn from_finding(finding: &Finding) -> Self {
        Self::new(&finding.code, &finding.reason, finding.range).with_severity(finding.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::error(Some("error"), Severity::Error)]
    #[case::warning(Some("warning"), Severity::Warning)]
    #[case::info(Some("info"), Severity::Info)]
    #[case::unknown(Some("fatal"), Severity::Info)]
    #[case::uppercase(Some("ERROR"), Severity::Info)]
    #[case::missing(None, Severity::Info)]
    fn test_severity_from_tool(#[case] value: Option<&str>, #[case] expected: Severity) {
        assert_eq!(Severity::from_tool(value), expected);
    }

    #[test]
    fn test_severity_default() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_diagnostic_from_finding() {
        let finding = Finding {
            code: "whitelist".to_string(),
            severity: Severity::Warning,
            reason: "'whitelist' may be insensitive, use 'allowlist' instead".to_string(),
            range: LineRange::new(0, 0, 9),
            alternatives: vec!["allowlist".to_string()],
        };

        let diag = Diagnostic::from_finding(&finding);

        assert_eq!(diag.code, "whitelist");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.range, LineRange::new(0, 0, 9));
        assert_eq!(diag.source, DIAGNOSTIC_SOURCE);
        assert_eq!(diag.message, finding.reason);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diag = Diagnostic::new("master-slave", "Found master-slave", LineRange::new(2, 4, 16))
            .with_severity(Severity::Error);
        let json = serde_json::to_string(&diag).unwrap();

        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"source\":\"woke\""));
    }
}
