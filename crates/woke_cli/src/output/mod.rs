//! Output formatting module

mod json;
mod text;

use miette::Result;
use woke_core::Diagnostic;

use crate::cli::OutputFormat;

/// Diagnostics of one checked input.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Prints the results. Returns true when any diagnostic was produced.
pub fn output_results(results: &[CheckResult], format: OutputFormat) -> Result<bool> {
    let has_issues = results.iter().any(|r| !r.diagnostics.is_empty());

    match format {
        OutputFormat::Json => json::output_json(results)?,
        OutputFormat::Text => text::output_text(results),
    }

    Ok(has_issues)
}
