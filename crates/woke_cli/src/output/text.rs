//! Text output formatter

use woke_core::Diagnostic;

use super::CheckResult;

pub fn output_text(results: &[CheckResult]) {
    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", result.name);
        for diag in &result.diagnostics {
            println!("  {}", format_diagnostic(diag));
        }
    }

    let total_issues: usize = results.iter().map(|r| r.diagnostics.len()).sum();

    println!();
    println!(
        "Checked {} files, found {} issues",
        results.len(),
        total_issues
    );
}

/// `line:column` is 1-based for display.
fn format_diagnostic(diag: &Diagnostic) -> String {
    format!(
        "{}:{}-{} {} [{}]: {}",
        diag.range.line + 1,
        diag.range.start + 1,
        diag.range.end + 1,
        diag.severity.as_str(),
        diag.code,
        diag.message
    )
}
