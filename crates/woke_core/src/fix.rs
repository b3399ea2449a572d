//! Replacement edits built from diagnostics and rule alternatives.

use serde::Serialize;
use tracing::debug;

use crate::alternatives::AlternativesMap;
use crate::diagnostic::{Diagnostic, LineRange};
use crate::document::text_in_range;

/// A single text replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextEdit {
    pub range: LineRange,
    pub new_text: String,
}

/// Whether an action fixes one occurrence or every occurrence of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    Single,
    FixAll,
}

/// A titled group of edits applied together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FixAction {
    pub title: String,
    pub kind: FixKind,
    pub edits: Vec<TextEdit>,
}

/// Uppercases the first character of `replacement` when `existing` starts
/// with an uppercase character.
pub fn preserve_case(existing: &str, replacement: &str) -> String {
    let starts_upper = existing.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }

    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn case_adjusted_edit(text: &str, range: LineRange, replacement: &str) -> TextEdit {
    let new_text = match text_in_range(text, &range) {
        Some(existing) => preserve_case(existing, replacement),
        None => replacement.to_string(),
    };
    TextEdit { range, new_text }
}

/// Builds the action replacing one occurrence.
pub fn propose_single_fix(text: &str, range: LineRange, replacement: &str) -> FixAction {
    FixAction {
        title: format!("[woke] Replace with '{}'", replacement),
        kind: FixKind::Single,
        edits: vec![case_adjusted_edit(text, range, replacement)],
    }
}

/// Builds the action replacing every published occurrence of `code`.
///
/// Returns `None` unless at least two diagnostics carry the code; a lone
/// occurrence is already covered by its single fix.
pub fn propose_fix_all(
    text: &str,
    published: &[Diagnostic],
    code: &str,
    replacement: &str,
) -> Option<FixAction> {
    let ranges: Vec<LineRange> = published
        .iter()
        .filter(|d| d.code == code)
        .map(|d| d.range)
        .collect();

    if ranges.len() <= 1 {
        return None;
    }

    Some(FixAction {
        title: format!("[woke] Replace all '{}' with '{}'", code, replacement),
        kind: FixKind::FixAll,
        edits: ranges
            .into_iter()
            .map(|range| case_adjusted_edit(text, range, replacement))
            .collect(),
    })
}

/// Builds every fix for the requested diagnostics.
///
/// All single fixes come first, then the fix-all actions, each group ordered
/// by diagnostic and then by alternative. Codes without recorded alternatives
/// contribute nothing.
pub fn provide_fixes(
    text: &str,
    requested: &[Diagnostic],
    published: &[Diagnostic],
    alternatives: &AlternativesMap,
) -> Vec<FixAction> {
    let mut actions = Vec::new();

    for diag in requested {
        let Some(alts) = alternatives.get(&diag.code) else {
            debug!("No alternatives recorded for '{}'", diag.code);
            continue;
        };
        for alt in &alts {
            actions.push(propose_single_fix(text, diag.range, alt));
        }
    }

    for diag in requested {
        let Some(alts) = alternatives.get(&diag.code) else {
            continue;
        };
        for alt in &alts {
            if let Some(action) = propose_fix_all(text, published, &diag.code, alt)
                && !actions.contains(&action)
            {
                actions.push(action);
            }
        }
    }

    actions
}
