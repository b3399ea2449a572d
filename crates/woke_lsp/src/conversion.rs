//! LSP type conversion utilities.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, Diagnostic, DiagnosticSeverity, MessageType, NumberOrString,
    Position, Range, TextEdit, Url, WorkspaceEdit,
};

use woke_core::{
    DIAGNOSTIC_SOURCE, Diagnostic as WokeDiagnostic, DocumentSnapshot, FixAction, FixKind,
    LineRange, NotificationLevel, Severity as WokeSeverity,
};

/// Converts a woke diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &WokeDiagnostic) -> Diagnostic {
    let severity = match diag.severity {
        WokeSeverity::Error => DiagnosticSeverity::ERROR,
        WokeSeverity::Warning => DiagnosticSeverity::WARNING,
        WokeSeverity::Info => DiagnosticSeverity::INFORMATION,
    };

    Diagnostic {
        range: to_lsp_range(diag.range),
        severity: Some(severity),
        code: Some(NumberOrString::String(diag.code.clone())),
        source: Some(diag.source.clone()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Converts a diagnostic sent back by the client.
///
/// Returns `None` for diagnostics of other sources and for ranges spanning
/// several lines, which woke never reports.
pub fn from_lsp_diagnostic(diag: &Diagnostic) -> Option<WokeDiagnostic> {
    if diag.source.as_deref() != Some(DIAGNOSTIC_SOURCE) {
        return None;
    }
    let code = match diag.code.as_ref()? {
        NumberOrString::String(code) => code.clone(),
        NumberOrString::Number(code) => code.to_string(),
    };
    let range = from_lsp_range(diag.range)?;

    let severity = match diag.severity {
        Some(DiagnosticSeverity::ERROR) => WokeSeverity::Error,
        Some(DiagnosticSeverity::WARNING) => WokeSeverity::Warning,
        _ => WokeSeverity::Info,
    };

    Some(WokeDiagnostic::new(code, diag.message.clone(), range).with_severity(severity))
}

pub fn to_lsp_range(range: LineRange) -> Range {
    Range::new(
        Position::new(range.line, range.start),
        Position::new(range.line, range.end),
    )
}

pub fn from_lsp_range(range: Range) -> Option<LineRange> {
    if range.start.line != range.end.line {
        return None;
    }
    Some(LineRange::new(
        range.start.line,
        range.start.character,
        range.end.character,
    ))
}

/// Turns a fix into a quick fix code action for `uri`.
///
/// Client diagnostics whose range is touched by one of the edits are attached.
pub fn to_code_action(uri: &Url, action: FixAction, diagnostics: &[Diagnostic]) -> CodeAction {
    let edits: Vec<TextEdit> = action
        .edits
        .into_iter()
        .map(|edit| TextEdit {
            range: to_lsp_range(edit.range),
            new_text: edit.new_text,
        })
        .collect();

    let attached: Vec<Diagnostic> = diagnostics
        .iter()
        .filter(|d| edits.iter().any(|e| e.range == d.range))
        .cloned()
        .collect();

    CodeAction {
        title: action.title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: (!attached.is_empty()).then_some(attached),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), edits)])),
            ..Default::default()
        }),
        is_preferred: Some(action.kind == FixKind::Single),
        ..Default::default()
    }
}

pub fn to_message_type(level: NotificationLevel) -> MessageType {
    match level {
        NotificationLevel::Info => MessageType::INFO,
        NotificationLevel::Warning => MessageType::WARNING,
        NotificationLevel::Error => MessageType::ERROR,
    }
}

/// Builds the snapshot the orchestrator lints.
///
/// Only `file:` URIs carry a path; `untitled:` buffers are flagged as such.
pub fn document_snapshot(uri: &Url, text: String) -> DocumentSnapshot {
    DocumentSnapshot {
        text,
        path: uri.to_file_path().ok(),
        untitled: uri.scheme() == "untitled",
    }
}
