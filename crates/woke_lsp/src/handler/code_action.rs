//! Code action handler for replacement fixes.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::debug;

use crate::conversion::{from_lsp_diagnostic, to_code_action};
use crate::state::SharedState;
use woke_core::Diagnostic as WokeDiagnostic;

/// Handles the `textDocument/codeAction` request.
pub async fn handle_code_action(
    state: &SharedState,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    debug!("Code action request: {}", params.text_document.uri);

    if let Some(only) = &params.context.only
        && !only.contains(&CodeActionKind::QUICKFIX)
    {
        return Ok(None);
    }

    let uri = &params.text_document.uri;
    let Some(text) = get_document_content(state, uri) else {
        return Ok(None);
    };

    let requested: Vec<WokeDiagnostic> = params
        .context
        .diagnostics
        .iter()
        .filter_map(from_lsp_diagnostic)
        .collect();
    if requested.is_empty() {
        return Ok(None);
    }

    let actions: Vec<CodeActionOrCommand> = state
        .orchestrator
        .provide_fixes(uri.as_str(), &text, &requested)
        .into_iter()
        .map(|action| {
            CodeActionOrCommand::CodeAction(to_code_action(
                uri,
                action,
                &params.context.diagnostics,
            ))
        })
        .collect();

    debug!("Offering {} fixes for {}", actions.len(), uri);
    Ok(Some(actions))
}

fn get_document_content(state: &SharedState, uri: &Url) -> Option<String> {
    let docs = state.documents.read().ok()?;
    docs.get(uri).map(|d| d.text.clone())
}
