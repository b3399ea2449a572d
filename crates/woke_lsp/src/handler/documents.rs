//! Document lifecycle handlers (open, change, save, close).

use tower_lsp::lsp_types::*;
use tracing::{debug, error};

use crate::state::{DocumentData, SharedState};

/// Handles the `textDocument/didOpen` notification.
pub async fn handle_did_open(state: &SharedState, params: DidOpenTextDocumentParams) -> (Url, i32) {
    debug!("Document opened: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.insert(
                params.text_document.uri.clone(),
                DocumentData {
                    text: params.text_document.text,
                    version: params.text_document.version,
                },
            );
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    (params.text_document.uri, params.text_document.version)
}

/// Handles the `textDocument/didChange` notification.
///
/// Returns the URI and version for debounced linting.
pub async fn handle_did_change(
    state: &SharedState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, i32)> {
    debug!("Document changed: {}", params.text_document.uri);

    // Full sync: the last change carries the whole text.
    let change = params.content_changes.into_iter().last()?;
    let uri = params.text_document.uri;
    let version = params.text_document.version;

    {
        let mut docs = match state.documents.write() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return None;
            }
        };
        docs.insert(
            uri.clone(),
            DocumentData {
                text: change.text,
                version,
            },
        );
    }

    Some((uri, version))
}

/// Handles the `textDocument/didSave` notification.
pub async fn handle_did_save(state: &SharedState, params: DidSaveTextDocumentParams) -> Url {
    debug!("Document saved: {}", params.text_document.uri);

    if let Some(text) = params.text {
        match state.documents.write() {
            Ok(mut docs) => {
                if let Some(doc) = docs.get_mut(&params.text_document.uri) {
                    doc.text = text;
                }
            }
            Err(e) => error!("Documents lock poisoned: {}", e),
        }
    }

    params.text_document.uri
}

/// Handles the `textDocument/didClose` notification.
pub async fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.remove(&params.text_document.uri);
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }
    state.orchestrator.forget(params.text_document.uri.as_str());

    params.text_document.uri
}
