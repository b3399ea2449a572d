//! Initialize and shutdown handlers.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{error, info};

use crate::config::{apply_settings, parse_settings};
use crate::handler::commands::RUN_COMMAND;
use crate::notify::spawn_notification_forwarder;
use crate::state::{BackendState, SharedState};

/// Handles the `initialize` LSP request.
pub async fn handle_initialize(
    state: &BackendState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("woke LSP server initializing...");

    #[allow(deprecated)]
    let root = params
        .root_uri
        .or_else(|| {
            params
                .workspace_folders
                .as_ref()
                .and_then(|folders| folders.first())
                .map(|folder| folder.uri.clone())
        })
        .and_then(|u| u.to_file_path().ok());
    state.orchestrator.set_workspace_root(root);

    let settings = parse_settings(params.initialization_options);
    match state.initial_settings.lock() {
        Ok(mut pending) => *pending = Some(settings),
        Err(e) => error!("Settings lock poisoned: {}", e),
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                resolve_provider: Some(false),
                work_done_progress_options: Default::default(),
            })),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![RUN_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "woke-ls".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Handles the `initialized` LSP notification.
///
/// Starts delivering notifications to the client, then applies the settings
/// received with `initialize`.
pub async fn handle_initialized(state: &SharedState, client: &tower_lsp::Client) {
    let receiver = match state.notifications.lock() {
        Ok(mut receiver) => receiver.take(),
        Err(e) => {
            error!("Notification lock poisoned: {}", e);
            None
        }
    };
    if let Some(receiver) = receiver {
        spawn_notification_forwarder(client.clone(), state.clone(), receiver);
    }

    let settings = match state.initial_settings.lock() {
        Ok(mut pending) => pending.take(),
        Err(e) => {
            error!("Settings lock poisoned: {}", e);
            None
        }
    };
    apply_settings(state, settings.unwrap_or_default()).await;

    client
        .log_message(MessageType::INFO, "woke LSP server initialized!")
        .await;
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown(state: &BackendState) -> Result<()> {
    info!("woke LSP server shutting down...");
    state.orchestrator.dispose();
    Ok(())
}
