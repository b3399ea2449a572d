//! woke LSP Server
//!
//! Language Server Protocol front end for the woke inclusive-language linter.
//! Lints documents on the configured trigger and offers replacement fixes.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use woke_core::{Orchestrator, TriggerEvent};

mod config;
mod conversion;
mod debounce;
mod handler;
mod notify;
mod state;

pub use handler::RUN_COMMAND;

use crate::config::{apply_settings, parse_settings};
use crate::conversion::{document_snapshot, to_lsp_diagnostic};
use crate::debounce::spawn_debounced_lint;
use crate::state::{BackendState, SharedState};

/// The LSP backend for woke.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
        }
    }

    /// Creates a backend that keeps its persisted prompt state at `path`, or
    /// nowhere when `None`.
    pub fn with_state_path(client: Client, path: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = Orchestrator::new(tx).with_state_path(path);
        Self {
            client,
            state: Arc::new(BackendState::with_orchestrator(orchestrator, rx)),
        }
    }

    fn document_text(&self, uri: &Url) -> Option<String> {
        match self.state.documents.read() {
            Ok(docs) => docs.get(uri).map(|d| d.text.clone()),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                None
            }
        }
    }

    fn open_documents(&self) -> Vec<Url> {
        match self.state.documents.read() {
            Ok(docs) => docs.keys().cloned().collect(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    /// Lints a document and publishes the result.
    async fn lint_document(&self, uri: Url, version: Option<i32>) {
        let Some(text) = self.document_text(&uri) else {
            debug!("Skipping lint of unknown document: {}", uri);
            return;
        };

        let snapshot = document_snapshot(&uri, text);
        let diagnostics = self.state.orchestrator.lint(uri.as_str(), &snapshot).await;
        if self.document_text(&uri).is_none() {
            debug!("Document closed while linting: {}", uri);
            return;
        }

        let lsp_diagnostics: Vec<Diagnostic> = diagnostics.iter().map(to_lsp_diagnostic).collect();
        self.client
            .publish_diagnostics(uri, lsp_diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.state, &self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown(&self.state).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, version) = handler::handle_did_open(&self.state, params).await;

        if self.state.orchestrator.should_lint(TriggerEvent::Opened) {
            self.lint_document(uri, Some(version)).await;
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, version)) = handler::handle_did_change(&self.state, params).await else {
            return;
        };

        if !self
            .state
            .orchestrator
            .should_lint(TriggerEvent::ContentChanged)
        {
            return;
        }

        let backend = self.clone();
        spawn_debounced_lint(self.state.clone(), uri, version, move |uri, version| {
            async move { backend.lint_document(uri, Some(version)).await }
        });
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = handler::handle_did_save(&self.state, params).await;

        if self.state.orchestrator.should_lint(TriggerEvent::Saved) {
            self.lint_document(uri, None).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = parse_settings(Some(params.settings));
        let enabled = settings.enable;
        apply_settings(&self.state, settings).await;

        if !enabled {
            info!("Linting disabled, clearing diagnostics");
            for uri in self.open_documents() {
                self.lint_document(uri, None).await;
            }
        }
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handler::handle_code_action(&self.state, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        if let Some(uri) = handler::handle_execute_command(params)
            && self.state.orchestrator.should_lint(TriggerEvent::Command)
        {
            self.lint_document(uri, None).await;
        }
        Ok(None)
    }
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("woke LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
