//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tower_lsp::lsp_types::Url;

use woke_core::{Notification, Orchestrator, Settings};

/// Document content and version cache.
#[derive(Debug)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Runs woke and keeps the published diagnostics.
    pub orchestrator: Orchestrator,
    /// Settings received with `initialize`, applied once the client is ready.
    pub initial_settings: Mutex<Option<Settings>>,
    /// Notification stream, taken by the forwarder on `initialized`.
    pub notifications: Mutex<Option<UnboundedReceiver<Notification>>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}

impl BackendState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self::with_orchestrator(Orchestrator::new(tx), rx)
    }

    /// Creates a state around an existing orchestrator and its notification
    /// receiver.
    pub fn with_orchestrator(
        orchestrator: Orchestrator,
        notifications: UnboundedReceiver<Notification>,
    ) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            orchestrator,
            initial_settings: Mutex::new(None),
            notifications: Mutex::new(Some(notifications)),
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
