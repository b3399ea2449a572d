//! Debouncing of on-type lints.

use std::future::Future;
use std::time::Duration;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use crate::state::{BackendState, SharedState};

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Spawns a debounced lint task.
///
/// Waits for the debounce period, then runs `lint` only if no newer version of
/// the document has arrived in the meantime. A lint that already started is
/// never cancelled.
pub fn spawn_debounced_lint<F, Fut>(state: SharedState, uri: Url, version: i32, lint: F)
where
    F: FnOnce(Url, i32) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS)).await;

        if is_current_version(&state, &uri, version) {
            lint(uri, version).await;
        } else {
            debug!("Skipping stale lint of {} (version {})", uri, version);
        }
    });
}

/// Checks if the document version is still current.
fn is_current_version(state: &BackendState, uri: &Url, version: i32) -> bool {
    let docs = match state.documents.read() {
        Ok(g) => g,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return false;
        }
    };

    docs.get(uri).is_some_and(|doc| doc.version == version)
}
