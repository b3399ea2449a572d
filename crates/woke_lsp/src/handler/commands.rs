//! `workspace/executeCommand` handler.

use tower_lsp::lsp_types::{ExecuteCommandParams, Url};
use tracing::{debug, warn};

/// Lints the document whose URI is the single argument.
pub const RUN_COMMAND: &str = "woke.run";

/// Handles `workspace/executeCommand`, returning the document to lint.
pub fn handle_execute_command(params: ExecuteCommandParams) -> Option<Url> {
    debug!("Execute command: {}", params.command);

    if params.command != RUN_COMMAND {
        warn!("Unknown command: {}", params.command);
        return None;
    }

    let uri = params.arguments.first().and_then(|arg| arg.as_str());
    match uri.map(Url::parse) {
        Some(Ok(uri)) => Some(uri),
        Some(Err(e)) => {
            warn!("{} called with an invalid URI: {}", RUN_COMMAND, e);
            None
        }
        None => {
            warn!("{} expects the document URI as its argument", RUN_COMMAND);
            None
        }
    }
}
