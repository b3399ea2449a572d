//! Configuration management for LSP server.

use serde_json::Value;
use tracing::{info, warn};

use woke_core::Settings;

use crate::state::BackendState;

/// Reads a settings snapshot sent by the client.
///
/// Invalid settings are logged and replaced by the defaults.
pub fn parse_settings(value: Option<Value>) -> Settings {
    let value = value.unwrap_or(Value::Null);
    match Settings::from_value(value) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Invalid woke settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

/// Applies a new settings snapshot to the orchestrator.
pub async fn apply_settings(state: &BackendState, settings: Settings) {
    info!("Applying configuration (run: {})", settings.run);
    state.orchestrator.configure(settings).await;
}
