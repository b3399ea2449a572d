//! Delivery of orchestrator notifications to the client.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageActionItem, MessageType, ShowDocumentParams, Url};
use tracing::{debug, error, info};

use woke_core::Notification;
use woke_core::version::INSTALL_URL;

use crate::conversion::to_message_type;
use crate::state::SharedState;

const DONT_SHOW_AGAIN: &str = "Don't Show Again";
const UPDATE: &str = "Update";

/// Forwards notifications until every sender is gone.
pub(crate) fn spawn_notification_forwarder(
    client: Client,
    state: SharedState,
    mut receiver: UnboundedReceiver<Notification>,
) {
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            match notification {
                Notification::UpdatePrompt { .. } => {
                    // The answer may take a while; keep forwarding meanwhile.
                    tokio::spawn(prompt_for_update(
                        client.clone(),
                        state.clone(),
                        notification.text(),
                    ));
                }
                Notification::Message { .. } => {
                    client
                        .show_message(to_message_type(notification.level()), notification.text())
                        .await;
                }
            }
        }
        debug!("Notification forwarder stopped");
    });
}

async fn prompt_for_update(client: Client, state: SharedState, message: String) {
    let actions = [DONT_SHOW_AGAIN, UPDATE]
        .into_iter()
        .map(|title| MessageActionItem {
            title: title.to_string(),
            properties: HashMap::new(),
        })
        .collect();

    let choice = match client
        .show_message_request(MessageType::INFO, message, Some(actions))
        .await
    {
        Ok(choice) => choice,
        Err(e) => {
            debug!("Update prompt failed: {}", e);
            return;
        }
    };

    match choice.as_ref().map(|item| item.title.as_str()) {
        Some(DONT_SHOW_AGAIN) => {
            if let Err(e) = state.orchestrator.suppress_version_prompt() {
                error!("Failed to persist prompt preference: {}", e);
                client
                    .show_message(
                        MessageType::ERROR,
                        format!("Woke: Failed to save preference. {}", e),
                    )
                    .await;
            }
        }
        Some(UPDATE) => open_install_page(&client).await,
        _ => debug!("Update prompt dismissed"),
    }
}

async fn open_install_page(client: &Client) {
    let uri = match Url::parse(INSTALL_URL) {
        Ok(uri) => uri,
        Err(e) => {
            error!("Invalid install URL: {}", e);
            return;
        }
    };

    let params = ShowDocumentParams {
        uri,
        external: Some(true),
        take_focus: None,
        selection: None,
    };
    match client.show_document(params).await {
        Ok(true) => info!("Opened {}", INSTALL_URL),
        Ok(false) | Err(_) => {
            client
                .show_message(
                    MessageType::INFO,
                    format!("Woke: Install the latest woke from {}", INSTALL_URL),
                )
                .await;
        }
    }
}
