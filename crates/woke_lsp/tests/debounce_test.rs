#![cfg(unix)]

use std::time::{Duration, Instant};

use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};
use woke_core::test_utils::{fake_woke, run_count};
use woke_lsp::Backend;

#[tokio::test]
async fn test_rapid_changes_are_debounced() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), "", 0);

    let (service, _) = LspService::new(|client| Backend::with_state_path(client, None));
    let uri = Url::parse("file:///tmp/test.md").unwrap();

    let _ = service
        .inner()
        .initialize(InitializeParams {
            initialization_options: Some(serde_json::json!({
                "run": "onType",
                "executablePath": woke,
            })),
            ..Default::default()
        })
        .await;
    service.inner().initialized(InitializedParams {}).await;

    for i in 1..=5 {
        service
            .inner()
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: i,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: format!("Change {}", i),
                }],
            })
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while run_count(dir.path()) == 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // Room for a stray second run to show up.
    tokio::time::sleep(Duration::from_millis(400)).await;

    let runs = run_count(dir.path());
    assert!(runs >= 1, "Expected at least 1 woke run (actual: {})", runs);
    assert!(
        runs <= 2,
        "Expected debouncing to reduce woke runs (actual: {})",
        runs
    );
}
