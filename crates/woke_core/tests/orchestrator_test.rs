#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use semver::Version;
use tokio::sync::mpsc;
use woke_core::test_utils::{
    TWO_WHITELIST_REPORT, WHITELIST_REPORT, fake_woke, fake_woke_with_version, recorded_args,
    recorded_stdin, run_count, write_script,
};
use woke_core::{
    Diagnostic, DocumentSnapshot, FixKind, LineRange, LintState, Notification, NotificationLevel,
    Orchestrator, RunTrigger, Settings, Severity, ToolStatus,
};

async fn orchestrator_for(
    executable: &Path,
    run: RunTrigger,
) -> (Orchestrator, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(tx).with_state_path(None);
    orchestrator
        .configure(Settings {
            run,
            executable_path: Some(executable.to_path_buf()),
            ..Settings::default()
        })
        .await;
    (orchestrator, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

#[tokio::test]
async fn test_saved_document_on_save_uses_file_mode() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), "No violations found. Stay woke \u{270a}", 0);
    let file = dir.path().join("notes.md");
    std::fs::write(&file, "fine text\n").unwrap();
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnSave).await;

    let document = DocumentSnapshot::file("fine text\n", &file);
    let diagnostics = orchestrator.lint("file:///notes.md", &document).await;

    assert!(diagnostics.is_empty());
    assert_eq!(
        recorded_args(dir.path()).unwrap(),
        vec![
            "-o".to_string(),
            "json".to_string(),
            file.to_string_lossy().into_owned()
        ]
    );
    assert_eq!(recorded_stdin(dir.path()), None);
}

#[tokio::test]
async fn test_on_type_uses_buffer_mode() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), "", 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;

    let document = DocumentSnapshot::file("unsaved edits", dir.path().join("notes.md"));
    orchestrator.lint("file:///notes.md", &document).await;

    assert_eq!(
        recorded_args(dir.path()).unwrap(),
        vec!["--stdin", "-o", "json"]
    );
    assert_eq!(recorded_stdin(dir.path()).as_deref(), Some("unsaved edits"));
}

#[tokio::test]
async fn test_custom_args_follow_builtin_args() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), "", 0);
    let (tx, _rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(tx).with_state_path(None);
    orchestrator
        .configure(Settings {
            run: RunTrigger::Manual,
            executable_path: Some(woke),
            custom_args: vec!["--exit-1-on-failure".to_string()],
            ..Settings::default()
        })
        .await;

    orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("text"))
        .await;

    assert_eq!(
        recorded_args(dir.path()).unwrap(),
        vec!["--stdin", "-o", "json", "--exit-1-on-failure"]
    );
}

#[tokio::test]
async fn test_whitelist_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 0);
    let (orchestrator, mut rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    let text = "whitelist\n";

    let diagnostics = orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled(text))
        .await;

    let expected = Diagnostic::new(
        "whitelist",
        "'whitelist' may be insensitive, use 'allowlist' instead",
        LineRange::new(0, 0, 9),
    )
    .with_severity(Severity::Warning);
    assert_eq!(diagnostics, vec![expected.clone()]);
    assert_eq!(orchestrator.published("untitled:1"), diagnostics);
    assert_eq!(orchestrator.state("untitled:1"), LintState::Linted);

    let fixes = orchestrator.provide_fixes("untitled:1", text, &[expected]);
    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].title, "[woke] Replace with 'allowlist'");
    assert_eq!(fixes[0].kind, FixKind::Single);
    assert_eq!(fixes[0].edits[0].range, LineRange::new(0, 0, 9));
    assert_eq!(fixes[0].edits[0].new_text, "allowlist");

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_fix_all_preserves_case_per_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), TWO_WHITELIST_REPORT, 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    let text = "whitelist\nthe Whitelist\n";

    let diagnostics = orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled(text))
        .await;
    assert_eq!(diagnostics.len(), 2);

    let fixes = orchestrator.provide_fixes("untitled:1", text, &diagnostics[1..]);

    assert_eq!(fixes.len(), 2);
    assert_eq!(fixes[0].edits[0].new_text, "Allowlist");
    assert_eq!(fixes[1].title, "[woke] Replace all 'whitelist' with 'allowlist'");
    assert_eq!(fixes[1].kind, FixKind::FixAll);
    let replaced: Vec<&str> = fixes[1].edits.iter().map(|e| e.new_text.as_str()).collect();
    assert_eq!(replaced, vec!["allowlist", "Allowlist"]);
}

#[tokio::test]
async fn test_non_zero_exit_clears_and_notifies_once() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 2);
    let (orchestrator, mut rx) = orchestrator_for(&woke, RunTrigger::OnType).await;

    let diagnostics = orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("whitelist\n"))
        .await;

    assert!(diagnostics.is_empty());
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level(), NotificationLevel::Error);
    let text = notifications[0].text();
    assert!(text.starts_with("Woke: woke failed."));
    assert!(text.contains("stderr output"));
    assert!(text.contains("--stdin"));
}

#[tokio::test]
async fn test_lint_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    let document = DocumentSnapshot::untitled("whitelist\n");

    let first = orchestrator.lint("untitled:1", &document).await;
    let second = orchestrator.lint("untitled:1", &document).await;

    assert_eq!(first, second);
    assert_eq!(orchestrator.published("untitled:1").len(), 1);
}

#[tokio::test]
async fn test_empty_document_does_not_spawn() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;

    let diagnostics = orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled(""))
        .await;

    assert!(diagnostics.is_empty());
    assert_eq!(recorded_args(dir.path()), None);
}

#[tokio::test]
async fn test_disabling_clears_published_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    let document = DocumentSnapshot::untitled("whitelist\n");
    orchestrator.lint("untitled:1", &document).await;

    orchestrator
        .configure(Settings {
            enable: false,
            executable_path: Some(woke),
            ..Settings::default()
        })
        .await;
    let diagnostics = orchestrator.lint("untitled:1", &document).await;

    assert!(diagnostics.is_empty());
    assert!(orchestrator.published("untitled:1").is_empty());
}

#[tokio::test]
async fn test_missing_executable_notifies_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(tx).with_state_path(None);
    orchestrator
        .configure(Settings {
            executable_path: Some(dir.path().join("missing-woke")),
            disable_version_check: true,
            ..Settings::default()
        })
        .await;
    drain(&mut rx);

    let diagnostics = orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("whitelist\n"))
        .await;

    assert!(diagnostics.is_empty());
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].text().contains("Failed to spawn"));
}

#[tokio::test]
async fn test_forget_drops_document_state() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), WHITELIST_REPORT, 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("whitelist\n"))
        .await;

    orchestrator.forget("untitled:1");

    assert!(orchestrator.published("untitled:1").is_empty());
    assert_eq!(orchestrator.state("untitled:1"), LintState::Unlinted);
    // Alternatives are shared across documents and survive.
    assert!(orchestrator.alternatives().get("whitelist").is_some());
}

#[tokio::test]
async fn test_working_directory_is_workspace_root() {
    let dir = tempfile::tempdir().unwrap();
    let pwd_woke = write_script(
        dir.path(),
        "pwd-woke",
        "pwd > \"$(dirname \"$0\")/pwd.txt\"\ncat > /dev/null\n",
    );
    let root = tempfile::tempdir().unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(tx).with_state_path(None);
    orchestrator.set_workspace_root(Some(root.path().to_path_buf()));
    orchestrator
        .configure(Settings {
            executable_path: Some(pwd_woke),
            disable_version_check: true,
            ..Settings::default()
        })
        .await;

    orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("text"))
        .await;

    let pwd = std::fs::read_to_string(dir.path().join("pwd.txt")).unwrap();
    assert_eq!(
        Path::new(pwd.trim()).canonicalize().unwrap(),
        root.path().canonicalize().unwrap()
    );
}

/// A woke that answers `--version` but exits with `code` without reading
/// stdin, so a large buffer hits a closed pipe.
fn woke_ignoring_stdin(dir: &Path, code: i32) -> std::path::PathBuf {
    write_script(
        dir,
        "woke",
        &format!(
            "if [ \"$1\" = \"--version\" ]; then\n  echo \"woke version 0.19.0\"\n  exit 0\nfi\nexit {code}\n"
        ),
    )
}

fn large_buffer() -> DocumentSnapshot {
    DocumentSnapshot::untitled("whitelist\n".repeat(100_000))
}

#[tokio::test]
async fn test_stdin_failure_with_failed_exit_notifies_once() {
    let dir = tempfile::tempdir().unwrap();
    let woke = woke_ignoring_stdin(dir.path(), 2);
    let (orchestrator, mut rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    assert!(drain(&mut rx).is_empty());

    let diagnostics = orchestrator.lint("untitled:1", &large_buffer()).await;

    assert!(diagnostics.is_empty());
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level(), NotificationLevel::Error);
    let text = notifications[0].text();
    assert!(text.starts_with("Woke: woke failed."));
    assert!(text.contains("Failed to write to STDIN"));
}

#[tokio::test]
async fn test_stdin_failure_with_clean_exit_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let woke = woke_ignoring_stdin(dir.path(), 0);
    let (orchestrator, mut rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    assert!(drain(&mut rx).is_empty());

    let diagnostics = orchestrator.lint("untitled:1", &large_buffer()).await;

    assert!(diagnostics.is_empty());
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level(), NotificationLevel::Error);
    assert!(
        notifications[0]
            .text()
            .starts_with("Woke: Failed to write to STDIN")
    );
}

#[tokio::test]
async fn test_outdated_tool_prompts_for_update_once() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke_with_version(dir.path(), "0.1.0", "", 0);
    let (orchestrator, mut rx) = orchestrator_for(&woke, RunTrigger::OnSave).await;
    orchestrator
        .configure(Settings {
            executable_path: Some(woke),
            ..Settings::default()
        })
        .await;

    assert_eq!(
        orchestrator.tool_status(),
        ToolStatus::Found(Some(Version::new(0, 1, 0)))
    );
    assert_eq!(
        drain(&mut rx),
        vec![Notification::UpdatePrompt {
            current: Some(Version::new(0, 1, 0))
        }]
    );
}

#[tokio::test]
async fn test_result_for_closed_document_is_not_published() {
    let dir = tempfile::tempdir().unwrap();
    let woke = write_script(
        dir.path(),
        "woke",
        &format!(
            "if [ \"$1\" = \"--version\" ]; then\n  echo \"woke version 0.19.0\"\n  exit 0\nfi\ncat > /dev/null\nsleep 1\ncat <<'WOKE_EOF'\n{WHITELIST_REPORT}\nWOKE_EOF\n"
        ),
    );
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;
    let document = DocumentSnapshot::untitled("whitelist\n");

    let (diagnostics, ()) = tokio::join!(orchestrator.lint("untitled:1", &document), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        orchestrator.forget("untitled:1");
    });

    assert_eq!(diagnostics.len(), 1);
    assert!(orchestrator.published("untitled:1").is_empty());
    assert_eq!(orchestrator.state("untitled:1"), LintState::Unlinted);
}

#[tokio::test]
async fn test_each_lint_runs_the_tool_once() {
    let dir = tempfile::tempdir().unwrap();
    let woke = fake_woke(dir.path(), "", 0);
    let (orchestrator, _rx) = orchestrator_for(&woke, RunTrigger::OnType).await;

    orchestrator
        .lint("untitled:1", &DocumentSnapshot::untitled("a"))
        .await;
    orchestrator
        .lint("untitled:2", &DocumentSnapshot::untitled("b"))
        .await;

    assert_eq!(run_count(dir.path()), 2);
}
