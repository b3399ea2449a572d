//! Check command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, WrapErr};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn};
use woke_core::version::INSTALL_URL;
use woke_core::{
    DocumentSnapshot, Notification, NotificationLevel, Orchestrator, RunTrigger, Settings,
};

use crate::cli::OutputFormat;
use crate::output::{CheckResult, output_results};
use crate::utils::create_tokio_runtime;

/// Name under which text read from stdin is reported.
pub const STDIN_NAME: &str = "<stdin>";

pub struct CheckOptions {
    pub files: Vec<PathBuf>,
    pub stdin: bool,
    pub executable: Option<PathBuf>,
    pub format: OutputFormat,
    pub custom_args: Vec<String>,
}

/// Lints every input once. Returns true when any diagnostic was produced.
pub fn run_check(options: CheckOptions) -> Result<bool> {
    let runtime = create_tokio_runtime()?;
    let results = runtime.block_on(check(&options))?;
    output_results(&results, options.format)
}

async fn check(options: &CheckOptions) -> Result<Vec<CheckResult>> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(tx).with_state_path(None);
    orchestrator.set_workspace_root(std::env::current_dir().ok());
    orchestrator
        .configure(Settings {
            enable: true,
            // Files on disk are what woke should read directly.
            run: RunTrigger::OnSave,
            executable_path: options.executable.clone(),
            custom_args: options.custom_args.clone(),
            disable_version_check: false,
        })
        .await;

    let mut results = Vec::new();

    if options.stdin {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .into_diagnostic()
            .wrap_err("Failed to read standard input")?;
        let diagnostics = orchestrator
            .lint(STDIN_NAME, &DocumentSnapshot::untitled(text))
            .await;
        results.push(CheckResult {
            name: STDIN_NAME.to_string(),
            diagnostics,
        });
    }

    for file in &options.files {
        let text = tokio::fs::read_to_string(file)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
        let path = std::path::absolute(file).into_diagnostic()?;
        let name = file.display().to_string();

        info!("Checking {}", name);
        let diagnostics = orchestrator
            .lint(&name, &DocumentSnapshot::file(text, path))
            .await;
        results.push(CheckResult { name, diagnostics });
    }

    if report_notifications(&mut rx) {
        return Err(miette::miette!("woke did not run successfully"));
    }

    Ok(results)
}

/// Logs pending notifications. Returns true if any of them was an error.
fn report_notifications(rx: &mut UnboundedReceiver<Notification>) -> bool {
    let mut failed = false;
    while let Ok(notification) = rx.try_recv() {
        match notification.level() {
            NotificationLevel::Error => {
                failed = true;
                error!("{}", notification.text());
            }
            NotificationLevel::Warning => warn!("{}", notification.text()),
            NotificationLevel::Info => match notification {
                Notification::UpdatePrompt { .. } => {
                    warn!("{} See {}", notification.text(), INSTALL_URL)
                }
                Notification::Message { .. } => info!("{}", notification.text()),
            },
        }
    }
    failed
}
