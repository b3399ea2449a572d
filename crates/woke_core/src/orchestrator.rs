//! Lint orchestration: deciding when and how woke runs, and keeping the
//! published diagnostics per document.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use semver::Version;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::WokeError;
use crate::alternatives::AlternativesMap;
use crate::diagnostic::Diagnostic;
use crate::document::DocumentSnapshot;
use crate::executable::resolve_executable;
use crate::fix::{self, FixAction};
use crate::invocation::{Invocation, InvocationMode};
use crate::process;
use crate::report::parse_report;
use crate::settings::{PersistedState, RunTrigger, Settings};
use crate::version::{self, query_version};

/// Urgency of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Message for the user, delivered out of band from lint results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message {
        level: NotificationLevel,
        message: String,
    },
    /// The installed woke is older than required, or its version is unknown.
    UpdatePrompt { current: Option<Version> },
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Message {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn level(&self) -> NotificationLevel {
        match self {
            Notification::Message { level, .. } => *level,
            Notification::UpdatePrompt { .. } => NotificationLevel::Info,
        }
    }

    /// Text shown to the user.
    pub fn text(&self) -> String {
        match self {
            Notification::Message { message, .. } => format!("Woke: {}", message),
            Notification::UpdatePrompt { current } => {
                let current = current
                    .as_ref()
                    .map_or_else(|| "???".to_string(), Version::to_string);
                format!(
                    "Woke: woke-ls requires a newer version of \"woke\" (You got v{}, v{} or better is required)",
                    current,
                    version::MIN_TOOL_VERSION
                )
            }
        }
    }
}

/// Host events that may start a lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Opened,
    ContentChanged,
    Saved,
    /// The explicit run command.
    Command,
}

/// The single automatic trigger currently installed.
#[derive(Debug)]
pub struct TriggerSubscription {
    event: TriggerEvent,
    generation: u64,
}

impl TriggerSubscription {
    /// Creates the subscription for `trigger`; manual triggers have none.
    fn install(trigger: RunTrigger, generation: u64) -> Option<Self> {
        let event = match trigger {
            RunTrigger::OnSave => TriggerEvent::Saved,
            RunTrigger::OnType => TriggerEvent::ContentChanged,
            RunTrigger::Manual => return None,
        };
        debug!("Installed {:?} subscription #{}", event, generation);
        Some(Self { event, generation })
    }

    pub fn event(&self) -> TriggerEvent {
        self.event
    }

    fn fires_on(&self, event: TriggerEvent) -> bool {
        self.event == event
    }

    fn dispose(self) {
        debug!("Disposed {:?} subscription #{}", self.event, self.generation);
    }
}

/// Per-document lint progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LintState {
    #[default]
    Unlinted,
    Linting,
    Linted,
}

/// What is known about the configured executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolStatus {
    #[default]
    Unchecked,
    NotFound,
    /// The tool answered; the version is `None` when it could not be parsed.
    Found(Option<Version>),
}

/// Runs woke for documents and reconciles its output.
///
/// Shared between tasks behind an `Arc`. Locks are held only for short,
/// synchronous sections, never across an `.await`.
pub struct Orchestrator {
    settings: RwLock<Arc<Settings>>,
    executable: RwLock<PathBuf>,
    subscription: Mutex<Option<TriggerSubscription>>,
    generation: AtomicU64,
    alternatives: AlternativesMap,
    published: RwLock<HashMap<String, Vec<Diagnostic>>>,
    states: RwLock<HashMap<String, LintState>>,
    workspace_root: RwLock<Option<PathBuf>>,
    tool_status: RwLock<ToolStatus>,
    prompted: AtomicBool,
    /// Persisted "Don't Show Again", read once when the state path is set.
    prompt_suppressed: AtomicBool,
    state_path: Option<PathBuf>,
    notifier: UnboundedSender<Notification>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings.read())
            .field("executable", &self.executable.read())
            .field("published", &"<HashMap<String, Vec<Diagnostic>>>")
            .field("tool_status", &self.tool_status.read())
            .finish()
    }
}

impl Orchestrator {
    /// Creates an orchestrator with default settings. Notifications are sent
    /// to `notifier`.
    pub fn new(notifier: UnboundedSender<Notification>) -> Self {
        let settings = Settings::default();
        let state_path = PersistedState::default_path();
        Self {
            executable: RwLock::new(resolve_executable(settings.executable_path.as_deref())),
            subscription: Mutex::new(TriggerSubscription::install(settings.run, 0)),
            settings: RwLock::new(Arc::new(settings)),
            generation: AtomicU64::new(0),
            alternatives: AlternativesMap::new(),
            published: RwLock::new(HashMap::new()),
            states: RwLock::new(HashMap::new()),
            workspace_root: RwLock::new(None),
            tool_status: RwLock::new(ToolStatus::Unchecked),
            prompted: AtomicBool::new(false),
            prompt_suppressed: AtomicBool::new(persisted_suppression(state_path.as_deref())),
            state_path,
            notifier,
        }
    }

    /// Overrides where the persisted prompt state lives. `None` disables
    /// persistence.
    pub fn with_state_path(mut self, path: Option<PathBuf>) -> Self {
        self.prompt_suppressed = AtomicBool::new(persisted_suppression(path.as_deref()));
        self.state_path = path;
        self
    }

    /// Sets the working directory for woke runs.
    pub fn set_workspace_root(&self, root: Option<PathBuf>) {
        *self.workspace_root.write() = root;
    }

    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.read().clone()
    }

    /// The current settings snapshot.
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.read().clone()
    }

    pub fn executable(&self) -> PathBuf {
        self.executable.read().clone()
    }

    pub fn tool_status(&self) -> ToolStatus {
        self.tool_status.read().clone()
    }

    pub fn alternatives(&self) -> &AlternativesMap {
        &self.alternatives
    }

    /// The event the installed subscription listens to, if any.
    pub fn subscribed_event(&self) -> Option<TriggerEvent> {
        self.subscription.lock().as_ref().map(TriggerSubscription::event)
    }

    /// Applies a new settings snapshot.
    ///
    /// Replaces the automatic trigger subscription, resolves the executable
    /// and checks the installed woke version.
    pub async fn configure(&self, settings: Settings) {
        info!(
            "Configuring woke: enable={}, run={}, executable={:?}",
            settings.enable, settings.run, settings.executable_path
        );

        let executable = resolve_executable(settings.executable_path.as_deref());
        let enabled = settings.enable;
        let trigger = settings.run;
        *self.settings.write() = Arc::new(settings);
        *self.executable.write() = executable.clone();

        {
            let mut subscription = self.subscription.lock();
            if let Some(old) = subscription.take() {
                old.dispose();
            }
            let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            *subscription = TriggerSubscription::install(trigger, generation);
        }

        if !enabled {
            debug!("Linting disabled, skipping version check");
            return;
        }

        self.check_version(&executable).await;
    }

    async fn check_version(&self, executable: &Path) {
        match query_version(executable).await {
            Ok(Some(found)) => {
                info!("Found woke {} at {}", found, executable.display());
                let outdated = version::is_outdated(&found);
                *self.tool_status.write() = ToolStatus::Found(Some(found.clone()));
                if outdated {
                    self.prompt_for_update(Some(found));
                }
            }
            Ok(None) => {
                warn!("Could not parse woke version from {}", executable.display());
                *self.tool_status.write() = ToolStatus::Found(None);
                self.prompt_for_update(None);
            }
            Err(e) => {
                error!("woke version check failed: {}", e);
                *self.tool_status.write() = ToolStatus::NotFound;
                self.notify(Notification::error(format!(
                    "'{}' not found or not runnable. {}",
                    executable.display(),
                    e
                )));
                self.prompt_for_update(None);
            }
        }
    }

    fn version_prompt_disabled(&self) -> bool {
        self.settings().disable_version_check || self.prompt_suppressed.load(Ordering::SeqCst)
    }

    fn prompt_for_update(&self, current: Option<Version>) {
        if self.version_prompt_disabled() {
            debug!("Version prompt suppressed");
            return;
        }
        if self.prompted.swap(true, Ordering::SeqCst) {
            debug!("Version prompt already shown this session");
            return;
        }
        self.notify(Notification::UpdatePrompt { current });
    }

    /// Persists the user's request to never see the update prompt again.
    pub fn suppress_version_prompt(&self) -> Result<(), WokeError> {
        self.prompt_suppressed.store(true, Ordering::SeqCst);
        let Some(path) = self.state_path.as_deref() else {
            return Ok(());
        };
        let mut state = PersistedState::load(path);
        state.disable_version_check = true;
        state.save(path)?;
        info!("Version prompt disabled in {}", path.display());
        Ok(())
    }

    /// Decides whether a host event starts a lint.
    pub fn should_lint(&self, event: TriggerEvent) -> bool {
        let subscription = self.subscription.lock();
        match event {
            TriggerEvent::Command => true,
            TriggerEvent::Opened => subscription.is_some(),
            TriggerEvent::ContentChanged | TriggerEvent::Saved => {
                subscription.as_ref().is_some_and(|s| s.fires_on(event))
            }
        }
    }

    /// Lints a document and replaces its published diagnostics.
    ///
    /// Never fails: problems are reported through the notifier and leave the
    /// document with no diagnostics.
    pub async fn lint(&self, key: &str, document: &DocumentSnapshot) -> Vec<Diagnostic> {
        info!("Linting document: {}", key);
        self.set_state(key, LintState::Linting);

        let settings = self.settings();
        let diagnostics = if !settings.enable {
            debug!("Linting disabled, clearing diagnostics for {}", key);
            Vec::new()
        } else if document.text.is_empty() {
            debug!("Empty document, skipping woke for {}", key);
            Vec::new()
        } else {
            self.run_tool(&settings, document).await
        };

        {
            let mut states = self.states.write();
            // Forgotten while the tool ran: the document is closed.
            if !states.contains_key(key) {
                debug!("Dropping result for forgotten document {}", key);
                return diagnostics;
            }
            states.insert(key.to_string(), LintState::Linted);
            self.published
                .write()
                .insert(key.to_string(), diagnostics.clone());
        }

        diagnostics
    }

    async fn run_tool(&self, settings: &Settings, document: &DocumentSnapshot) -> Vec<Diagnostic> {
        let mode = InvocationMode::select(document, settings.run);
        let invocation = Invocation::lint(
            &self.executable(),
            &mode,
            &settings.custom_args,
            document,
            self.workspace_root().as_deref(),
        );

        let mut output = match process::run(&invocation).await {
            Ok(output) => output,
            Err(e) => {
                error!("{}", e);
                self.notify(Notification::error(e.to_string()));
                return Vec::new();
            }
        };
        let stdin_error = output.stdin_error.take().map(WokeError::StdinWrite);

        if !output.success() {
            let e = WokeError::ProcessFailed {
                program: invocation.program,
                args: invocation.args,
                code: output.code,
                stderr: output.stderr,
            };
            error!("{}", e);
            // A failed exit is reported once, with any stdin failure folded in.
            let message = match stdin_error {
                Some(stdin_error) => format!("{}\n{}", e, stdin_error),
                None => e.to_string(),
            };
            self.notify(Notification::error(message));
            return Vec::new();
        }

        if let Some(e) = stdin_error {
            warn!("{}", e);
            self.notify(Notification::error(e.to_string()));
        }

        parse_report(&output.stdout, &self.alternatives)
            .iter()
            .map(Diagnostic::from_finding)
            .collect()
    }

    /// The diagnostics last published for a document.
    pub fn published(&self, key: &str) -> Vec<Diagnostic> {
        self.published.read().get(key).cloned().unwrap_or_default()
    }

    pub fn state(&self, key: &str) -> LintState {
        self.states.read().get(key).copied().unwrap_or_default()
    }

    fn set_state(&self, key: &str, state: LintState) {
        self.states.write().insert(key.to_string(), state);
    }

    /// Builds fixes for `requested` diagnostics of a document whose current
    /// text is `text`.
    pub fn provide_fixes(&self, key: &str, text: &str, requested: &[Diagnostic]) -> Vec<FixAction> {
        let published = self.published(key);
        fix::provide_fixes(text, requested, &published, &self.alternatives)
    }

    /// Drops everything known about a closed document.
    pub fn forget(&self, key: &str) {
        self.published.write().remove(key);
        self.states.write().remove(key);
    }

    /// Clears all state held for the session.
    pub fn dispose(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.dispose();
        }
        self.published.write().clear();
        self.states.write().clear();
        self.alternatives.clear();
    }

    fn notify(&self, notification: Notification) {
        if self.notifier.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

fn persisted_suppression(path: Option<&Path>) -> bool {
    path.is_some_and(|path| PersistedState::load(path).disable_version_check)
}
