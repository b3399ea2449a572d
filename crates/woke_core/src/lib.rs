//! # woke_core
//!
//! Editor-independent integration of the `woke` inclusive-language linter.
//!
//! This crate provides:
//! - The `Orchestrator`, which decides when woke runs and how it is invoked
//! - Parsing of woke's line-delimited JSON report into diagnostics
//! - Replacement fixes built from rule alternatives
//! - Settings, executable resolution and version checking
//!
//! ## Example
//!
//! ```rust,ignore
//! use woke_core::{DocumentSnapshot, Orchestrator, Settings};
//!
//! let (tx, mut notifications) = tokio::sync::mpsc::unbounded_channel();
//! let orchestrator = Orchestrator::new(tx);
//! orchestrator.configure(Settings::default()).await;
//!
//! let document = DocumentSnapshot::untitled("Add it to the whitelist.");
//! for diagnostic in orchestrator.lint("untitled:1", &document).await {
//!     println!("{}: {}", diagnostic.code, diagnostic.message);
//! }
//! ```

mod alternatives;
mod diagnostic;
mod document;
mod error;
pub mod executable;
mod fix;
pub mod invocation;
mod orchestrator;
pub mod process;
pub mod report;
mod settings;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alternatives::AlternativesMap;
pub use diagnostic::{DIAGNOSTIC_SOURCE, Diagnostic, Finding, LineRange, Severity};
pub use document::{DocumentSnapshot, text_in_range};
pub use error::WokeError;
pub use fix::{
    FixAction, FixKind, TextEdit, preserve_case, propose_fix_all, propose_single_fix,
    provide_fixes,
};
pub use orchestrator::{
    LintState, Notification, NotificationLevel, Orchestrator, ToolStatus, TriggerEvent,
    TriggerSubscription,
};
pub use settings::{PersistedState, RunTrigger, Settings};
