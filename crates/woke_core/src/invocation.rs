//! Argument and input selection for a woke run.

use std::path::{Path, PathBuf};

use crate::document::DocumentSnapshot;
use crate::settings::RunTrigger;

/// How the document reaches the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// Text is piped through standard input.
    Buffer,
    /// The tool reads the file at this path itself.
    File(PathBuf),
}

impl InvocationMode {
    /// Chooses the mode for a document.
    ///
    /// Only a saved file linted on save is read from disk; everything else
    /// may differ from what disk holds and goes through stdin.
    pub fn select(document: &DocumentSnapshot, trigger: RunTrigger) -> Self {
        match (&document.path, document.untitled, trigger) {
            (Some(path), false, RunTrigger::OnSave) => InvocationMode::File(path.clone()),
            _ => InvocationMode::Buffer,
        }
    }
}

/// A fully specified process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Text written to stdin, in buffer mode only.
    pub stdin: Option<String>,
}

impl Invocation {
    /// Builds the invocation for linting `document` in `mode`.
    pub fn lint(
        program: &Path,
        mode: &InvocationMode,
        custom_args: &[String],
        document: &DocumentSnapshot,
        cwd: Option<&Path>,
    ) -> Self {
        Self {
            program: program.to_path_buf(),
            args: build_args(mode, custom_args),
            cwd: cwd.map(Path::to_path_buf),
            stdin: match mode {
                InvocationMode::Buffer => Some(document.text.clone()),
                InvocationMode::File(_) => None,
            },
        }
    }

    /// Builds the `--version` query.
    pub fn version(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            args: vec!["--version".to_string()],
            cwd: None,
            stdin: None,
        }
    }
}

/// Buffer mode: `--stdin -o json [custom...]`.
/// File mode: `-o json [custom...] <path>`.
pub fn build_args(mode: &InvocationMode, custom_args: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(custom_args.len() + 4);
    if *mode == InvocationMode::Buffer {
        args.push("--stdin".to_string());
    }
    args.push("-o".to_string());
    args.push("json".to_string());
    args.extend(custom_args.iter().cloned());
    if let InvocationMode::File(path) = mode {
        args.push(path.to_string_lossy().into_owned());
    }
    args
}
