//! Error types for woke invocations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running the woke executable.
#[derive(Debug, Error)]
pub enum WokeError {
    /// The executable could not be started at all.
    #[error("Failed to spawn '{}' binary.\nError: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran and exited unsuccessfully.
    #[error(
        "woke failed.\nExecutable:\n{}\nArguments:\n{}\nstderr:\n{stderr}",
        program.display(),
        args.join("\n")
    )]
    ProcessFailed {
        program: PathBuf,
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },

    /// Writing the document to the tool's stdin failed.
    #[error("Failed to write to STDIN\nError: {0}")]
    StdinWrite(#[source] std::io::Error),

    /// One line of tool output was not a valid report.
    #[error("Invalid report line: {0}")]
    LineParse(String),

    /// The `--version` query failed or timed out.
    #[error("Failed to determine woke version: {0}")]
    VersionCheck(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WokeError {
    /// Creates a version check error.
    pub fn version_check(message: impl Into<String>) -> Self {
        Self::VersionCheck(message.into())
    }

    /// Returns true when the tool never started.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message_lists_arguments() {
        let err = WokeError::ProcessFailed {
            program: PathBuf::from("woke"),
            args: vec!["--stdin".to_string(), "-o".to_string(), "json".to_string()],
            code: Some(1),
            stderr: "boom".to_string(),
        };

        let message = err.to_string();
        assert!(message.starts_with("woke failed."));
        assert!(message.contains("--stdin\n-o\njson"));
        assert!(message.contains("stderr:\nboom"));
        assert!(!err.is_spawn_failure());
    }

    #[test]
    fn test_spawn_message_names_program() {
        let err = WokeError::Spawn {
            program: PathBuf::from("/opt/bin/woke"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.to_string().contains("Failed to spawn '/opt/bin/woke' binary."));
        assert!(err.is_spawn_failure());
    }
}
