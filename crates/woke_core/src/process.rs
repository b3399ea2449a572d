//! Spawning woke and collecting its output.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::WokeError;
use crate::invocation::Invocation;

/// Everything a finished process produced.
#[derive(Debug)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Set when writing the document to stdin failed.
    pub stdin_error: Option<std::io::Error>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an invocation to completion.
///
/// Stdin is written and closed while stdout and stderr are drained, so a tool
/// that starts printing before reading all of its input cannot deadlock. The
/// future resolves exactly once: with a spawn error, or with the output of the
/// exited process.
pub async fn run(invocation: &Invocation) -> Result<ProcessOutput, WokeError> {
    debug!(
        "Invoking {} {}",
        invocation.program.display(),
        invocation.args.join(" ")
    );

    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(cwd) = &invocation.cwd {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|source| WokeError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;

    let pipe = child.stdin.take();
    let write_input = async {
        let (Some(mut pipe), Some(text)) = (pipe, invocation.stdin.as_deref()) else {
            return None;
        };
        let result = pipe.write_all(text.as_bytes()).await;
        // Closing stdin signals end of input.
        drop(pipe);
        result.err()
    };

    let (stdin_error, output) = tokio::join!(write_input, child.wait_with_output());
    let output = output?;

    let result = ProcessOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        stdin_error,
    };

    debug!(
        "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
        invocation.program.display(),
        result.code,
        result.stdout.len(),
        result.stderr.len()
    );

    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_utils::write_script;
    use std::path::PathBuf;

    fn invocation(program: PathBuf, stdin: Option<&str>) -> Invocation {
        Invocation {
            program,
            args: vec!["-o".to_string(), "json".to_string()],
            cwd: None,
            stdin: stdin.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_collects_stdout_and_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo-back", "cat\necho done >&2\n");

        let output = run(&invocation(script, Some("hello\n"))).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "done\n");
        assert!(output.stdin_error.is_none());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fail", "echo broken >&2\nexit 3\n");

        let output = run(&invocation(script, None)).await.unwrap();

        assert_eq!(output.code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stderr, "broken\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-woke");

        let err = run(&invocation(missing, Some("text"))).await.unwrap_err();

        assert!(err.is_spawn_failure());
    }
}
