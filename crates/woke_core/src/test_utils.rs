//! Helpers for tests that need a fake woke executable.

use std::fs;
use std::path::{Path, PathBuf};

/// A report line for a single `whitelist` finding on the first line.
pub const WHITELIST_REPORT: &str = r#"{"Results":[{"Rule":{"Name":"whitelist","Severity":"warning","Alternatives":["allowlist"]},"Reason":"'whitelist' may be insensitive, use 'allowlist' instead","StartPosition":{"Line":1,"Column":0},"EndPosition":{"Column":9}}]}"#;

/// Two `whitelist` findings, the second capitalised on the second line.
pub const TWO_WHITELIST_REPORT: &str = r#"{"Results":[{"Rule":{"Name":"whitelist","Severity":"warning","Alternatives":["allowlist"]},"Reason":"'whitelist' may be insensitive, use 'allowlist' instead","StartPosition":{"Line":1,"Column":0},"EndPosition":{"Column":9}},{"Rule":{"Name":"whitelist","Severity":"warning","Alternatives":["allowlist"]},"Reason":"'Whitelist' may be insensitive, use 'allowlist' instead","StartPosition":{"Line":2,"Column":4},"EndPosition":{"Column":13}}]}"#;

/// Writes an executable `/bin/sh` script and returns its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Writes a fake woke 0.19.0 that records its arguments and stdin next to
/// itself, prints `stdout` and exits with `code`.
#[cfg(unix)]
pub fn fake_woke(dir: &Path, stdout: &str, code: i32) -> PathBuf {
    fake_woke_with_version(dir, "0.19.0", stdout, code)
}

/// Like [`fake_woke`], answering `--version` with `version`.
#[cfg(unix)]
pub fn fake_woke_with_version(dir: &Path, version: &str, stdout: &str, code: i32) -> PathBuf {
    let body = format!(
        r#"DIR=$(dirname "$0")
if [ "$1" = "--version" ]; then
  echo "woke version {version}"
  exit 0
fi
echo run >> "$DIR/runs.txt"
printf '%s\n' "$@" > "$DIR/args.txt"
if [ "$1" = "--stdin" ]; then
  cat > "$DIR/stdin.txt"
fi
cat <<'WOKE_EOF'
{stdout}
WOKE_EOF
echo "stderr output" >&2
exit {code}
"#
    );
    write_script(dir, "woke", &body)
}

/// Arguments recorded by the last [`fake_woke`] run, `None` if it never ran.
pub fn recorded_args(dir: &Path) -> Option<Vec<String>> {
    fs::read_to_string(dir.join("args.txt"))
        .ok()
        .map(|s| s.lines().map(str::to_string).collect())
}

/// Stdin recorded by the last [`fake_woke`] run, if it was in buffer mode.
pub fn recorded_stdin(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join("stdin.txt")).ok()
}

/// How many lint runs the [`fake_woke`] in `dir` has served.
pub fn run_count(dir: &Path) -> usize {
    fs::read_to_string(dir.join("runs.txt"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}
