//! Detecting the installed woke version.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use semver::Version;
use tracing::debug;

use crate::WokeError;
use crate::invocation::Invocation;
use crate::process;

/// Oldest woke release whose JSON output this server understands.
pub const MIN_TOOL_VERSION: Version = Version::new(0, 2, 0);

/// How long `--version` may take.
pub const VERSION_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Installation instructions shown when an update is needed.
pub const INSTALL_URL: &str = "https://github.com/get-woke/woke#installation";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"woke version (\d+)\.(\d+)((?:\.\d+)*)").expect("version pattern is valid")
});

/// Extracts the version from `woke --version` output.
///
/// A missing patch component counts as `0`; components past the third are
/// ignored.
pub fn parse_version(output: &str) -> Option<Version> {
    let captures = VERSION_PATTERN.captures(output)?;
    let major = captures[1].parse().ok()?;
    let minor = captures[2].parse().ok()?;
    let patch = captures[3]
        .split('.')
        .find(|part| !part.is_empty())
        .map(str::parse)
        .transpose()
        .ok()?
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// Returns true when `version` is older than [`MIN_TOOL_VERSION`].
pub fn is_outdated(version: &Version) -> bool {
    *version < MIN_TOOL_VERSION
}

/// Runs `<executable> --version` and parses the answer.
///
/// `Ok(None)` means the tool answered but not in the expected format.
pub async fn query_version(executable: &Path) -> Result<Option<Version>, WokeError> {
    let invocation = Invocation::version(executable);

    let output = tokio::time::timeout(VERSION_QUERY_TIMEOUT, process::run(&invocation))
        .await
        .map_err(|_| {
            WokeError::version_check(format!(
                "'{}' did not answer within {:?}",
                executable.display(),
                VERSION_QUERY_TIMEOUT
            ))
        })?
        .map_err(|e| WokeError::version_check(e.to_string()))?;

    if !output.success() {
        return Err(WokeError::version_check(format!(
            "'{} --version' exited with {:?}: {}",
            executable.display(),
            output.code,
            output.stderr.trim()
        )));
    }

    let version = parse_version(&output.stdout);
    debug!("Detected woke version: {:?}", version);
    Ok(version)
}
