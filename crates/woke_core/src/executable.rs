//! Locating the woke executable.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Bare name of the executable.
pub const DEFAULT_EXECUTABLE: &str = "woke";

/// Returns the executable name with the platform suffix.
pub fn default_executable() -> PathBuf {
    PathBuf::from(format!("{}{}", DEFAULT_EXECUTABLE, env::consts::EXE_SUFFIX))
}

/// Resolves the configured executable.
///
/// Absolute paths are used as-is. Relative names are looked up on `PATH`;
/// when that fails, or nothing is configured, the default name is returned
/// and left to the operating system to find.
pub fn resolve_executable(configured: Option<&Path>) -> PathBuf {
    resolve_with_path(configured, env::var_os("PATH"))
}

fn resolve_with_path(configured: Option<&Path>, path_var: Option<OsString>) -> PathBuf {
    let Some(configured) = configured.filter(|p| !p.as_os_str().is_empty()) else {
        return default_executable();
    };

    if configured.is_absolute() {
        return configured.to_path_buf();
    }

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match which::which_in(configured, path_var, cwd) {
        Ok(found) => {
            debug!("Resolved {} to {}", configured.display(), found.display());
            found
        }
        Err(e) => {
            debug!("{} not found on PATH: {}", configured.display(), e);
            default_executable()
        }
    }
}
