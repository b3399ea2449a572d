//! Settings snapshot and persisted prompt state.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::WokeError;

/// When automatic linting happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunTrigger {
    /// Lint when a document is saved.
    #[default]
    OnSave,
    /// Lint whenever the document content changes.
    OnType,
    /// Only lint on explicit request.
    Manual,
}

impl RunTrigger {
    /// Parses a configuration value. Unrecognised values mean `Manual`.
    pub fn parse(value: &str) -> Self {
        match value {
            "onSave" => RunTrigger::OnSave,
            "onType" => RunTrigger::OnType,
            _ => RunTrigger::Manual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunTrigger::OnSave => "onSave",
            RunTrigger::OnType => "onType",
            RunTrigger::Manual => "manual",
        }
    }

    /// Returns true for triggers that fire without user action.
    pub fn is_automatic(&self) -> bool {
        !matches!(self, RunTrigger::Manual)
    }
}

impl fmt::Display for RunTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunTrigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunTrigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|v| RunTrigger::parse(&v)).unwrap_or_default())
    }
}

/// Immutable snapshot of the user's configuration.
///
/// A configuration change produces a whole new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether linting is enabled.
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// When to lint automatically.
    #[serde(default)]
    pub run: RunTrigger,

    /// Path or name of the woke executable.
    #[serde(default)]
    pub executable_path: Option<PathBuf>,

    /// Extra arguments passed after the built-in ones.
    #[serde(default)]
    pub custom_args: Vec<String>,

    /// Never prompt about outdated woke versions.
    #[serde(default)]
    pub disable_version_check: bool,
}

fn default_enable() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: true,
            run: RunTrigger::OnSave,
            executable_path: None,
            custom_args: Vec::new(),
            disable_version_check: false,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON value sent by the client.
    ///
    /// Both a bare object and one nested under a `"woke"` key are accepted.
    /// `null` yields the defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("woke") => {
                map.remove("woke").unwrap_or_default()
            }
            other => other,
        };

        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }
}

/// State that outlives a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub disable_version_check: bool,
}

impl PersistedState {
    const FILE_NAME: &'static str = "state.json";

    /// Default location under the user's configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("woke-ls").join(Self::FILE_NAME))
    }

    /// Loads the state, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No persisted state at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring invalid state file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Writes the state, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), WokeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WokeError::Io(std::io::Error::other(e)))?;
        fs::write(path, json)?;
        Ok(())
    }
}
