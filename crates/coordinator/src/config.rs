//! Behavior knobs for the coordinator.

use crate::error::ConfigError;
use imeswitch_switcher::ToggleKey;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Quiet period after the last cursor event before detection runs.
pub const DEFAULT_DELAY_MS: u64 = 300;

/// Automatic switching stays off this long after a manual switch.
pub const DEFAULT_PAUSE_AFTER_MANUAL_SWITCH_MS: u64 = 3000;

/// Document kinds where automatic switching is off unless configured otherwise.
pub const DEFAULT_DENY_LIST: &[&str] = &["plaintext", "markdown"];

/// Longest debounce or pause honored. Larger values are clamped so timer
/// deadlines stay representable.
pub const MAX_TIMER_MS: u64 = 24 * 60 * 60 * 1000;

/// Coordinator configuration.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
/// `denyList`/`allowList` accept either an array or a comma-separated string,
/// and the older `blacklist`/`whitelist` names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitcherConfig {
    /// Master switch for automatic detection.
    pub enabled: bool,

    pub delay_ms: u64,

    pub pause_after_manual_switch_ms: u64,

    /// Key the helper presses. `toggleKey` is accepted as an older name.
    #[serde(rename = "toggleKeyMode", alias = "toggleKey")]
    pub toggle_key: ToggleKey,

    /// Document kinds never switched automatically. Wins over `allow_list`.
    #[serde(alias = "blacklist", deserialize_with = "kind_set")]
    pub deny_list: BTreeSet<String>,

    /// When non-empty, only these document kinds are switched automatically.
    #[serde(alias = "whitelist", deserialize_with = "kind_set")]
    pub allow_list: BTreeSet<String>,

    /// Log every successful switch at info level.
    #[serde(alias = "log")]
    pub log_enabled: bool,

    /// Explicit helper path. `None` uses the bundled helper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: DEFAULT_DELAY_MS,
            pause_after_manual_switch_ms: DEFAULT_PAUSE_AFTER_MANUAL_SWITCH_MS,
            toggle_key: ToggleKey::default(),
            deny_list: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
            allow_list: BTreeSet::new(),
            log_enabled: false,
            executable: None,
        }
    }
}

impl SwitcherConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.min(MAX_TIMER_MS))
    }

    pub fn pause_after_manual_switch(&self) -> Duration {
        Duration::from_millis(self.pause_after_manual_switch_ms.min(MAX_TIMER_MS))
    }

    /// Whether automatic detection may run for `document_kind`.
    ///
    /// Deny-list membership rejects; otherwise a non-empty allow-list must
    /// contain the kind.
    pub fn is_allowed(&self, document_kind: &str) -> bool {
        if self.deny_list.contains(document_kind) {
            return false;
        }
        self.allow_list.is_empty() || self.allow_list.contains(document_kind)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write configuration as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(write_err)
    }
}

fn kind_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KindList {
        Csv(String),
        List(Vec<String>),
    }

    let items = match KindList::deserialize(deserializer)? {
        KindList::Csv(s) => s.split(',').map(str::to_string).collect(),
        KindList::List(v) => v,
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
