//! External input-method switching for imeswitch.
//!
//! The actual IME toggle is performed by a small platform helper
//! (`ime-switcher.exe`, or the `ime-switcher.ps1` fallback). This crate
//! locates that helper and runs it as a child process.
//!
//! # Helper protocol
//!
//! - `ime-switcher set <zh|en> --key=<shift|ctrl|auto>` switches the IME's
//!   Chinese/English mode; exit code 0 means success.
//! - `ime-switcher query` prints `zh` or `en`.
//!
//! # Example
//!
//! ```ignore
//! use imeswitch_switcher::{HelperSwitcher, ImeSwitcher, ToggleKey};
//! use imeswitch_context::TargetLang;
//!
//! let switcher = HelperSwitcher::new(Some(plugin_dir), None);
//! switcher.switch(TargetLang::Zh, ToggleKey::Auto).await?;
//! ```

mod error;
mod helper;

use async_trait::async_trait;
use imeswitch_context::TargetLang;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error::{Result, SwitchError};
pub use helper::{
    Helper, HelperSwitcher, DEFAULT_HELPER_TIMEOUT, HELPER_EXE, HELPER_SCRIPT,
};

/// Key the helper presses to flip the IME between Chinese and English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKey {
    Shift,
    Ctrl,
    /// Let the helper pick based on the active IME.
    #[default]
    Auto,
}

impl ToggleKey {
    pub fn as_arg(&self) -> &'static str {
        match self {
            ToggleKey::Shift => "shift",
            ToggleKey::Ctrl => "ctrl",
            ToggleKey::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

/// Performs the actual input-method switch.
///
/// The coordinator awaits each call before making its next decision, so
/// implementations never see concurrent invocations from one coordinator.
#[async_trait]
pub trait ImeSwitcher: Send + Sync {
    /// Switch the input method to `lang`.
    async fn switch(&self, lang: TargetLang, key: ToggleKey) -> Result<()>;

    /// Current input language as reported by the helper, if it can tell.
    async fn query(&self) -> Result<Option<TargetLang>>;

    /// Whether a helper can be resolved right now.
    fn is_available(&self) -> bool;
}

/// Type alias for a shared switcher.
pub type ImeSwitcherRef = Arc<dyn ImeSwitcher>;
