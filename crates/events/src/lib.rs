//! Shared event contracts between the coordinator and its hosts.
//!
//! This crate defines the DTOs for events the coordinator emits, and the
//! `EventBus` trait hosts implement to receive them. Using shared types keeps
//! field names in sync between emitter and display.

mod bus;

pub use bus::{
    emit_event, CallbackEventBus, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus,
    NullEventBus,
};

use imeswitch_context::TargetLang;
use serde::{Deserialize, Serialize};

/// Event emitted when the confirmed input language or the enabled flag changes.
///
/// Producers: coordinator (successful switch, toggle, config update)
/// Consumers: status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangedEvent {
    /// Last language the helper confirmed, `None` if unknown.
    #[serde(default)]
    pub lang: Option<TargetLang>,
    /// Whether automatic switching is enabled.
    pub enabled: bool,
}

impl StateChangedEvent {
    /// Short label for a status indicator.
    pub fn status_label(&self) -> &'static str {
        if !self.enabled {
            return "○ IME";
        }
        match self.lang {
            Some(TargetLang::Zh) => "中",
            Some(TargetLang::En) => "EN",
            None => "IME",
        }
    }
}

/// Event emitted once when the switch helper cannot be found.
///
/// Producers: coordinator
/// Consumers: host notification surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperUnavailableEvent {
    /// Human-readable description of what was searched.
    pub message: String,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Input language or enabled flag changed.
    pub const STATE_CHANGED: &str = "ime:state_changed";
    /// Switch helper could not be resolved.
    pub const HELPER_UNAVAILABLE: &str = "ime:helper_unavailable";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_changed_roundtrip_minimal() {
        let json = r#"{"enabled": true}"#;
        let event: StateChangedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.lang, None);
        assert!(event.enabled);
    }

    #[test]
    fn test_state_changed_serializes_lowercase_lang() {
        let event = StateChangedEvent {
            lang: Some(TargetLang::Zh),
            enabled: true,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["lang"], "zh");
    }

    #[test]
    fn test_status_label() {
        let mut event = StateChangedEvent {
            lang: Some(TargetLang::Zh),
            enabled: true,
        };
        assert_eq!(event.status_label(), "中");
        event.lang = Some(TargetLang::En);
        assert_eq!(event.status_label(), "EN");
        event.lang = None;
        assert_eq!(event.status_label(), "IME");
        event.enabled = false;
        assert_eq!(event.status_label(), "○ IME");
    }
}
