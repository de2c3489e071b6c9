//! Coordinator state owned by the worker task.

use crate::config::SwitcherConfig;
use imeswitch_context::{CursorProvider, TargetLang};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;

/// A detection waiting for its debounce deadline.
pub(crate) struct PendingDetect {
    pub deadline: Instant,
    pub document_kind: String,
    /// Read when the deadline fires, not when the event arrived.
    pub provider: Arc<dyn CursorProvider>,
}

/// All mutable coordinator state.
///
/// Each timer is a single `Option`, so scheduling a new one drops its
/// predecessor.
pub(crate) struct CoordinatorState {
    pub config: SwitcherConfig,
    /// Last language the helper confirmed. `None` forces the next switch.
    pub last_switched: Option<TargetLang>,
    pub pause_deadline: Option<Instant>,
    pub pending: Option<PendingDetect>,
    /// Helper-unavailable is reported once per coordinator.
    pub helper_notice_sent: bool,
}

impl CoordinatorState {
    pub fn new(config: SwitcherConfig) -> Self {
        Self {
            config,
            last_switched: None,
            pause_deadline: None,
            pending: None,
            helper_notice_sent: false,
        }
    }

    pub fn is_paused(&self, now: Instant) -> bool {
        self.pause_deadline.is_some_and(|deadline| now < deadline)
    }

    /// Start (or restart) the manual-pause window.
    pub fn pause(&mut self, now: Instant) {
        self.pause_deadline = Some(now + self.config.pause_after_manual_switch());
    }

    /// Replace any pending detection with one due after the debounce delay.
    pub fn schedule(
        &mut self,
        document_kind: String,
        provider: Arc<dyn CursorProvider>,
        now: Instant,
    ) {
        self.pending = Some(PendingDetect {
            deadline: now + self.config.delay(),
            document_kind,
            provider,
        });
    }

    /// Drop the pending detection. Returns whether one existed.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Flip `enabled`; disabling cancels the pending detection.
    pub fn toggle_enabled(&mut self) -> bool {
        self.config.enabled = !self.config.enabled;
        if !self.config.enabled {
            self.cancel_pending();
        }
        self.config.enabled
    }

    /// Swap in a new configuration. Disabling cancels the pending detection.
    pub fn replace_config(&mut self, config: SwitcherConfig) {
        if !config.enabled {
            self.cancel_pending();
        }
        self.config = config;
    }

    pub fn status(&self, now: Instant) -> CoordinatorStatus {
        CoordinatorStatus {
            enabled: self.config.enabled,
            last_switched: self.last_switched,
            paused: self.is_paused(now),
            pending: self.pending.is_some(),
        }
    }
}

/// Point-in-time view of the coordinator, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorStatus {
    pub enabled: bool,
    pub last_switched: Option<TargetLang>,
    /// Inside the pause window after a manual switch.
    pub paused: bool,
    /// A debounced detection is scheduled.
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use imeswitch_context::CursorSnapshot;
    use std::time::Duration;

    fn provider(text: &str, column: usize) -> Arc<dyn CursorProvider> {
        Arc::new(CursorSnapshot::new(text, column))
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let mut state = CoordinatorState::new(SwitcherConfig::default());
        let now = Instant::now();

        state.schedule("rust".into(), provider("abc", 1), now);
        state.schedule("go".into(), provider("你好", 1), now + Duration::from_millis(100));

        let pending = state.pending.as_ref().unwrap();
        assert_eq!(pending.document_kind, "go");
        assert_eq!(pending.deadline, now + Duration::from_millis(400));
    }

    #[test]
    fn test_pause_window() {
        let mut state = CoordinatorState::new(SwitcherConfig::default());
        let now = Instant::now();
        assert!(!state.is_paused(now));

        state.pause(now);
        assert!(state.is_paused(now + Duration::from_millis(2999)));
        assert!(!state.is_paused(now + Duration::from_millis(3000)));
    }

    #[test]
    fn test_huge_timer_config_does_not_overflow() {
        let mut state = CoordinatorState::new(SwitcherConfig {
            delay_ms: u64::MAX,
            pause_after_manual_switch_ms: u64::MAX,
            ..Default::default()
        });
        let now = Instant::now();

        state.pause(now);
        state.schedule("rust".into(), provider("abc", 1), now);

        assert!(state.is_paused(now + Duration::from_secs(3600)));
        assert!(state.pending.is_some());
    }

    #[test]
    fn test_disable_cancels_pending() {
        let mut state = CoordinatorState::new(SwitcherConfig::default());
        state.schedule("rust".into(), provider("abc", 1), Instant::now());

        assert!(!state.toggle_enabled());
        assert!(state.pending.is_none());

        assert!(state.toggle_enabled());
        assert!(!state.cancel_pending());
    }

    #[test]
    fn test_replace_config_disabled_cancels_pending() {
        let mut state = CoordinatorState::new(SwitcherConfig::default());
        state.schedule("rust".into(), provider("abc", 1), Instant::now());

        state.replace_config(SwitcherConfig {
            delay_ms: 50,
            ..Default::default()
        });
        assert!(state.pending.is_some());

        state.replace_config(SwitcherConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(state.pending.is_none());
        assert!(!state.status(Instant::now()).enabled);
    }
}
