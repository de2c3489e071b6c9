//! Debounced IME switch coordination for imeswitch.
//!
//! The coordinator turns a stream of cursor movements into, at most, one
//! helper invocation per language change:
//!
//! - **Debounce**: detection runs only after `delay_ms` without new cursor
//!   events, and only the latest event is evaluated.
//! - **Dedup**: a language already confirmed by the helper is never
//!   requested again until something resets it.
//! - **Manual pause**: after a manual switch, automatic detection is off for
//!   `pause_after_manual_switch_ms`.
//! - **Gate**: per-document-kind allow/deny lists.
//!
//! # Architecture
//!
//! ```text
//! host adapter ──► CoordinatorHandle ──mpsc──► Worker task
//!                                               │  owns CoordinatorState
//!                                               │  select! over commands,
//!                                               │  debounce and pause deadlines
//!                                               ▼
//!                              CursorProvider ─► detect() ─► ImeSwitcher
//!                                                               │
//!                                                               ▼
//!                                                            EventBus
//! ```
//!
//! # Example
//!
//! ```ignore
//! use imeswitch_coordinator::{Coordinator, SwitcherConfig};
//! use std::sync::Arc;
//!
//! let (handle, _task) = Coordinator::new(SwitcherConfig::default(), switcher)
//!     .with_event_bus(Arc::new(my_status_bar))
//!     .spawn();
//!
//! handle.cursor_moved_at("你好", 2, "rust")?;
//! ```

mod config;
mod error;
mod handle;
mod state;
mod worker;

pub use config::{
    SwitcherConfig, DEFAULT_DELAY_MS, DEFAULT_DENY_LIST, DEFAULT_PAUSE_AFTER_MANUAL_SWITCH_MS,
    MAX_TIMER_MS,
};
pub use error::{ConfigError, CoordinatorError, Result};
pub use handle::{Coordinator, CoordinatorHandle};
pub use state::CoordinatorStatus;
