//! Event bus abstraction for state notifications.
//!
//! The coordinator never talks to a status bar or notification API directly.
//! It emits JSON payloads on named topics and each host decides how to
//! present them.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Trait for emitting events to subscribers.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name (see [`crate::event_names`])
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize `event` and emit it on `topic`.
///
/// Serialization failures are logged and the event is dropped.
pub fn emit_event<T: Serialize>(bus: &dyn EventBus, topic: &str, event: &T) {
    match serde_json::to_value(event) {
        Ok(payload) => bus.emit(topic, payload),
        Err(e) => tracing::warn!(topic, error = %e, "failed to serialize event"),
    }
}

/// Event bus that forwards every event to a closure.
///
/// Handy for hosts whose "display" is a single function, such as a CLI
/// writing JSON lines.
pub struct CallbackEventBus<F> {
    callback: F,
}

impl<F> CallbackEventBus<F>
where
    F: Fn(&str, serde_json::Value) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventBus for CallbackEventBus<F>
where
    F: Fn(&str, serde_json::Value) + Send + Sync,
{
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        (self.callback)(topic, payload);
    }
}

/// In-memory event bus for testing.
///
/// Captures all emitted events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// A captured event from InMemoryEventBus.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<EmittedEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all captured events.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.guard().clone()
    }

    /// Get events for a specific topic, in emission order.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.guard()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.guard().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// No-op event bus that discards all events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_event_bus() {
        let bus = InMemoryEventBus::new();

        bus.emit("ime:state_changed", json!({"lang": "zh"}));
        bus.emit("ime:helper_unavailable", json!({"message": "missing"}));
        bus.emit("ime:state_changed", json!({"lang": "en"}));

        assert_eq!(bus.len(), 3);
        let changes = bus.events_for("ime:state_changed");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].payload["lang"], "en");
        assert_eq!(bus.events_for("ime:missing").len(), 0);
    }

    #[test]
    fn test_in_memory_event_bus_clear() {
        let bus = InMemoryEventBus::new();

        bus.emit("ime:state_changed", json!({}));
        assert!(!bus.is_empty());

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_callback_event_bus_forwards() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let bus = CallbackEventBus::new(move |topic: &str, payload| {
            sink.lock().unwrap().push((topic.to_string(), payload));
        });

        emit_event(&bus, "ime:state_changed", &json!({"lang": null}));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "ime:state_changed");
        assert!(seen[0].1["lang"].is_null());
    }

    #[test]
    fn test_null_event_bus() {
        NullEventBus.emit("ime:state_changed", json!({"lang": "zh"}));
    }
}
