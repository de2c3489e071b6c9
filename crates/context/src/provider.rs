//! Provider traits for editor state.
//!
//! Hosts implement these so the coordinator can stay editor-agnostic.

use crate::state::{CursorSnapshot, EditorMode};

/// Supplies the cursor's line and column at the moment detection runs.
///
/// Implementations must perform a short, synchronous read. If the host needs
/// a specific thread for consistent document access, the implementation is
/// responsible for marshalling there.
pub trait CursorProvider: Send + Sync {
    /// Current cursor state, or `None` when there is nothing to judge
    /// (non-empty selection, editor closed, document disposed).
    fn snapshot(&self) -> Option<CursorSnapshot>;
}

/// A fixed snapshot is its own provider.
impl CursorProvider for CursorSnapshot {
    fn snapshot(&self) -> Option<CursorSnapshot> {
        Some(self.clone())
    }
}

/// A missing snapshot never produces a verdict.
impl CursorProvider for Option<CursorSnapshot> {
    fn snapshot(&self) -> Option<CursorSnapshot> {
        self.clone()
    }
}

/// Optional capability for modal editors.
pub trait ModeProvider: Send + Sync {
    /// Query the current editing mode. Must not fail; report
    /// [`EditorMode::Unavailable`] instead.
    fn mode(&self) -> EditorMode;
}

/// Mode provider for hosts without a modal-editing integration.
pub struct NoModeProvider;

impl ModeProvider for NoModeProvider {
    fn mode(&self) -> EditorMode {
        EditorMode::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_providers() {
        let snap = CursorSnapshot::new("abc", 1);
        assert_eq!(snap.snapshot(), Some(snap.clone()));

        let none: Option<CursorSnapshot> = None;
        assert_eq!(none.snapshot(), None);

        assert_eq!(NoModeProvider.mode(), EditorMode::Unavailable);
    }
}
