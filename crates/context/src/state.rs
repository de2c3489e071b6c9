//! Host-supplied cursor and editor state.

use serde::{Deserialize, Serialize};

/// Text of the cursor's line and the cursor position within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    /// Full text of the line the cursor is on.
    pub line_text: String,

    /// Cursor offset in characters from the start of the line.
    pub column: usize,
}

impl CursorSnapshot {
    pub fn new(line_text: impl Into<String>, column: usize) -> Self {
        Self {
            line_text: line_text.into(),
            column,
        }
    }

    pub fn detect(&self) -> crate::LangContext {
        crate::detect(&self.line_text, self.column)
    }
}

/// Editing mode reported by an optional modal-editing integration
/// (e.g. a Vim emulation layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum EditorMode {
    /// No modal-editing integration, or it could not be queried.
    #[default]
    Unavailable,

    /// Mode is known. `insert_like` is true for insert and replace modes.
    Known { insert_like: bool },
}

impl EditorMode {
    /// Normal, visual and command modes only ever take English input.
    pub fn forces_english(&self) -> bool {
        matches!(self, EditorMode::Known { insert_like: false })
    }
}
