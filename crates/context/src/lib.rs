//! Cursor-context language classification for imeswitch.
//!
//! This crate answers one question: is the user typing Chinese or English
//! right where the cursor sits? It looks at the characters immediately
//! around the cursor and produces a [`LangContext`] verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  lang.rs     - LangContext / TargetLang (pure)              │
//! │  classify.rs - Character classes and window detection       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Host Seams                              │
//! │  state.rs    - CursorSnapshot, EditorMode                   │
//! │  provider.rs - Traits hosts implement (cursor, editor mode) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use imeswitch_context::{detect, LangContext};
//!
//! assert_eq!(detect("你好", 1), LangContext::Zh);
//! assert_eq!(detect("hello", 3), LangContext::En);
//! ```

mod classify;
mod lang;
mod provider;
mod state;

pub use classify::{
    classify, detect, detect_with, is_chinese_punctuation, is_cjk_ideograph, CharacterClass,
    DEFAULT_LOOK_AROUND,
};
pub use lang::{LangContext, NotSwitchable, TargetLang};
pub use provider::{CursorProvider, ModeProvider, NoModeProvider};
pub use state::{CursorSnapshot, EditorMode};
