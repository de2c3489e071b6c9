//! Character classification and cursor-window detection.
//!
//! Everything here is total and side-effect free: any `char` has a class,
//! and any line/column pair has a verdict.

use crate::lang::LangContext;

/// Characters inspected on each side of the cursor by [`detect`].
pub const DEFAULT_LOOK_AROUND: usize = 1;

/// Script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// CJK ideograph or Chinese full-width punctuation.
    Chinese,
    /// Visible ASCII (`!` through `~`).
    Latin,
    /// Whitespace, control characters, other scripts and symbols.
    Neutral,
}

/// Whether `ch` is a CJK ideograph (unified, extensions A-E, compatibility).
pub fn is_cjk_ideograph(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x4E00..=0x9FFF       // CJK Unified Ideographs
            | 0x3400..=0x4DBF // Extension A
            | 0x20000..=0x2A6DF // Extension B
            | 0x2A700..=0x2CEAF // Extensions C/D/E
            | 0xF900..=0xFAFF // Compatibility Ideographs
    )
}

/// Whether `ch` is punctuation typed by a Chinese input method.
pub fn is_chinese_punctuation(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x3000..=0x303F       // CJK Symbols and Punctuation
            | 0xFF00..=0xFFEF // Halfwidth and Fullwidth Forms
            | 0x201C | 0x201D // “ ”
            | 0x2018 | 0x2019 // ‘ ’
            | 0x2026          // …
            | 0x2014 // —
    )
}

/// Classify a single character.
pub fn classify(ch: char) -> CharacterClass {
    if is_cjk_ideograph(ch) || is_chinese_punctuation(ch) {
        CharacterClass::Chinese
    } else if matches!(u32::from(ch), 0x21..=0x7E) {
        CharacterClass::Latin
    } else {
        CharacterClass::Neutral
    }
}

/// Detect the language context around `cursor_column` with the default
/// look-around of one character on each side.
///
/// `cursor_column` is a character (not byte) offset into `line_text`.
pub fn detect(line_text: &str, cursor_column: usize) -> LangContext {
    detect_with(line_text, cursor_column, DEFAULT_LOOK_AROUND)
}

/// Detect the language context in the window
/// `[cursor_column - look_around, cursor_column + look_around)`.
///
/// The window is clipped to the line. Neutral characters do not count
/// towards either side.
pub fn detect_with(line_text: &str, cursor_column: usize, look_around: usize) -> LangContext {
    let start = cursor_column.saturating_sub(look_around);
    let end = cursor_column.saturating_add(look_around);

    let mut zh = 0usize;
    let mut en = 0usize;
    for ch in line_text.chars().skip(start).take(end - start) {
        match classify(ch) {
            CharacterClass::Chinese => zh += 1,
            CharacterClass::Latin => en += 1,
            CharacterClass::Neutral => {}
        }
    }

    match (zh > 0, en > 0) {
        (true, false) => LangContext::Zh,
        (false, true) => LangContext::En,
        (true, true) => LangContext::Mixed,
        (false, false) => LangContext::Unknown,
    }
}
