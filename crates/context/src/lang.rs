//! Language verdicts and switch targets.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use serde::{Deserialize, Serialize};

/// Language context inferred from the characters around the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LangContext {
    /// Only Chinese characters (ideographs or full-width punctuation) nearby.
    Zh,

    /// Only visible ASCII nearby.
    En,

    /// Both Chinese and ASCII nearby. Never triggers a switch.
    Mixed,

    /// Nothing countable nearby (empty line, whitespace, other scripts).
    #[default]
    Unknown,
}

impl LangContext {
    pub fn label(&self) -> &'static str {
        match self {
            LangContext::Zh => "zh",
            LangContext::En => "en",
            LangContext::Mixed => "mixed",
            LangContext::Unknown => "unknown",
        }
    }

    /// Returns the switch target for this verdict, if there is one.
    pub fn target(&self) -> Option<TargetLang> {
        TargetLang::try_from(*self).ok()
    }
}

impl std::fmt::Display for LangContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A language the input method can actually be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLang {
    Zh,
    En,
}

impl TargetLang {
    /// Argument form understood by the switch helper (`zh` / `en`).
    pub fn as_arg(&self) -> &'static str {
        match self {
            TargetLang::Zh => "zh",
            TargetLang::En => "en",
        }
    }

    /// Parses helper output. Case-insensitive, surrounding whitespace ignored.
    pub fn parse_arg(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Some(TargetLang::Zh),
            "en" => Some(TargetLang::En),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

impl From<TargetLang> for LangContext {
    fn from(lang: TargetLang) -> Self {
        match lang {
            TargetLang::Zh => LangContext::Zh,
            TargetLang::En => LangContext::En,
        }
    }
}

/// Returned when a `Mixed` or `Unknown` verdict is converted to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("language context '{0}' has no switch target")]
pub struct NotSwitchable(pub LangContext);

impl TryFrom<LangContext> for TargetLang {
    type Error = NotSwitchable;

    fn try_from(ctx: LangContext) -> Result<Self, Self::Error> {
        match ctx {
            LangContext::Zh => Ok(TargetLang::Zh),
            LangContext::En => Ok(TargetLang::En),
            other => Err(NotSwitchable(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_zh_and_en_are_switchable() {
        assert_eq!(LangContext::Zh.target(), Some(TargetLang::Zh));
        assert_eq!(LangContext::En.target(), Some(TargetLang::En));
        assert_eq!(LangContext::Mixed.target(), None);
        assert_eq!(
            TargetLang::try_from(LangContext::Unknown),
            Err(NotSwitchable(LangContext::Unknown))
        );
    }

    #[test]
    fn test_parse_helper_output() {
        assert_eq!(TargetLang::parse_arg("ZH\r\n"), Some(TargetLang::Zh));
        assert_eq!(TargetLang::parse_arg(" en "), Some(TargetLang::En));
        assert_eq!(TargetLang::parse_arg("jp"), None);
        assert_eq!(TargetLang::parse_arg(""), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TargetLang::Zh).unwrap();
        assert_eq!(json, "\"zh\"");
        let ctx: LangContext = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(ctx, LangContext::Mixed);
    }
}
