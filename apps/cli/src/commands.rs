//! JSON-lines protocol spoken on stdin.

use imeswitch_context::TargetLang;
use serde::Deserialize;

/// One request from the editor side.
///
/// ```text
/// {"cmd":"cursor","line":"你好","column":1,"kind":"rust"}
/// {"cmd":"cursor","kind":"rust","selection":true}
/// {"cmd":"mode","insertLike":false}
/// {"cmd":"switch","lang":"zh"}
/// {"cmd":"toggle"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum HostCommand {
    /// The cursor moved. With `selection` set there is nothing to judge.
    Cursor {
        #[serde(default)]
        line: String,
        #[serde(default)]
        column: usize,
        kind: String,
        #[serde(default)]
        selection: bool,
    },

    /// Modal-editor state. `null` or absent means no modal integration.
    Mode {
        #[serde(default, rename = "insertLike")]
        insert_like: Option<bool>,
    },

    Switch {
        lang: TargetLang,
    },

    Toggle,

    Status,

    /// Ask the helper for the current input language.
    Query,

    /// Re-read the configuration file.
    Reload,
}

impl HostCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<serde_json::Result<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(serde_json::from_str(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> HostCommand {
        HostCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_cursor() {
        assert_eq!(
            parse(r#"{"cmd":"cursor","line":"你好","column":1,"kind":"rust"}"#),
            HostCommand::Cursor {
                line: "你好".to_string(),
                column: 1,
                kind: "rust".to_string(),
                selection: false,
            }
        );
    }

    #[test]
    fn test_parse_cursor_with_selection() {
        let cmd = parse(r#"{"cmd":"cursor","kind":"go","selection":true}"#);
        assert!(matches!(cmd, HostCommand::Cursor { selection: true, column: 0, .. }));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            parse(r#"{"cmd":"mode","insertLike":false}"#),
            HostCommand::Mode {
                insert_like: Some(false)
            }
        );
        assert_eq!(
            parse(r#"{"cmd":"mode","insertLike":null}"#),
            HostCommand::Mode { insert_like: None }
        );
        assert_eq!(
            parse(r#"{"cmd":"mode"}"#),
            HostCommand::Mode { insert_like: None }
        );
    }

    #[test]
    fn test_parse_switch_and_unit_commands() {
        assert_eq!(
            parse(r#"{"cmd":"switch","lang":"en"}"#),
            HostCommand::Switch {
                lang: TargetLang::En
            }
        );
        assert_eq!(parse(r#"{"cmd":"toggle"}"#), HostCommand::Toggle);
        assert_eq!(parse(r#"{"cmd":"status"}"#), HostCommand::Status);
        assert_eq!(parse(r#"{"cmd":"query"}"#), HostCommand::Query);
        assert_eq!(parse(r#" {"cmd":"reload"} "#), HostCommand::Reload);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(HostCommand::parse("   ").is_none());
        assert!(HostCommand::parse(r#"{"cmd":"fly"}"#).unwrap().is_err());
        assert!(HostCommand::parse(r#"{"cmd":"switch","lang":"fr"}"#)
            .unwrap()
            .is_err());
        assert!(HostCommand::parse("not json").unwrap().is_err());
    }
}
