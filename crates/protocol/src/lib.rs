use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const COMMAND_API_VERSION: u32 = 1;

/// Follow-up request a client can issue to recover from an error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NextAction {
    pub action: String,
    pub args: serde_json::Value,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
    #[serde(default)]
    pub next_actions: Vec<NextAction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

impl Hint {
    pub fn new(kind: HintKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn hint_serializes_kind_as_type() {
        let hint = Hint::new(HintKind::Warn, "careful");
        assert_eq!(
            serde_json::to_value(&hint).unwrap(),
            json!({"type": "warn", "text": "careful"})
        );
    }

    #[test]
    fn error_envelope_defaults_next_actions() {
        let env: ErrorEnvelope =
            serde_json::from_str(r#"{"code":"x","message":"m","details":null,"hint":null}"#)
                .unwrap();
        assert!(env.next_actions.is_empty());
        assert!(serialize_json(&env, false)
            .unwrap()
            .contains("\"code\":\"x\""));
    }
}
