//! Messages exchanged between the controller and the display layer

use serde::{Deserialize, Serialize};

/// Wire messages, tagged by `type` the same way the browser side sends them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Display → controller: start or stop the loop
    ToggleRedeem,
    /// Controller → display: human readable status line
    RedeemStatus { text: String, color: String },
    /// Controller → display: epoch ms of the next check, 0 when cleared
    CountdownUpdate { timestamp: i64 },
    /// Controller → display: run state
    StatusUpdate { running: bool },
}

/// Color codes used on status lines
pub mod colors {
    pub const NEUTRAL: &str = "#666";
    pub const PROGRESS: &str = "#888";
    pub const ALERT: &str = "#c00";
    pub const SUCCESS: &str = "#0a0";
}

/// One status line with its color code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub text: String,
    pub color: String,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, color: &str) -> Self {
        Self {
            text: text.into(),
            color: color.to_string(),
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, colors::NEUTRAL)
    }

    pub fn progress(text: impl Into<String>) -> Self {
        Self::new(text, colors::PROGRESS)
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self::new(text, colors::ALERT)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, colors::SUCCESS)
    }
}

impl From<StatusLine> for Message {
    fn from(line: StatusLine) -> Self {
        Message::RedeemStatus {
            text: line.text,
            color: line.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_matches_browser_messages() {
        assert_eq!(
            serde_json::to_value(Message::ToggleRedeem).unwrap(),
            json!({ "type": "TOGGLE_REDEEM" })
        );
        assert_eq!(
            serde_json::to_value(Message::from(StatusLine::alert("Error: boom"))).unwrap(),
            json!({ "type": "REDEEM_STATUS", "text": "Error: boom", "color": "#c00" })
        );
        assert_eq!(
            serde_json::to_value(Message::CountdownUpdate { timestamp: 0 }).unwrap(),
            json!({ "type": "COUNTDOWN_UPDATE", "timestamp": 0 })
        );
    }

    #[test]
    fn parses_incoming_status_update() {
        let msg: Message =
            serde_json::from_str(r#"{"type":"STATUS_UPDATE","running":true}"#).unwrap();
        assert_eq!(msg, Message::StatusUpdate { running: true });
    }
}
