//! Stream events and `data: ` line classification.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Shown when an error event carries no message.
pub const GENERIC_STREAM_ERROR: &str = "Failed to generate replies";

/// One event on the generation stream, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Delta appended to the accumulated text.
    Text { content: String },
    /// Cumulative snapshot replacing the accumulated text.
    Content { content: String },
    Error {
        #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl StreamEvent {
    pub fn text(content: impl Into<String>) -> Self {
        StreamEvent::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            error: Some(message.into()),
        }
    }

    /// `data: {json}` followed by a blank line.
    pub fn to_sse(&self) -> serde_json::Result<String> {
        Ok(format!("{}{}\n\n", DATA_PREFIX, serde_json::to_string(self)?))
    }
}

/// The terminating sentinel line.
pub fn done_line() -> String {
    format!("{}{}\n\n", DATA_PREFIX, DONE_SENTINEL)
}

/// What a single decoded line means to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLine {
    Event(StreamEvent),
    /// Non-JSON payload, appended verbatim.
    Raw(String),
    Done,
    /// Blank separators, non-data lines and unparseable JSON objects.
    Skip,
}

pub fn classify_line(line: &str) -> DataLine {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => payload,
        None => return DataLine::Skip,
    };
    if payload.trim() == DONE_SENTINEL {
        return DataLine::Done;
    }
    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => DataLine::Event(event),
        Err(_) if !payload.trim_start().starts_with('{') => DataLine::Raw(payload.to_string()),
        Err(e) => {
            debug!(error = %e, "Skipping unparseable stream event");
            DataLine::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_and_content() {
        assert_eq!(
            classify_line(r#"data: {"type":"text","content":"Hel"}"#),
            DataLine::Event(StreamEvent::text("Hel"))
        );
        assert_eq!(
            classify_line("data: {\"type\":\"content\",\"content\":\"x\"}\r"),
            DataLine::Event(StreamEvent::Content {
                content: "x".to_string()
            })
        );
    }

    #[test]
    fn test_classify_error_with_message_alias() {
        assert_eq!(
            classify_line(r#"data: {"type":"error","message":"quota"}"#),
            DataLine::Event(StreamEvent::error("quota"))
        );
        assert_eq!(
            classify_line(r#"data: {"type":"error"}"#),
            DataLine::Event(StreamEvent::Error { error: None })
        );
    }

    #[test]
    fn test_classify_sentinel_and_noise() {
        assert_eq!(classify_line("data: [DONE]"), DataLine::Done);
        assert_eq!(classify_line(""), DataLine::Skip);
        assert_eq!(classify_line(": keep-alive"), DataLine::Skip);
        assert_eq!(classify_line("event: message"), DataLine::Skip);
    }

    #[test]
    fn test_non_json_payload_is_raw() {
        assert_eq!(
            classify_line("data: plain words"),
            DataLine::Raw("plain words".to_string())
        );
    }

    #[test]
    fn test_broken_or_unknown_object_is_skipped() {
        assert_eq!(classify_line(r#"data: {"type":"text","cont"#), DataLine::Skip);
        assert_eq!(classify_line(r#"data: {"type":"ping"}"#), DataLine::Skip);
    }

    #[test]
    fn test_to_sse() {
        assert_eq!(
            StreamEvent::text("hi").to_sse().unwrap(),
            "data: {\"type\":\"text\",\"content\":\"hi\"}\n\n"
        );
        assert_eq!(
            StreamEvent::error("boom").to_sse().unwrap(),
            "data: {\"type\":\"error\",\"error\":\"boom\"}\n\n"
        );
        assert_eq!(done_line(), "data: [DONE]\n\n");
    }
}
