//! Reply extraction from the final accumulated text.

use reply_core::{ReplyOption, REPLY_COUNT};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// Parses the bracketed span from the first `[` to the last `]` as a JSON array and
/// returns at most [`REPLY_COUNT`] options. Anything unparseable yields no options.
pub fn extract_replies(text: &str) -> Vec<ReplyOption> {
    let (start, end) = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            debug!("No reply array in stream text");
            return Vec::new();
        }
    };
    let items: Vec<Value> = match serde_json::from_str(&text[start..=end]) {
        Ok(items) => items,
        Err(e) => {
            debug!(error = %e, "Reply array did not parse");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .take(REPLY_COUNT)
        .enumerate()
        .map(|(index, item)| ReplyOption {
            id: Uuid::new_v4().to_string(),
            index,
            text: coerce_reply_text(item),
        })
        .collect()
}

/// Strings as-is, objects by their `text` field, anything else as JSON.
pub fn coerce_reply_text(item: Value) -> String {
    match item {
        Value::String(text) => text,
        Value::Object(ref map) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => item.to_string(),
        },
        other => other.to_string(),
    }
}
