//! # Prompt
//!
//! Builds the chat messages sent to the model for the two LLM tasks of smart-reply.
//!
//! ## Reply generation
//!
//! - **System**: reply-assistant instructions; the model must answer with a JSON array of
//!   exactly three reply strings
//! - **User**: optional enhanced context block, optional intent, requested tone, then the
//!   message being replied to
//!
//! ## Sentiment analysis
//!
//! - **System**: analyst instructions describing the JSON verdict shape
//! - **User**: the message to analyze
//!
//! ## External interactions
//!
//! - **AI models**: output is sent to OpenAI-compatible chat completion APIs.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single chat message, one element of the OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// System instruction for reply generation.
pub const REPLY_SYSTEM_MESSAGE: &str = "You are a smart-reply assistant. \
Suggest exactly 3 short, natural replies the user could send in response to the message. \
Each reply must be distinct and ready to send as-is. \
Respond ONLY with a JSON array of 3 strings, for example: [\"reply one\", \"reply two\", \"reply three\"].";

/// System instruction for sentiment analysis.
pub const SENTIMENT_SYSTEM_MESSAGE: &str = "You analyze the sentiment of chat messages. \
Respond ONLY with a JSON object of the form \
{\"sentiment\": \"positive|negative|neutral|mixed\", \"confidence\": 0.0-1.0, \
\"emotions\": [{\"emotion\": \"label\", \"score\": 0.0-1.0}], \
\"urgency\": \"low|medium|high|critical\", \"keyPoints\": [\"at most 3 short points\"], \
\"suggestedApproach\": \"one sentence on how to reply\"}.";

/// Section title for the enhanced context block.
pub const SECTION_CONTEXT: &str = "Context about this conversation:";

/// Section title for the message being replied to.
pub const SECTION_MESSAGE: &str = "Message to reply to:";

/// Builds the user prompt body for reply generation.
///
/// Order: context block (when non-blank), intent (when non-blank), tone, message.
pub fn format_reply_prompt(
    message: &str,
    tone: &str,
    context: Option<&str>,
    intent: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        out.push_str(SECTION_CONTEXT);
        out.push('\n');
        out.push_str(context);
        out.push_str("\n\n");
    }
    if let Some(intent) = intent.map(str::trim).filter(|i| !i.is_empty()) {
        out.push_str("The user wants to: ");
        out.push_str(intent);
        out.push_str("\n\n");
    }
    out.push_str("Tone: ");
    out.push_str(tone);
    out.push_str("\n\n");
    out.push_str(SECTION_MESSAGE);
    out.push('\n');
    out.push_str(message);
    out
}

/// Messages for reply generation: system instructions, then one user message.
pub fn reply_generation_messages(
    message: &str,
    tone: &str,
    context: Option<&str>,
    intent: Option<&str>,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(REPLY_SYSTEM_MESSAGE),
        ChatMessage::user(format_reply_prompt(message, tone, context, intent)),
    ]
}

/// Messages for sentiment analysis of `message`.
pub fn sentiment_analysis_messages(message: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SENTIMENT_SYSTEM_MESSAGE),
        ChatMessage::user(format!("Analyze this message:\n{}", message)),
    ]
}
