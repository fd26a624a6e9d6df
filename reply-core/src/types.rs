//! Domain types: sentiment verdicts, contacts, style profiles, reply options and requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of reply options produced per generation request.
pub const REPLY_COUNT: usize = 3;

/// Overall sentiment of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Mixed => "mixed",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "mixed" => Ok(SentimentLabel::Mixed),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

/// How quickly a message needs an answer. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            other => Err(format!("unknown urgency: {}", other)),
        }
    }
}

/// A detected emotion and its weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub emotion: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(emotion: impl Into<String>, score: f64) -> Self {
        Self {
            emotion: emotion.into(),
            score,
        }
    }
}

/// Sentiment analysis result for one message.
///
/// `confidence` and every emotion score are in `[0, 1]`; values from untrusted payloads
/// are clamped by [`crate::Schema`] validation. `emotions` is sorted by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentVerdict {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub emotions: Vec<EmotionScore>,
    pub urgency: Urgency,
    pub key_points: Vec<String>,
    pub suggested_approach: String,
}

impl SentimentVerdict {
    /// Safe default used when a verdict payload cannot be parsed.
    pub fn neutral_default() -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            confidence: 0.5,
            emotions: Vec::new(),
            urgency: Urgency::Medium,
            key_points: Vec::new(),
            suggested_approach: "Respond in a clear and friendly manner.".to_string(),
        }
    }
}

/// A known contact the user talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub relationship: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub communication_style: Option<String>,
}

/// A contact referred to by a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMatch {
    pub contact: Contact,
    pub confidence: f64,
    /// The name or alias that matched.
    pub matched_on: String,
}

/// Writing style learned from the user's own messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    pub total_samples: u32,
    #[serde(default)]
    pub greetings: Vec<String>,
    #[serde(default)]
    pub signoffs: Vec<String>,
    #[serde(default)]
    pub vocabulary_level: Option<String>,
    /// Fraction of samples containing at least one emoji.
    #[serde(default)]
    pub emoji_frequency: Option<f64>,
    #[serde(default)]
    pub common_phrases: Vec<String>,
}

/// Where a learning sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnType {
    SelectedReply,
    CustomEdit,
    SentMessage,
}

impl LearnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearnType::SelectedReply => "selected_reply",
            LearnType::CustomEdit => "custom_edit",
            LearnType::SentMessage => "sent_message",
        }
    }
}

impl FromStr for LearnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "selected_reply" => Ok(LearnType::SelectedReply),
            "custom_edit" => Ok(LearnType::CustomEdit),
            "sent_message" => Ok(LearnType::SentMessage),
            other => Err(format!("unknown learn type: {}", other)),
        }
    }
}

/// Tone requested for generated replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Casual,
    Empathetic,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Empathetic => "empathetic",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friendly" => Ok(Tone::Friendly),
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "empathetic" => Ok(Tone::Empathetic),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

/// One suggested reply. `index` is its position (0..3) in the generated set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyOption {
    pub id: String,
    pub index: usize,
    pub text: String,
}

/// Body of a reply-generation request sent to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub message: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self {
            message: message.into(),
            tone,
            context: None,
            intent: None,
            conversation_id: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_camel_case() {
        let verdict = SentimentVerdict {
            sentiment: SentimentLabel::Mixed,
            confidence: 0.7,
            emotions: vec![EmotionScore::new("joy", 0.8)],
            urgency: Urgency::High,
            key_points: vec!["asks for help".to_string()],
            suggested_approach: "Be supportive".to_string(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["sentiment"], "mixed");
        assert_eq!(json["urgency"], "high");
        assert_eq!(json["keyPoints"][0], "asks for help");
        assert_eq!(json["suggestedApproach"], "Be supportive");
        assert_eq!(json["emotions"][0]["emotion"], "joy");
    }

    #[test]
    fn test_urgency_ordering() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::High > Urgency::Medium);
        assert!(Urgency::Medium > Urgency::Low);
    }

    #[test]
    fn test_learn_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&LearnType::SelectedReply).unwrap(),
            "\"selected_reply\""
        );
        assert_eq!("custom_edit".parse::<LearnType>().unwrap(), LearnType::CustomEdit);
        assert!("other".parse::<LearnType>().is_err());
    }

    #[test]
    fn test_generation_request_omits_absent_fields() {
        let request = GenerationRequest::new("hi", Tone::Casual).with_intent("decline");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tone"], "casual");
        assert_eq!(json["intent"], "decline");
        assert!(json.get("context").is_none());
        assert!(json.get("conversationId").is_none());
    }
}
