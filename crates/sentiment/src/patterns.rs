//! Weighted emotion patterns and urgency keywords for the fallback classifier.

use regex::Regex;

/// Emotions that count toward a negative verdict.
pub const NEGATIVE_EMOTIONS: &[&str] = &[
    "anger",
    "frustration",
    "sadness",
    "anxiety",
    "fear",
    "disappointment",
];

/// Emotions that count toward a positive verdict. Disjoint from [`NEGATIVE_EMOTIONS`].
pub const POSITIVE_EMOTIONS: &[&str] = &["joy", "gratitude", "excitement", "love", "relief", "pride"];

/// A compiled pattern linked to an emotion label and weight.
#[derive(Debug, Clone)]
pub struct EmotionPattern {
    pub regex: Regex,
    pub emotion: &'static str,
    pub weight: f64,
}

impl EmotionPattern {
    /// Compiles `pattern` case-insensitively. Panics on an invalid pattern.
    pub fn new(pattern: &str, emotion: &'static str, weight: f64) -> Self {
        Self {
            regex: Regex::new(&format!("(?i){}", pattern)).expect("Invalid emotion regex"),
            emotion,
            weight,
        }
    }
}

/// The built-in pattern table.
pub(crate) fn default_patterns() -> Vec<EmotionPattern> {
    let table: &[(&str, &'static str, f64)] = &[
        // Positive
        (r"\b(thanks|thank you|thx|appreciate)\b", "gratitude", 0.8),
        (r"\bgrateful\b", "gratitude", 0.9),
        (r"\b(happy|glad|delighted)\b", "joy", 0.7),
        (r"\b(great|awesome|amazing|wonderful|fantastic)\b", "joy", 0.6),
        (r"\b(excited|thrilled|can't wait|cannot wait)\b", "excitement", 0.8),
        (r"\blove\b", "love", 0.8),
        (r"\b(miss you|adore)\b", "love", 0.7),
        (r"\b(relieved|phew)\b", "relief", 0.7),
        (r"\bproud\b", "pride", 0.7),
        // Negative
        (r"\b(angry|furious|outraged)\b", "anger", 0.9),
        (r"\b(hate|ridiculous|unacceptable)\b", "anger", 0.7),
        (r"\b(frustrated|frustrating|annoyed|annoying|fed up)\b", "frustration", 0.8),
        (r"\b(sad|upset|heartbroken|depressed)\b", "sadness", 0.8),
        (r"\bsorry to hear\b", "sadness", 0.5),
        (r"\b(worried|anxious|nervous|stressed)\b", "anxiety", 0.8),
        (r"\b(scared|afraid|terrified)\b", "fear", 0.8),
        (r"\b(disappointed|disappointing|let down)\b", "disappointment", 0.8),
        // Neither
        (r"\b(confused|don't understand|unclear)\b", "confusion", 0.6),
        (r"\b(wow|surprised|unexpected)\b", "surprise", 0.6),
        (r"\?", "curiosity", 0.3),
    ];
    table
        .iter()
        .map(|(pattern, emotion, weight)| EmotionPattern::new(pattern, emotion, *weight))
        .collect()
}

/// Generic urgency keywords (escalate to high).
pub(crate) const URGENT_PATTERN: &str =
    r"(?i)\b(urgent|urgently|asap|immediately|right away|right now|as soon as possible|hurry|deadline)\b";

/// Critical keywords (escalate to critical).
pub(crate) const CRITICAL_PATTERN: &str = r"(?i)\b(emergency|critical)\b";
