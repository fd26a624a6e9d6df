//! Heuristic sentiment classifier used when the model path is unavailable.

use std::collections::HashMap;

use regex::Regex;
use reply_core::validation::sort_emotions;
use reply_core::{EmotionScore, SentimentLabel, SentimentVerdict, Urgency};

use crate::patterns::{
    default_patterns, EmotionPattern, CRITICAL_PATTERN, NEGATIVE_EMOTIONS, POSITIVE_EMOTIONS,
    URGENT_PATTERN,
};

/// Confidence reported by every heuristic verdict. Not comparable to model confidence.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Approach text reported by every heuristic verdict.
pub const FALLBACK_APPROACH: &str = "Respond thoughtfully and match the sender's tone.";

const MAX_EMOTIONS: usize = 3;

/// Pattern-weighted emotion, sentiment and urgency inference.
pub struct FallbackClassifier {
    patterns: Vec<EmotionPattern>,
    urgent: Regex,
    critical: Regex,
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackClassifier {
    pub fn new() -> Self {
        Self::with_patterns(default_patterns())
    }

    /// Classifier over a custom pattern table; urgency keywords stay built in.
    pub fn with_patterns(patterns: Vec<EmotionPattern>) -> Self {
        Self {
            patterns,
            urgent: Regex::new(URGENT_PATTERN).expect("Invalid urgency regex"),
            critical: Regex::new(CRITICAL_PATTERN).expect("Invalid critical regex"),
        }
    }

    pub fn classify(&self, message: &str) -> SentimentVerdict {
        let emotions = self.detect_emotions(message);
        SentimentVerdict {
            sentiment: overall_sentiment(&emotions),
            confidence: FALLBACK_CONFIDENCE,
            emotions,
            urgency: self.urgency(message),
            key_points: Vec::new(),
            suggested_approach: FALLBACK_APPROACH.to_string(),
        }
    }

    /// Top emotions by descending weight. A label keeps the highest weight of any
    /// pattern that matched it, whatever the table order.
    pub fn detect_emotions(&self, message: &str) -> Vec<EmotionScore> {
        let mut best: HashMap<&'static str, f64> = HashMap::new();
        for pattern in &self.patterns {
            if pattern.regex.is_match(message) {
                let entry = best.entry(pattern.emotion).or_insert(pattern.weight);
                if pattern.weight > *entry {
                    *entry = pattern.weight;
                }
            }
        }
        let mut emotions: Vec<EmotionScore> = best
            .into_iter()
            .map(|(emotion, weight)| EmotionScore::new(emotion, weight.clamp(0.0, 1.0)))
            .collect();
        sort_emotions(&mut emotions);
        emotions.truncate(MAX_EMOTIONS);
        emotions
    }

    /// Medium by default, high on an urgency keyword, critical on "emergency"/"critical".
    pub fn urgency(&self, message: &str) -> Urgency {
        let mut urgency = Urgency::Medium;
        if self.urgent.is_match(message) {
            urgency = Urgency::High;
        }
        if self.critical.is_match(message) {
            urgency = Urgency::Critical;
        }
        urgency
    }
}

fn overall_sentiment(emotions: &[EmotionScore]) -> SentimentLabel {
    let has_negative = emotions
        .iter()
        .any(|e| NEGATIVE_EMOTIONS.contains(&e.emotion.as_str()));
    let has_positive = emotions
        .iter()
        .any(|e| POSITIVE_EMOTIONS.contains(&e.emotion.as_str()));
    match (has_negative, has_positive) {
        (true, true) => SentimentLabel::Mixed,
        (true, false) => SentimentLabel::Negative,
        (false, true) => SentimentLabel::Positive,
        (false, false) => SentimentLabel::Neutral,
    }
}
