//! Schema validation for untrusted JSON payloads.
//!
//! Payloads are first deserialized into a lenient raw shape, then validated into the
//! domain type. Out-of-range scores are clamped, not rejected.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::{EmotionScore, SentimentLabel, SentimentVerdict, StyleProfile, Urgency};

/// Outcome of validating an untrusted payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(String),
}

impl<T> Validation<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(reason) => Err(reason),
        }
    }
}

/// A domain type with a raw wire shape and a validation step.
pub trait Schema: Sized {
    type Raw: DeserializeOwned;

    fn validate(raw: Self::Raw) -> Validation<Self>;

    /// Deserializes `text` into [`Schema::Raw`] and validates it.
    fn parse_json(text: &str) -> Validation<Self> {
        match serde_json::from_str::<Self::Raw>(text) {
            Ok(raw) => Self::validate(raw),
            Err(e) => Validation::Invalid(format!("invalid JSON: {}", e)),
        }
    }
}

/// Clamps a score into `[0, 1]`; NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmotion {
    #[serde(alias = "label")]
    pub emotion: Option<String>,
    #[serde(alias = "weight")]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSentimentVerdict {
    pub sentiment: Option<String>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub emotions: Vec<RawEmotion>,
    pub urgency: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub suggested_approach: Option<String>,
}

impl Schema for SentimentVerdict {
    type Raw = RawSentimentVerdict;

    fn validate(raw: RawSentimentVerdict) -> Validation<Self> {
        let sentiment = match raw.sentiment.as_deref().map(str::parse::<SentimentLabel>) {
            Some(Ok(label)) => label,
            Some(Err(reason)) => return Validation::Invalid(reason),
            None => return Validation::Invalid("missing sentiment".to_string()),
        };
        let confidence = match raw.confidence {
            Some(value) => clamp_unit(value),
            None => return Validation::Invalid("missing confidence".to_string()),
        };
        let urgency = match raw.urgency.as_deref().map(str::parse::<Urgency>) {
            Some(Ok(urgency)) => urgency,
            Some(Err(reason)) => return Validation::Invalid(reason),
            None => Urgency::default(),
        };

        let mut emotions: Vec<EmotionScore> = raw
            .emotions
            .into_iter()
            .filter_map(|e| {
                let label = e.emotion?.trim().to_ascii_lowercase();
                if label.is_empty() {
                    return None;
                }
                Some(EmotionScore::new(label, clamp_unit(e.score.unwrap_or(0.0))))
            })
            .collect();
        sort_emotions(&mut emotions);

        let key_points = raw
            .key_points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .take(3)
            .collect();

        Validation::Valid(SentimentVerdict {
            sentiment,
            confidence,
            emotions,
            urgency,
            key_points,
            suggested_approach: raw.suggested_approach.unwrap_or_default(),
        })
    }
}

impl Schema for StyleProfile {
    type Raw = StyleProfile;

    fn validate(mut raw: StyleProfile) -> Validation<Self> {
        raw.emoji_frequency = raw.emoji_frequency.map(clamp_unit);
        raw.greetings.retain(|g| !g.trim().is_empty());
        raw.signoffs.retain(|s| !s.trim().is_empty());
        raw.common_phrases.retain(|p| !p.trim().is_empty());
        raw.vocabulary_level = raw.vocabulary_level.filter(|v| !v.trim().is_empty());
        Validation::Valid(raw)
    }
}

/// Sorts by descending score; ties keep label order so output is deterministic.
pub fn sort_emotions(emotions: &mut [EmotionScore]) {
    emotions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.emotion.cmp(&b.emotion))
    });
}
