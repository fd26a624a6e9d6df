//! Section formatting for the enhanced context.

use reply_core::{clamp_unit, ContactMatch, EmotionScore, SentimentVerdict, StyleProfile};

/// Maximum emotions listed in the sentiment section.
const MAX_EMOTIONS: usize = 3;
/// Maximum key points listed in the sentiment section.
const MAX_KEY_POINTS: usize = 3;

/// Absorbs binary representation error so that decimal halves like 0.285 round up.
const HALF_UP_EPSILON: f64 = 1e-9;

/// Whole percentage, rounding half up. Input is clamped to `[0, 1]` first.
pub fn percent(value: f64) -> u32 {
    (clamp_unit(value) * 100.0 + 0.5 + HALF_UP_EPSILON).floor() as u32
}

/// Sentiment block. The emotions, key-points and approach lines are omitted when empty.
pub fn format_sentiment(verdict: &SentimentVerdict) -> String {
    let mut lines = vec![
        format!(
            "Message sentiment: {} ({}% confidence)",
            verdict.sentiment,
            percent(verdict.confidence)
        ),
    ];

    let mut emotions: Vec<&EmotionScore> = verdict.emotions.iter().collect();
    emotions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if !emotions.is_empty() {
        let listed: Vec<String> = emotions
            .iter()
            .take(MAX_EMOTIONS)
            .map(|e| format!("{} ({}%)", e.emotion, percent(e.score)))
            .collect();
        lines.push(format!("Emotions detected: {}", listed.join(", ")));
    }

    lines.push(format!("Urgency: {}", verdict.urgency));

    if !verdict.key_points.is_empty() {
        let points: Vec<&str> = verdict
            .key_points
            .iter()
            .take(MAX_KEY_POINTS)
            .map(String::as_str)
            .collect();
        lines.push(format!("Key points: {}", points.join("; ")));
    }

    let approach = verdict.suggested_approach.trim();
    if !approach.is_empty() {
        lines.push(format!("Suggested approach: {}", approach));
    }

    lines.join("\n")
}

/// Relationship block for a matched contact.
pub fn format_relationship(matched: &ContactMatch) -> String {
    let contact = &matched.contact;
    let mut lines = vec![format!(
        "Relationship context: The sender appears to be {} ({}).",
        contact.name, contact.relationship
    )];
    if let Some(notes) = contact.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(format!("Notes: {}", notes.trim()));
    }
    if let Some(style) = contact
        .communication_style
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        lines.push(format!("Usual communication style: {}", style.trim()));
    }
    lines.join("\n")
}

/// Style block. Sub-lines keep the order greetings, sign-offs, vocabulary, emoji, phrases,
/// and each is present only when it has content.
pub fn format_style(profile: &StyleProfile) -> String {
    let mut lines = vec![format!(
        "User's writing style (learned from {} samples):",
        profile.total_samples
    )];
    if !profile.greetings.is_empty() {
        lines.push(format!("- Typical greetings: {}", profile.greetings.join(", ")));
    }
    if !profile.signoffs.is_empty() {
        lines.push(format!("- Typical sign-offs: {}", profile.signoffs.join(", ")));
    }
    if let Some(level) = profile
        .vocabulary_level
        .as_deref()
        .filter(|v| !v.trim().is_empty())
    {
        lines.push(format!("- Vocabulary: {}", level.trim()));
    }
    if let Some(frequency) = profile.emoji_frequency.filter(|f| *f > 0.0) {
        lines.push(format!("- Emoji usage: {}% of messages", percent(frequency)));
    }
    if !profile.common_phrases.is_empty() {
        let quoted: Vec<String> = profile
            .common_phrases
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect();
        lines.push(format!("- Common phrases: {}", quoted.join(", ")));
    }
    lines.join("\n")
}
