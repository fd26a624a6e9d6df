//! Profile derivation from raw samples.

use std::collections::HashMap;

use reply_core::StyleProfile;

/// Bigrams must appear at least this many times to count as a common phrase.
pub const MIN_PHRASE_COUNT: usize = 2;

const MAX_GREETINGS: usize = 3;
const MAX_SIGNOFFS: usize = 3;
const MAX_PHRASES: usize = 5;

// Longer entries first so "hi there" wins over "hi".
const GREETINGS: &[&str] = &[
    "good morning",
    "good afternoon",
    "good evening",
    "hey there",
    "hi there",
    "hello",
    "hey",
    "hiya",
    "hi",
    "dear",
    "greetings",
    "howdy",
    "yo",
];

const SIGNOFFS: &[&str] = &[
    "best regards",
    "kind regards",
    "warm regards",
    "regards",
    "best wishes",
    "best",
    "cheers",
    "thank you",
    "thanks",
    "talk soon",
    "take care",
    "sincerely",
    "ttyl",
    "later",
    "xoxo",
];

pub fn build_profile<S: AsRef<str>>(samples: &[S]) -> StyleProfile {
    if samples.is_empty() {
        return StyleProfile::default();
    }

    let mut greetings = Vec::new();
    let mut signoffs = Vec::new();
    let mut emoji_samples = 0usize;
    let mut bigrams: Vec<String> = Vec::new();

    for sample in samples {
        let sample = sample.as_ref();
        let lines: Vec<&str> = sample
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if let Some(first) = lines.first() {
            if let Some(greeting) = leading_phrase(first, GREETINGS) {
                greetings.push(greeting.to_string());
            }
        }
        if let Some(last) = lines.last() {
            if let Some(signoff) = leading_phrase(last, SIGNOFFS) {
                signoffs.push(signoff.to_string());
            }
        }
        if contains_emoji(sample) {
            emoji_samples += 1;
        }
        let words = words(sample);
        bigrams.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    }

    let emoji_frequency = match emoji_samples {
        0 => None,
        n => Some(n as f64 / samples.len() as f64),
    };
    let all_text: Vec<&str> = samples.iter().map(AsRef::as_ref).collect();

    StyleProfile {
        total_samples: samples.len() as u32,
        greetings: top_by_frequency(greetings, 1, MAX_GREETINGS),
        signoffs: top_by_frequency(signoffs, 1, MAX_SIGNOFFS),
        vocabulary_level: average_word_length(&all_text.join(" "))
            .map(|avg| vocabulary_level(avg).to_string()),
        emoji_frequency,
        common_phrases: top_by_frequency(bigrams, MIN_PHRASE_COUNT, MAX_PHRASES),
    }
}

/// Returns the entry of `phrases` the line starts with, ending on a word boundary.
fn leading_phrase(line: &str, phrases: &[&'static str]) -> Option<&'static str> {
    let lower = line.to_lowercase();
    phrases.iter().copied().find(|phrase| {
        lower.starts_with(phrase)
            && lower[phrase.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Mean characters per word, punctuation excluded. `None` for text without words.
pub fn average_word_length(text: &str) -> Option<f64> {
    let words = words(text);
    if words.is_empty() {
        return None;
    }
    let total: usize = words.iter().map(|w| w.chars().count()).sum();
    Some(total as f64 / words.len() as f64)
}

pub fn vocabulary_level(average_word_length: f64) -> &'static str {
    if average_word_length < 4.5 {
        "casual"
    } else if average_word_length < 5.5 {
        "conversational"
    } else {
        "formal"
    }
}

pub fn contains_emoji(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32, 0x1F000..=0x1FAFF | 0x2600..=0x27BF)
    })
}

/// Items seen at least `min_count` times, most frequent first, ties alphabetical.
fn top_by_frequency(items: Vec<String>, min_count: usize, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(item, _)| item).collect()
}
