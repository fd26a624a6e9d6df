//! Unit tests for ContextAggregator and section formatting.
//!
//! Sources are in-process fakes with configurable delays; time is paused so delays and
//! timeouts run on the virtual clock.

use super::*;
use async_trait::async_trait;
use reply_core::{
    Contact, ContactMatch, EmotionScore, LearnType, SentimentLabel, SentimentVerdict,
    ServiceResult, StyleProfile, Urgency,
};
use service_client::{ContactSource, SentimentSource, StyleSource};
use std::sync::Arc;
use std::time::Duration;

struct FakeSentiment {
    delay: Duration,
    result: ServiceResult<SentimentVerdict>,
}

#[async_trait]
impl SentimentSource for FakeSentiment {
    async fn analyze(&self, _message: &str) -> ServiceResult<SentimentVerdict> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

struct FakeContacts {
    delay: Duration,
    result: ServiceResult<Option<ContactMatch>>,
}

#[async_trait]
impl ContactSource for FakeContacts {
    async fn match_contact(&self, _message: &str) -> ServiceResult<Option<ContactMatch>> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

struct FakeStyle {
    delay: Duration,
    result: ServiceResult<StyleProfile>,
}

#[async_trait]
impl StyleSource for FakeStyle {
    async fn profile(&self) -> ServiceResult<StyleProfile> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }

    async fn learn(&self, _content: &str, _kind: LearnType) -> ServiceResult<bool> {
        ServiceResult::Success(true)
    }
}

fn verdict() -> SentimentVerdict {
    SentimentVerdict {
        sentiment: SentimentLabel::Negative,
        confidence: 0.125,
        emotions: vec![
            EmotionScore::new("sadness", 0.4),
            EmotionScore::new("anger", 0.9),
            EmotionScore::new("anxiety", 0.7),
            EmotionScore::new("confusion", 0.1),
        ],
        urgency: Urgency::High,
        key_points: Vec::new(),
        suggested_approach: "Acknowledge the problem".to_string(),
    }
}

fn contact_match() -> ContactMatch {
    ContactMatch {
        contact: Contact {
            id: "c1".to_string(),
            name: "Sam".to_string(),
            relationship: "coworker".to_string(),
            aliases: Vec::new(),
            notes: Some("Prefers short answers".to_string()),
            communication_style: None,
        },
        confidence: 1.0,
        matched_on: "Sam".to_string(),
    }
}

fn profile(total_samples: u32) -> StyleProfile {
    StyleProfile {
        total_samples,
        greetings: vec!["Hey".to_string()],
        signoffs: Vec::new(),
        vocabulary_level: Some("casual".to_string()),
        emoji_frequency: Some(0.25),
        common_phrases: vec!["sounds good".to_string()],
    }
}

fn aggregator(
    sentiment: (Duration, ServiceResult<SentimentVerdict>),
    contacts: (Duration, ServiceResult<Option<ContactMatch>>),
    style: (Duration, ServiceResult<StyleProfile>),
) -> ContextAggregator {
    ContextAggregator::new(
        Arc::new(FakeSentiment {
            delay: sentiment.0,
            result: sentiment.1,
        }),
        Arc::new(FakeContacts {
            delay: contacts.0,
            result: contacts.1,
        }),
        Arc::new(FakeStyle {
            delay: style.0,
            result: style.1,
        }),
    )
}

const FAST: Duration = Duration::from_millis(10);

#[tokio::test(start_paused = true)]
async fn test_section_order_independent_of_arrival() {
    let aggregator = aggregator(
        (Duration::from_millis(900), ServiceResult::Success(verdict())),
        (Duration::from_millis(500), ServiceResult::Success(Some(contact_match()))),
        (FAST, ServiceResult::Success(profile(5))),
    );

    let context = aggregator.build("hello").await;

    assert_eq!(
        context.kinds(),
        vec![SectionKind::Sentiment, SectionKind::Relationship, SectionKind::Style]
    );
    let text = context.to_prompt_text();
    let sentiment_at = text.find("Message sentiment").unwrap();
    let relationship_at = text.find("Relationship context").unwrap();
    let style_at = text.find("User's writing style").unwrap();
    assert!(sentiment_at < relationship_at && relationship_at < style_at);
    assert!(text.contains("\n\nRelationship context"));
}

#[tokio::test(start_paused = true)]
async fn test_calls_run_concurrently() {
    let second = Duration::from_secs(1);
    let aggregator = aggregator(
        (second, ServiceResult::Success(verdict())),
        (second, ServiceResult::Success(None)),
        (second, ServiceResult::Success(profile(3))),
    );

    let started = tokio::time::Instant::now();
    let context = aggregator.build("hello").await;

    assert!(started.elapsed() < Duration::from_millis(1500));
    assert_eq!(context.kinds(), vec![SectionKind::Sentiment, SectionKind::Style]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_source_only_removes_its_section() {
    let aggregator = aggregator(
        (Duration::from_secs(30), ServiceResult::Success(verdict())),
        (FAST, ServiceResult::Success(Some(contact_match()))),
        (FAST, ServiceResult::Success(profile(4))),
    );

    let started = tokio::time::Instant::now();
    let context = aggregator.build("hello").await;

    assert!(started.elapsed() <= Duration::from_millis(3100));
    assert_eq!(
        context.kinds(),
        vec![SectionKind::Relationship, SectionKind::Style]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_and_timeout_are_absorbed() {
    let aggregator = aggregator(
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Timeout),
        (FAST, ServiceResult::Unavailable),
    );

    let context = aggregator.build("hello").await;

    assert!(context.is_empty());
    assert_eq!(context.to_prompt_text(), "");
}

#[tokio::test(start_paused = true)]
async fn test_style_threshold_boundary() {
    let below = aggregator(
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Success(profile(2))),
    );
    assert!(!below.build("hello").await.has(SectionKind::Style));

    let at = aggregator(
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Success(profile(3))),
    );
    assert!(at.build("hello").await.has(SectionKind::Style));
}

#[tokio::test(start_paused = true)]
async fn test_null_contact_match_omits_relationship() {
    let aggregator = aggregator(
        (FAST, ServiceResult::Unavailable),
        (FAST, ServiceResult::Success(None)),
        (FAST, ServiceResult::Unavailable),
    );
    assert!(aggregator.build("hello").await.is_empty());
}

#[test]
fn test_sentiment_section_format() {
    let text = format_sentiment(&verdict());
    assert_eq!(
        text,
        "Message sentiment: negative (13% confidence)\n\
         Emotions detected: anger (90%), anxiety (70%), sadness (40%)\n\
         Urgency: high\n\
         Suggested approach: Acknowledge the problem"
    );
}

#[test]
fn test_sentiment_section_lists_key_points() {
    let mut v = verdict();
    v.key_points = vec!["late delivery".to_string(), "wants refund".to_string()];
    let text = format_sentiment(&v);
    assert!(text.contains("Key points: late delivery; wants refund"));
}

#[test]
fn test_style_section_skips_empty_sublines() {
    let text = format_style(&profile(5));
    assert_eq!(
        text,
        "User's writing style (learned from 5 samples):\n\
         - Typical greetings: Hey\n\
         - Vocabulary: casual\n\
         - Emoji usage: 25% of messages\n\
         - Common phrases: \"sounds good\""
    );
}

#[test]
fn test_relationship_section_format() {
    let text = format_relationship(&contact_match());
    assert_eq!(
        text,
        "Relationship context: The sender appears to be Sam (coworker).\nNotes: Prefers short answers"
    );
}

#[test]
fn test_percent_rounds_half_up_and_clamps() {
    assert_eq!(percent(0.125), 13);
    assert_eq!(percent(0.285), 29);
    assert_eq!(percent(0.575), 58);
    assert_eq!(percent(0.2849), 28);
    assert_eq!(percent(0.005), 1);
    assert_eq!(percent(1.0), 100);
    assert_eq!(percent(0.5), 50);
    assert_eq!(percent(1.3), 100);
    assert_eq!(percent(-0.2), 0);
}

#[test]
fn test_from_sections_orders_and_dedups() {
    let context = EnhancedContext::from_sections(vec![
        ContextSection::new(SectionKind::Style, "style".to_string()),
        ContextSection::new(SectionKind::Sentiment, "sentiment".to_string()),
        ContextSection::new(SectionKind::Style, "style again".to_string()),
    ]);
    assert_eq!(context.to_prompt_text(), "sentiment\n\nstyle");
}
