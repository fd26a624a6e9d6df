//! # Context aggregation
//!
//! Builds the enhanced context block that precedes reply generation. The
//! [`ContextAggregator`] calls the sentiment, contact and style sources concurrently and
//! merges whatever succeeded into an [`EnhancedContext`] with a fixed section order:
//! sentiment, relationship, style.
//!
//! ## Degradation
//!
//! A failed or slow source only removes its own section. Unavailable and timed-out
//! sources are logged and absorbed here; callers never see them.
//!
//! ## External Interactions
//!
//! - **service-client**: [`SentimentSource`](service_client::SentimentSource),
//!   [`ContactSource`](service_client::ContactSource), [`StyleSource`](service_client::StyleSource)
//! - **LLM prompt**: [`EnhancedContext::to_prompt_text`] is embedded in the generation prompt

mod aggregator;
mod sections;
mod types;

pub use aggregator::{ContextAggregator, MIN_STYLE_SAMPLES};
pub use sections::{format_relationship, format_sentiment, format_style, percent};
pub use types::{ContextSection, EnhancedContext, SectionKind};

#[cfg(test)]
mod aggregator_test;
