//! # Sentiment analysis
//!
//! Produces a [`SentimentVerdict`](reply_core::SentimentVerdict) for a chat message.
//!
//! - [`FallbackClassifier`]: weighted regex patterns for emotions plus urgency keywords;
//!   used when no LLM is configured or the LLM call fails
//! - [`SentimentAnalyzer`]: LLM path with schema validation, fallback, optional cache
//! - [`SentimentCache`]: verdicts keyed by a hash of the normalized message, with TTL expiry
//!
//! The analyzer also implements [`SentimentSource`](service_client::SentimentSource) so it
//! can stand in for the remote sentiment service inside one process.

mod analyzer;
mod cache;
mod fallback;
mod patterns;

pub use analyzer::{parse_llm_verdict, SentimentAnalyzer};
pub use cache::{cache_key, normalize_message, SentimentCache, DEFAULT_TTL_HOURS};
pub use fallback::{FallbackClassifier, FALLBACK_APPROACH, FALLBACK_CONFIDENCE};
pub use patterns::{EmotionPattern, NEGATIVE_EMOTIONS, POSITIVE_EMOTIONS};
