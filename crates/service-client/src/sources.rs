//! Enrichment source traits.
//!
//! The aggregator depends only on these; HTTP clients implement them in production and
//! tests substitute in-process fakes.

use async_trait::async_trait;
use reply_core::{ContactMatch, LearnType, SentimentVerdict, ServiceResult, StyleProfile};

/// Sentiment analysis of one message.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn analyze(&self, message: &str) -> ServiceResult<SentimentVerdict>;
}

/// Resolves which known contact a message refers to; `Success(None)` means no match.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn match_contact(&self, message: &str) -> ServiceResult<Option<ContactMatch>>;
}

/// Learned writing style of the user.
#[async_trait]
pub trait StyleSource: Send + Sync {
    async fn profile(&self) -> ServiceResult<StyleProfile>;

    /// Submits a learning sample; `Success(false)` means the service rejected it.
    async fn learn(&self, content: &str, kind: LearnType) -> ServiceResult<bool>;
}
