//! In-memory verdict cache keyed by a hash of the normalized message.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use reply_core::SentimentVerdict;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct CacheEntry {
    verdict: SentimentVerdict,
    stored_at: DateTime<Utc>,
}

/// Trims, lowercases and collapses inner whitespace.
pub fn normalize_message(message: &str) -> String {
    message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hex SHA-256 of the normalized message.
pub fn cache_key(message: &str) -> String {
    let digest = Sha256::digest(normalize_message(message).as_bytes());
    hex::encode(digest)
}

/// Verdict cache with time-based expiry. Expired entries are invisible to `get` and
/// removed by `purge_expired`.
pub struct SentimentCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for SentimentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, message: &str) -> Option<SentimentVerdict> {
        self.get_at(message, Utc::now()).await
    }

    pub async fn get_at(&self, message: &str, now: DateTime<Utc>) -> Option<SentimentVerdict> {
        let key = cache_key(message);
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if now - entry.stored_at >= self.ttl {
            debug!(key = %key, "Cache entry expired");
            return None;
        }
        Some(entry.verdict.clone())
    }

    pub async fn put(&self, message: &str, verdict: SentimentVerdict) {
        self.put_at(message, verdict, Utc::now()).await
    }

    pub async fn put_at(&self, message: &str, verdict: SentimentVerdict, now: DateTime<Utc>) {
        let key = cache_key(message);
        self.entries.write().await.insert(
            key,
            CacheEntry {
                verdict,
                stored_at: now,
            },
        );
    }

    /// Removes expired entries and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now - entry.stored_at < self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Purged expired sentiment cache entries");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reply_core::SentimentLabel;

    fn verdict(label: SentimentLabel) -> SentimentVerdict {
        SentimentVerdict {
            sentiment: label,
            ..SentimentVerdict::neutral_default()
        }
    }

    #[test]
    fn test_normalize_message() {
        assert_eq!(normalize_message("  Hello\t  WORLD \n"), "hello world");
        assert_eq!(normalize_message(""), "");
    }

    #[test]
    fn test_cache_key_ignores_case_and_spacing() {
        assert_eq!(cache_key("Thanks  a lot"), cache_key(" thanks a LOT "));
        assert_ne!(cache_key("thanks"), cache_key("thank"));
        assert_eq!(cache_key("x").len(), 64);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = SentimentCache::new();
        assert!(cache.get("hi").await.is_none());
        cache.put("Hi", verdict(SentimentLabel::Positive)).await;
        let hit = cache.get("  hi ").await.unwrap();
        assert_eq!(hit.sentiment, SentimentLabel::Positive);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = SentimentCache::with_ttl(Duration::hours(1));
        let t0 = Utc::now();
        cache.put_at("msg", verdict(SentimentLabel::Negative), t0).await;
        assert!(cache.get_at("msg", t0 + Duration::minutes(59)).await.is_some());
        assert!(cache.get_at("msg", t0 + Duration::hours(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = SentimentCache::with_ttl(Duration::hours(24));
        let t0 = Utc::now();
        cache.put_at("old", verdict(SentimentLabel::Neutral), t0).await;
        cache
            .put_at("new", verdict(SentimentLabel::Neutral), t0 + Duration::hours(20))
            .await;
        assert_eq!(cache.purge_expired_at(t0 + Duration::hours(25)).await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get_at("new", t0 + Duration::hours(25)).await.is_some());
    }
}
