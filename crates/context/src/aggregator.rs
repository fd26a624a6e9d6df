//! Concurrent enrichment calls merged into an [`EnhancedContext`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reply_core::ServiceResult;
use service_client::{ContactSource, SentimentSource, StyleSource, DEFAULT_TIMEOUT};
use tracing::{debug, info, instrument, warn};

use crate::sections::{format_relationship, format_sentiment, format_style};
use crate::types::{ContextSection, EnhancedContext, SectionKind};

/// Minimum learned samples before the style section is included.
pub const MIN_STYLE_SAMPLES: u32 = 3;

/// Aggregates sentiment, relationship and style enrichment for a message.
///
/// Sources are injected once at startup and shared by reference. Each call is bounded by
/// its own `call_timeout`, so one slow dependency cannot starve the others; the three calls
/// run concurrently and the aggregator waits for all of them.
///
/// Aggregation is not tied to a generation's cancellation signal: once dispatched, the
/// calls run until they finish or hit their timeout.
pub struct ContextAggregator {
    sentiment: Arc<dyn SentimentSource>,
    contacts: Arc<dyn ContactSource>,
    style: Arc<dyn StyleSource>,
    pub(crate) call_timeout: Duration,
    pub(crate) min_style_samples: u32,
}

impl ContextAggregator {
    pub fn new(
        sentiment: Arc<dyn SentimentSource>,
        contacts: Arc<dyn ContactSource>,
        style: Arc<dyn StyleSource>,
    ) -> Self {
        Self {
            sentiment,
            contacts,
            style,
            call_timeout: DEFAULT_TIMEOUT,
            min_style_samples: MIN_STYLE_SAMPLES,
        }
    }

    /// Per-source deadline enforced on top of whatever the source itself does.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_min_style_samples(mut self, samples: u32) -> Self {
        self.min_style_samples = samples;
        self
    }

    /// Builds the enhanced context for `message`. Never fails; absent sources are omitted.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn build(&self, message: &str) -> EnhancedContext {
        let (sentiment, contact, style) = tokio::join!(
            bounded("sentiment", self.call_timeout, self.sentiment.analyze(message)),
            bounded("contacts", self.call_timeout, self.contacts.match_contact(message)),
            bounded("style", self.call_timeout, self.style.profile()),
        );

        let mut sections = Vec::with_capacity(3);

        if let Some(verdict) = sentiment.success() {
            sections.push(ContextSection::new(
                SectionKind::Sentiment,
                format_sentiment(&verdict),
            ));
        }

        match contact.success() {
            Some(Some(matched)) => sections.push(ContextSection::new(
                SectionKind::Relationship,
                format_relationship(&matched),
            )),
            Some(None) => debug!("No contact matched; relationship section omitted"),
            None => {}
        }

        if let Some(profile) = style.success() {
            if profile.total_samples >= self.min_style_samples {
                sections.push(ContextSection::new(SectionKind::Style, format_style(&profile)));
            } else {
                debug!(
                    total_samples = profile.total_samples,
                    required = self.min_style_samples,
                    "Not enough style samples; style section omitted"
                );
            }
        }

        let context = EnhancedContext::from_sections(sections);
        info!(
            section_count = context.sections().len(),
            sections = ?context.kinds(),
            "Enhanced context built"
        );
        context
    }
}

/// Runs one source call under `limit`; expiry yields `Timeout` and drops the call.
async fn bounded<T, F>(source: &'static str, limit: Duration, call: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => {
            debug!(source, outcome = result.outcome(), "Enrichment source finished");
            result
        }
        Err(_) => {
            warn!(source, timeout_ms = limit.as_millis() as u64, "Enrichment source timed out");
            ServiceResult::Timeout
        }
    }
}
