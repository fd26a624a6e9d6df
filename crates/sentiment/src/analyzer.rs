//! Sentiment analysis with an optional LLM path and the heuristic fallback.

use std::sync::Arc;

use async_trait::async_trait;
use llm_client::LlmClient;
use prompt::sentiment_analysis_messages;
use reply_core::{Schema, SentimentVerdict, ServiceResult, Validation};
use service_client::SentimentSource;
use tracing::{debug, info, warn};

use crate::cache::SentimentCache;
use crate::fallback::FallbackClassifier;

/// Extracts the outermost JSON object from model output and validates it.
///
/// Model replies often wrap the object in prose or a code fence; everything before the
/// first `{` and after the last `}` is ignored.
pub fn parse_llm_verdict(output: &str) -> Validation<SentimentVerdict> {
    let (start, end) = match (output.find('{'), output.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Validation::Invalid("no JSON object in model output".to_string()),
    };
    SentimentVerdict::parse_json(&output[start..=end])
}

/// Produces a verdict for a message.
///
/// Without an LLM every message goes to the [`FallbackClassifier`]. With one, a failed
/// call falls back to the classifier and a malformed reply yields the neutral default.
/// Only validated model verdicts are cached.
pub struct SentimentAnalyzer {
    llm: Option<Arc<dyn LlmClient>>,
    fallback: FallbackClassifier,
    cache: Option<Arc<SentimentCache>>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    /// Heuristic-only analyzer.
    pub fn new() -> Self {
        Self {
            llm: None,
            fallback: FallbackClassifier::new(),
            cache: None,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_cache(mut self, cache: Arc<SentimentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackClassifier) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn cache(&self) -> Option<&Arc<SentimentCache>> {
        self.cache.as_ref()
    }

    pub async fn analyze(&self, message: &str) -> SentimentVerdict {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => {
                debug!("No LLM configured, using fallback classifier");
                return self.fallback.classify(message);
            }
        };

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(message).await {
                debug!("Sentiment cache hit");
                return hit;
            }
        }

        let output = match llm
            .get_llm_response_with_messages(sentiment_analysis_messages(message))
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Sentiment LLM call failed, using fallback classifier");
                return self.fallback.classify(message);
            }
        };

        match parse_llm_verdict(&output) {
            Validation::Valid(verdict) => {
                info!(
                    sentiment = %verdict.sentiment,
                    urgency = %verdict.urgency,
                    "Sentiment analyzed"
                );
                if let Some(cache) = &self.cache {
                    cache.put(message, verdict.clone()).await;
                }
                verdict
            }
            Validation::Invalid(reason) => {
                warn!(reason = %reason, "Malformed sentiment output, using neutral default");
                SentimentVerdict::neutral_default()
            }
        }
    }
}

#[async_trait]
impl SentimentSource for SentimentAnalyzer {
    async fn analyze(&self, message: &str) -> ServiceResult<SentimentVerdict> {
        ServiceResult::Success(SentimentAnalyzer::analyze(self, message).await)
    }
}
