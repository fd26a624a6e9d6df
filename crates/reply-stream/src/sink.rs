//! Persistence of the final reply set.

use async_trait::async_trait;
use reply_core::{ReplyError, ReplyOption, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn save(&self, conversation_id: &str, replies: &[ReplyOption]) -> Result<()>;
}

#[derive(Serialize)]
struct SaveRepliesBody<'a> {
    replies: &'a [ReplyOption],
}

/// `POST {base_url}/api/conversations/{id}/replies`.
#[derive(Debug, Clone)]
pub struct HttpReplySink {
    http: Client,
    base_url: String,
}

impl HttpReplySink {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// The id is pushed as a single escaped path segment; it comes from a response header.
    fn replies_url(&self, conversation_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ReplyError::Config(format!("invalid relay URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ReplyError::Config(format!("relay URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "conversations", conversation_id, "replies"]);
        Ok(url)
    }
}

#[async_trait]
impl ReplySink for HttpReplySink {
    async fn save(&self, conversation_id: &str, replies: &[ReplyOption]) -> Result<()> {
        let url = self.replies_url(conversation_id)?;
        let response = self
            .http
            .post(url)
            .json(&SaveRepliesBody { replies })
            .send()
            .await
            .map_err(|e| ReplyError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ReplyError::Unavailable(format!(
                "save replies returned {}",
                response.status()
            )));
        }
        debug!(conversation_id, count = replies.len(), "Replies saved");
        Ok(())
    }
}
