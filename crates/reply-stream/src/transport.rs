//! Opening a generation stream.

use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reply_core::{GenerationRequest, ReplyError, Result};
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Response header carrying the conversation identity.
pub const CONVERSATION_ID_HEADER: &str = "X-Conversation-Id";

pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// An opened generation: conversation identity plus the `data: ` event body.
pub struct GenerationStream {
    pub conversation_id: Option<String>,
    pub body: ByteStream,
}

impl std::fmt::Debug for GenerationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStream")
            .field("conversation_id", &self.conversation_id)
            .finish_non_exhaustive()
    }
}

/// Starts a generation. Dropping the returned body stops it.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn open(&self, request: &GenerationRequest) -> Result<GenerationStream>;
}

/// Relay client: `POST {base_url}/api/generate`.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    http: Client,
    base_url: String,
}

impl HttpGenerationClient {
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GenerationTransport for HttpGenerationClient {
    #[instrument(skip(self, request), fields(tone = %request.tone))]
    async fn open(&self, request: &GenerationRequest) -> Result<GenerationStream> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ReplyError::Unavailable(format!("relay request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Relay rejected generation request");
            return Err(ReplyError::Unavailable(format!("relay returned {}: {}", status, body)));
        }

        let conversation_id = response
            .headers()
            .get(CONVERSATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        debug!(conversation_id = ?conversation_id, "Generation stream opened");

        let body = response.bytes_stream().map_err(io::Error::other);
        Ok(GenerationStream {
            conversation_id,
            body: Box::pin(body),
        })
    }
}
