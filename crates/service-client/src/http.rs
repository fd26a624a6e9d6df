//! HTTP implementations of the enrichment sources.
//!
//! Endpoints:
//! - `POST {sentiment}/api/analyze {message}` → sentiment verdict
//! - `POST {contacts}/api/contacts/match {message}` → `{ "match": ContactMatch | null }`
//! - `GET {style}/api/profile` → style profile
//! - `POST {style}/api/learn {content, type}` → `{ "success": bool }`

use async_trait::async_trait;
use reply_core::{
    clamp_unit, ContactMatch, LearnType, Schema, SentimentVerdict, ServiceResult, StyleProfile,
    Validation,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::ServiceClient;
use crate::config::ServicesConfig;
use crate::sources::{ContactSource, SentimentSource, StyleSource};

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct LearnBody<'a> {
    content: &'a str,
    #[serde(rename = "type")]
    kind: LearnType,
}

/// Response of the contact match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMatchEnvelope {
    #[serde(rename = "match", default)]
    pub matched: Option<ContactMatch>,
}

impl Schema for ContactMatchEnvelope {
    type Raw = ContactMatchEnvelope;

    fn validate(mut raw: ContactMatchEnvelope) -> Validation<Self> {
        if let Some(m) = raw.matched.as_mut() {
            if m.contact.name.trim().is_empty() {
                return Validation::Invalid("matched contact has an empty name".to_string());
            }
            m.confidence = clamp_unit(m.confidence);
        }
        Validation::Valid(raw)
    }
}

/// Response of the learn endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnAck {
    pub success: bool,
}

impl Schema for LearnAck {
    type Raw = LearnAck;

    fn validate(raw: LearnAck) -> Validation<Self> {
        Validation::Valid(raw)
    }
}

/// Sentiment service client.
#[derive(Debug, Clone)]
pub struct HttpSentimentService {
    client: ServiceClient,
}

impl HttpSentimentService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(ServiceClient::new("sentiment", &config.sentiment_url).with_timeout(config.timeout))
    }
}

#[async_trait]
impl SentimentSource for HttpSentimentService {
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn analyze(&self, message: &str) -> ServiceResult<SentimentVerdict> {
        self.client
            .post("/api/analyze", &MessageBody { message })
            .await
    }
}

/// Contact service client.
#[derive(Debug, Clone)]
pub struct HttpContactService {
    client: ServiceClient,
}

impl HttpContactService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(ServiceClient::new("contacts", &config.contacts_url).with_timeout(config.timeout))
    }
}

#[async_trait]
impl ContactSource for HttpContactService {
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn match_contact(&self, message: &str) -> ServiceResult<Option<ContactMatch>> {
        self.client
            .post::<_, ContactMatchEnvelope>("/api/contacts/match", &MessageBody { message })
            .await
            .map(|envelope| envelope.matched)
    }
}

/// Style service client.
#[derive(Debug, Clone)]
pub struct HttpStyleService {
    client: ServiceClient,
}

impl HttpStyleService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(ServiceClient::new("style", &config.style_url).with_timeout(config.timeout))
    }
}

#[async_trait]
impl StyleSource for HttpStyleService {
    #[instrument(skip(self))]
    async fn profile(&self) -> ServiceResult<StyleProfile> {
        self.client.get("/api/profile").await
    }

    #[instrument(skip(self, content), fields(content_len = content.len(), kind = kind.as_str()))]
    async fn learn(&self, content: &str, kind: LearnType) -> ServiceResult<bool> {
        self.client
            .post::<_, LearnAck>("/api/learn", &LearnBody { content, kind })
            .await
            .map(|ack| ack.success)
    }
}
