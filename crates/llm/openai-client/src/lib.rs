//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completion, both one-shot and streamed.
//! Streaming forwards every content delta to a callback so a relay can re-emit it as a
//! server-sent event without buffering.

use std::sync::Arc;
use std::time::Instant;

use async_openai::{config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client};
use futures::StreamExt;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key for logs: first 7 chars + `***` + last 4 chars.
/// Keys of 11 chars or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// One streamed content delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// Text added since the previous chunk.
    pub content: String,
    /// True when the model reported a finish reason.
    pub done: bool,
}

/// OpenAI chat client; cheap to clone.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    /// Kept only for masked logging. `None` when built from an existing client.
    api_key_for_logging: Option<String>,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.clone());
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: Some(api_key),
        }
    }

    /// Custom base URL for proxies and OpenAI-compatible endpoints.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: Some(api_key),
        }
    }

    pub fn with_client(client: Client<OpenAIConfig>) -> Self {
        Self {
            client: Arc::new(client),
            api_key_for_logging: None,
        }
    }

    fn masked_key(&self) -> String {
        self.api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string())
    }

    /// Returns the first choice's content; errors when the response has no choices.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %self.masked_key(),
            "OpenAI chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let started = Instant::now();
        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }

    /// Streams a chat completion, invoking `callback` once per non-empty content delta.
    ///
    /// Returns the concatenated reply. A callback error stops the stream and is returned,
    /// which is how a consumer that went away halts generation.
    pub async fn chat_completion_stream<F, Fut>(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        mut callback: F,
    ) -> anyhow::Result<String>
    where
        F: FnMut(StreamChunk) -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<()>>,
    {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %self.masked_key(),
            "OpenAI chat_completion_stream request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?;

        let mut stream = self.client.chat().create_stream(request).await?;
        let mut full_response = String::new();
        let mut delta_count = 0usize;

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| anyhow::anyhow!("Stream error: {}", e))?;
            let Some(choice) = chunk.choices.first() else {
                continue;
            };
            let done = choice.finish_reason.is_some();
            let content = choice.delta.content.clone().unwrap_or_default();
            if content.is_empty() && !done {
                continue;
            }
            full_response.push_str(&content);
            delta_count += 1;
            callback(StreamChunk { content, done }).await?;
            if done {
                break;
            }
        }

        tracing::info!(
            delta_count,
            response_len = full_response.len(),
            "OpenAI chat_completion_stream finished"
        );
        Ok(full_response)
    }
}
