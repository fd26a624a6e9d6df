//! OpenAI-backed [`LlmClient`]: wraps openai-client and prepends an optional system prompt.
//!
//! The configured prompt (LLM_SYSTEM_PROMPT) always goes first, ahead of the task
//! instructions each prompt builder supplies.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::StreamChunk as OpenAIStreamChunk;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, StreamChunk, StreamChunkCallback};
use crate::config::LlmConfig;

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    system_prompt: Option<String>,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(api_key),
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
        }
    }

    /// Builds a client from config: base URL, model and optional system prompt.
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_system_prompt_opt(config.system_prompt().map(str::to_string))
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Global system prompt sent as the first message of every request. A request's own
    /// system message follows it.
    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    fn with_global_prompt(&self, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        match self.system_prompt.as_deref() {
            Some(system) => std::iter::once(ChatMessage::system(system))
                .chain(messages)
                .collect(),
            None => messages,
        }
    }

    fn to_openai_messages(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<openai_client::ChatCompletionRequestMessage>> {
        self.with_global_prompt(messages)
            .iter()
            .map(chat_message_to_openai)
            .collect()
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model, message_count = messages.len()))]
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = self.to_openai_messages(messages)?;
        self.client.chat_completion(&self.model, openai_messages).await
    }

    #[instrument(skip(self, messages, callback), fields(model = %self.model, message_count = messages.len()))]
    async fn get_llm_response_stream_with_messages(
        &self,
        messages: Vec<ChatMessage>,
        callback: &mut StreamChunkCallback,
    ) -> Result<String> {
        let openai_messages = self.to_openai_messages(messages)?;
        self.client
            .chat_completion_stream(&self.model, openai_messages, |chunk: OpenAIStreamChunk| {
                callback(StreamChunk {
                    content: chunk.content,
                    done: chunk.done,
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt::{reply_generation_messages, MessageRole, REPLY_SYSTEM_MESSAGE};

    fn request_messages() -> Vec<ChatMessage> {
        reply_generation_messages("Lunch tomorrow?", "casual", None, None)
    }

    #[test]
    fn test_global_prompt_precedes_task_instructions() {
        let client = OpenAILlmClient::new("sk-test".to_string())
            .with_system_prompt_opt(Some("Always answer in French.".to_string()));
        let messages = client.with_global_prompt(request_messages());
        assert_eq!(messages[0], ChatMessage::system("Always answer in French."));
        assert_eq!(messages[1], ChatMessage::system(REPLY_SYSTEM_MESSAGE));
        assert_eq!(messages[2].role, MessageRole::User);
        assert_eq!(client.to_openai_messages(request_messages()).unwrap().len(), 3);
    }

    #[test]
    fn test_without_global_prompt_messages_unchanged() {
        let client = OpenAILlmClient::new("sk-test".to_string());
        assert_eq!(client.with_global_prompt(request_messages()), request_messages());
    }
}
