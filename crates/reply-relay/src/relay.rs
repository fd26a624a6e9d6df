use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use context::ContextAggregator;
use llm_client::{LlmClient, StreamChunk};
use prompt::reply_generation_messages;
use reply_core::{GenerationRequest, Result};
use reply_stream::{done_line, GenerationStream, GenerationTransport, StreamEvent};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Buffered events between the LLM task and the reader.
pub const CHANNEL_CAPACITY: usize = 64;

type EventSender = mpsc::Sender<io::Result<Bytes>>;

/// Streams LLM replies as `data: ` events.
///
/// Each generation runs in its own task. Context, when the request has none and an
/// aggregator is configured, is built inside that task; it is not aborted when the reader
/// goes away, but the LLM call is skipped or stopped as soon as the receiver is dropped.
pub struct ReplyRelay {
    llm: Arc<dyn LlmClient>,
    aggregator: Option<Arc<ContextAggregator>>,
}

impl ReplyRelay {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            aggregator: None,
        }
    }

    pub fn with_aggregator(mut self, aggregator: Arc<ContextAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }
}

#[async_trait]
impl GenerationTransport for ReplyRelay {
    #[instrument(skip(self, request), fields(tone = %request.tone))]
    async fn open(&self, request: &GenerationRequest) -> Result<GenerationStream> {
        let conversation_id = request
            .conversation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let llm = self.llm.clone();
        let aggregator = self.aggregator.clone();
        let request = request.clone();
        let id = conversation_id.clone();
        tokio::spawn(async move {
            run_generation(llm, aggregator, request, tx).await;
            debug!(conversation_id = %id, "Relay task finished");
        });

        info!(conversation_id = %conversation_id, "Generation opened");
        Ok(GenerationStream {
            conversation_id: Some(conversation_id),
            body: Box::pin(ReceiverStream::new(rx)),
        })
    }
}

async fn run_generation(
    llm: Arc<dyn LlmClient>,
    aggregator: Option<Arc<ContextAggregator>>,
    request: GenerationRequest,
    tx: EventSender,
) {
    let context = match (&request.context, &aggregator) {
        (Some(context), _) => Some(context.clone()),
        (None, Some(aggregator)) => {
            let built = aggregator.build(&request.message).await;
            (!built.is_empty()).then(|| built.to_prompt_text())
        }
        (None, None) => None,
    };

    if tx.is_closed() {
        debug!("Reader gone before generation started");
        return;
    }

    let messages = reply_generation_messages(
        &request.message,
        request.tone.as_str(),
        context.as_deref(),
        request.intent.as_deref(),
    );

    let delta_tx = tx.clone();
    let mut on_chunk = move |chunk: StreamChunk| -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> {
        let tx = delta_tx.clone();
        Box::pin(async move {
            if chunk.content.is_empty() {
                return Ok(());
            }
            let line = StreamEvent::text(chunk.content).to_sse()?;
            tx.send(Ok(Bytes::from(line)))
                .await
                .map_err(|_| anyhow!("generation reader dropped"))
        })
    };

    match llm
        .get_llm_response_stream_with_messages(messages, &mut on_chunk)
        .await
    {
        Ok(text) => debug!(chars = text.len(), "LLM stream finished"),
        Err(e) if tx.is_closed() => debug!(error = %e, "LLM stream stopped after reader left"),
        Err(e) => {
            error!(error = %e, "LLM stream failed");
            send_line(&tx, StreamEvent::error(e.to_string()).to_sse()).await;
        }
    }
    send_line(&tx, Ok(done_line())).await;
}

async fn send_line(tx: &EventSender, line: serde_json::Result<String>) {
    match line {
        Ok(line) => {
            if tx.send(Ok(Bytes::from(line))).await.is_err() {
                debug!("Reader dropped before event was sent");
            }
        }
        Err(e) => warn!(error = %e, "Failed to encode stream event"),
    }
}
