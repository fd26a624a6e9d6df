//! Generation controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use reply_core::{GenerationRequest, ReplyOption, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::consumer::{consume, StreamOutcome};
use crate::sink::ReplySink;
use crate::transport::GenerationTransport;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReplies {
    pub conversation_id: Option<String>,
    pub text: String,
    pub replies: Vec<ReplyOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Completed(GeneratedReplies),
    Cancelled,
}

impl GenerationOutcome {
    /// Replies of a completed generation; empty when cancelled.
    pub fn replies(&self) -> &[ReplyOption] {
        match self {
            GenerationOutcome::Completed(generated) => &generated.replies,
            GenerationOutcome::Cancelled => &[],
        }
    }
}

/// Runs one generation at a time.
///
/// Starting a generation cancels the previous one. Each generation gets a fresh token and
/// fresh parse state, so nothing carries over between requests.
pub struct ReplyGenerator {
    transport: Arc<dyn GenerationTransport>,
    sink: Option<Arc<dyn ReplySink>>,
    active: ActiveSlot,
    next_id: AtomicU64,
}

/// The running generation's id and token. Never held across an await.
#[derive(Default)]
struct ActiveSlot(Mutex<Option<(u64, CancellationToken)>>);

impl ActiveSlot {
    fn lock(&self) -> MutexGuard<'_, Option<(u64, CancellationToken)>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the slot when its generation ends, including when the `generate` future is
/// dropped mid-run. A newer generation's entry is left alone.
struct ActiveGuard<'a> {
    slot: &'a ActiveSlot,
    id: u64,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.slot.lock();
        if matches!(*active, Some((current, _)) if current == self.id) {
            *active = None;
        }
    }
}

impl ReplyGenerator {
    pub fn new(transport: Arc<dyn GenerationTransport>) -> Self {
        Self {
            transport,
            sink: None,
            active: ActiveSlot::default(),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReplySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Aborts the active generation. Returns whether one was running.
    pub async fn cancel(&self) -> bool {
        let previous = self.active.lock().take();
        match previous {
            Some((id, token)) => {
                info!(generation = id, "Generation cancelled");
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    #[instrument(skip(self, request), fields(tone = %request.tone))]
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();
        let superseded = self.active.lock().replace((id, token.clone()));
        if let Some((previous, old)) = superseded {
            info!(generation = previous, "Superseded by a new generation");
            old.cancel();
        }
        let _guard = ActiveGuard {
            slot: &self.active,
            id,
        };

        self.run(&request, &token).await
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        token: &CancellationToken,
    ) -> Result<GenerationOutcome> {
        let stream = tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(GenerationOutcome::Cancelled),
            opened = self.transport.open(request) => opened?,
        };
        let conversation_id = stream.conversation_id;

        let (text, replies) = match consume(stream.body, token).await? {
            StreamOutcome::Completed { text, replies } => (text, replies),
            StreamOutcome::Cancelled => return Ok(GenerationOutcome::Cancelled),
        };
        info!(replies = replies.len(), conversation_id = ?conversation_id, "Replies generated");

        if let (Some(sink), Some(id)) = (&self.sink, conversation_id.as_deref()) {
            if !replies.is_empty() {
                if let Err(e) = sink.save(id, &replies).await {
                    warn!(error = %e, conversation_id = id, "Failed to persist replies");
                }
            }
        }

        Ok(GenerationOutcome::Completed(GeneratedReplies {
            conversation_id,
            text,
            replies,
        }))
    }
}
