//! Stream consumption state machine.

use std::fmt::Display;

use futures::{Stream, StreamExt};
use reply_core::{ReplyError, ReplyOption, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::accumulator::StreamAccumulator;
use crate::decoder::LineDecoder;
use crate::event::{classify_line, DataLine, StreamEvent, GENERIC_STREAM_ERROR};
use crate::extract::extract_replies;

/// How a consumed stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// Clean end of stream. `replies` may hold fewer than three options.
    Completed {
        text: String,
        replies: Vec<ReplyOption>,
    },
    /// The token fired; partial text is discarded.
    Cancelled,
}

/// Per-generation parse state: line decoder plus accumulator.
#[derive(Debug, Default)]
pub struct StreamState {
    decoder: LineDecoder,
    accumulator: StreamAccumulator,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk. Fails on an error event.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        for line in self.decoder.push(chunk) {
            self.process_line(&line)?;
        }
        Ok(())
    }

    pub fn process_line(&mut self, line: &str) -> Result<()> {
        match classify_line(line) {
            DataLine::Event(StreamEvent::Text { content }) => self.accumulator.append(&content),
            DataLine::Event(StreamEvent::Content { content }) => {
                self.accumulator.replace(&content)
            }
            DataLine::Event(StreamEvent::Error { error }) => {
                let message = error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_STREAM_ERROR.to_string());
                return Err(ReplyError::Upstream(message));
            }
            DataLine::Raw(text) => self.accumulator.append(&text),
            DataLine::Done | DataLine::Skip => {}
        }
        Ok(())
    }

    pub fn text(&self) -> &str {
        self.accumulator.as_str()
    }

    /// Flushes the unterminated tail and extracts replies.
    pub fn finish(mut self) -> Result<(String, Vec<ReplyOption>)> {
        if let Some(tail) = self.decoder.finish() {
            self.process_line(&tail)?;
        }
        let text = self.accumulator.into_text();
        let replies = extract_replies(&text);
        Ok((text, replies))
    }
}

/// Reads `stream` to its end unless `cancel` fires first.
///
/// Exactly one read is outstanding at a time and every line of a chunk is processed before
/// the next read. Cancellation is checked before each read and returns
/// [`StreamOutcome::Cancelled`] rather than an error.
pub async fn consume<S, B, E>(mut stream: S, cancel: &CancellationToken) -> Result<StreamOutcome>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut state = StreamState::new();
    let mut chunks = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(chunks, "Stream consumption cancelled");
                return Ok(StreamOutcome::Cancelled);
            }
            next = stream.next() => next,
        };
        match next {
            Some(Ok(chunk)) => {
                chunks += 1;
                state.feed(chunk.as_ref())?;
            }
            Some(Err(e)) => {
                warn!(error = %e, chunks, "Stream read failed");
                return Err(ReplyError::Transport(e.to_string()));
            }
            None => break,
        }
    }

    if cancel.is_cancelled() {
        return Ok(StreamOutcome::Cancelled);
    }
    let (text, replies) = state.finish()?;
    info!(chunks, replies = replies.len(), "Stream completed");
    Ok(StreamOutcome::Completed { text, replies })
}
