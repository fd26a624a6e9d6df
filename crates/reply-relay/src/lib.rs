//! # Reply relay
//!
//! Turns a [`GenerationRequest`](reply_core::GenerationRequest) into a stream of `data: `
//! events from the LLM, the same bytes an HTTP relay would send. [`ReplyRelay`]
//! implements [`GenerationTransport`](reply_stream::GenerationTransport), so a
//! [`ReplyGenerator`](reply_stream::ReplyGenerator) can drive the LLM in-process.

mod relay;

pub use relay::{ReplyRelay, CHANNEL_CAPACITY};
