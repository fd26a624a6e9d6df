//! # Streaming replies
//!
//! Client side of reply generation.
//!
//! - [`StreamEvent`]: the closed set of events carried on `data: ` lines
//! - [`consume`]: reads a byte stream, rebuilds the model text in a [`StreamAccumulator`]
//!   and extracts up to three [`ReplyOption`](reply_core::ReplyOption)s at clean end
//! - [`GenerationTransport`]: opens a generation stream; [`HttpGenerationClient`] talks
//!   to the relay over HTTP
//! - [`ReplySink`]: persists the final reply set
//! - [`ReplyGenerator`]: one cancellation token per generation, resets prior state,
//!   persists on success
//!
//! ## Wire format
//!
//! ```text
//! data: {"type":"text","content":"Hel"}
//!
//! data: {"type":"content","content":"Hello"}
//!
//! data: {"type":"error","error":"Rate limit exceeded"}
//!
//! data: [DONE]
//! ```

mod accumulator;
mod consumer;
mod decoder;
mod event;
mod extract;
mod generator;
mod sink;
mod transport;

pub use accumulator::StreamAccumulator;
pub use consumer::{consume, StreamOutcome, StreamState};
pub use decoder::LineDecoder;
pub use event::{
    classify_line, done_line, DataLine, StreamEvent, DATA_PREFIX, DONE_SENTINEL,
    GENERIC_STREAM_ERROR,
};
pub use extract::{coerce_reply_text, extract_replies};
pub use generator::{GeneratedReplies, GenerationOutcome, ReplyGenerator};
pub use sink::{HttpReplySink, ReplySink};
pub use transport::{
    ByteStream, GenerationStream, GenerationTransport, HttpGenerationClient,
    CONVERSATION_ID_HEADER,
};
