//! # reply-core
//!
//! Core types shared by every smart-reply crate: [`SentimentVerdict`], [`ReplyOption`],
//! [`ServiceResult`], payload [`Validation`], the [`ReplyError`] taxonomy and tracing
//! initialization. Transport-agnostic; used by the service clients, the aggregator,
//! the relay and the stream consumer.

pub mod error;
pub mod logger;
pub mod service_result;
pub mod types;
pub mod validation;

pub use error::{ReplyError, Result};
pub use logger::{init_tracing, open_log_file, LogTarget, DEFAULT_LOG_FILTER};
pub use service_result::ServiceResult;
pub use types::{
    Contact, ContactMatch, EmotionScore, GenerationRequest, LearnType, ReplyOption,
    SentimentLabel, SentimentVerdict, StyleProfile, Tone, Urgency, REPLY_COUNT,
};
pub use validation::{clamp_unit, Schema, Validation};
