//! # Service clients
//!
//! Bounded-timeout callers of the auxiliary smart-reply services. Every call is a single
//! attempt that yields a [`ServiceResult`](reply_core::ServiceResult); transport errors,
//! non-2xx statuses and malformed payloads never escape as errors.
//!
//! - [`ServiceClient`]: generic JSON-over-HTTP caller with a per-call timeout
//! - [`SentimentSource`], [`ContactSource`], [`StyleSource`]: the seams the aggregator depends on
//! - [`HttpSentimentService`], [`HttpContactService`], [`HttpStyleService`]: HTTP implementations
//! - [`ServicesConfig`]: base URLs and timeout from the environment

mod client;
mod config;
mod http;
mod sources;

pub use client::{ServiceClient, DEFAULT_TIMEOUT};
pub use config::ServicesConfig;
pub use http::{
    ContactMatchEnvelope, HttpContactService, HttpSentimentService, HttpStyleService, LearnAck,
};
pub use sources::{ContactSource, SentimentSource, StyleSource};
