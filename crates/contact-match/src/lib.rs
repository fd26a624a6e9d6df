//! # Contact matching
//!
//! [`ContactDirectory`] holds the user's known contacts and finds which one a message
//! mentions, by full name or alias. It implements
//! [`ContactSource`](service_client::ContactSource) for in-process use.

mod directory;

pub use directory::{ContactDirectory, ALIAS_CONFIDENCE, NAME_CONFIDENCE};
