//! # Style learner
//!
//! Stores writing samples (selected replies, custom edits, sent messages) and derives a
//! [`StyleProfile`](reply_core::StyleProfile) from them by plain string matching.
//!
//! [`StyleLearner`] implements [`StyleSource`](service_client::StyleSource), so the
//! aggregator can use it in place of the remote style service.

mod analysis;
mod learner;

pub use analysis::{
    average_word_length, build_profile, contains_emoji, vocabulary_level, MIN_PHRASE_COUNT,
};
pub use learner::{StyleLearner, StyleSample, MAX_SAMPLE_CHARS};
