//! Transcript aggregation and caption timing
//!
//! This module owns the append-only transcript log shared by both call
//! sides, the canonical chronological merge over it, and the per-side
//! transient caption state with its quiet-period countdown.

mod aggregator;
mod caption;
mod entry;

pub use aggregator::TranscriptAggregator;
pub use caption::{CaptionReset, CaptionTimer, DEFAULT_CAPTION_TIMEOUT};
pub use entry::{chronological, ParticipantId, Side, TranscriptEntry};
