use crate::error::MalformedMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one side of a call.
///
/// The local side gets its id from the connection provider; the remote side
/// is the identity of the connected peer. Stable for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Which side of the call an entry or caption belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Local,
    Remote,
}

/// One finalized utterance attributed to a side. Immutable once created.
///
/// `timestamp` is assigned when the text is finalized (production time, not
/// arrival time), so entries from both sides merge by when they were spoken.
/// The two sides' clocks are not assumed synchronized; ordering across sides
/// is best-effort under clock skew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    #[serde(rename = "participantId")]
    pub participant_id: ParticipantId,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Builds an entry stamped with the current time.
    pub fn now(
        text: impl Into<String>,
        participant_id: ParticipantId,
    ) -> Result<Self, MalformedMessage> {
        Self::at(text, participant_id, Utc::now())
    }

    /// Builds an entry with an explicit production timestamp. Rejects empty
    /// or whitespace-only text.
    pub fn at(
        text: impl Into<String>,
        participant_id: ParticipantId,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, MalformedMessage> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(MalformedMessage::EmptyText);
        }
        Ok(Self {
            text,
            participant_id,
            timestamp,
        })
    }
}

/// The canonical chronological ordering of the transcript log: a stable sort
/// ascending by timestamp, so each side's append order breaks ties.
///
/// Pure function over the entries; every other view derives from this one.
pub fn chronological(entries: &[TranscriptEntry]) -> Vec<TranscriptEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.timestamp);
    sorted
}
