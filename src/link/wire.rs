use crate::error::MalformedMessage;
use crate::transcript::{ParticipantId, TranscriptEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one message kind defined in v1.
pub const KIND_TRANSCRIPT: &str = "transcript";

/// Wire envelope carried over the data channel.
///
/// The `kind` field exists so newer senders can add message kinds without
/// breaking older receivers: an unknown kind is ignored, never fatal.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// Transcript payload as it appears on the wire. The timestamp travels as an
/// RFC 3339 string and is re-validated on receipt.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptPayload {
    pub text: String,
    #[serde(rename = "participantId")]
    pub participant_id: String,
    pub timestamp: String,
}

/// Outcome of decoding one inbound frame.
#[derive(Debug)]
pub enum Decoded {
    Transcript(TranscriptEntry),
    /// A kind this version does not understand; receivers ignore it.
    Unknown(String),
}

/// Serializes an entry into its wire envelope.
pub fn encode(entry: &TranscriptEntry) -> Result<Vec<u8>, serde_json::Error> {
    let payload = TranscriptPayload {
        text: entry.text.clone(),
        participant_id: entry.participant_id.as_str().to_string(),
        timestamp: entry.timestamp.to_rfc3339(),
    };
    let envelope = Envelope {
        kind: KIND_TRANSCRIPT.to_string(),
        payload: Some(serde_json::to_value(payload)?),
    };
    serde_json::to_vec(&envelope)
}

/// Parses one inbound frame.
///
/// Unknown kinds come back as [`Decoded::Unknown`]; a transcript payload
/// failing structural validation (empty text, malformed timestamp) is a
/// [`MalformedMessage`] and must never reach the transcript log.
pub fn decode(raw: &[u8]) -> Result<Decoded, MalformedMessage> {
    let envelope: Envelope = serde_json::from_slice(raw)?;
    if envelope.kind != KIND_TRANSCRIPT {
        return Ok(Decoded::Unknown(envelope.kind));
    }

    let payload: TranscriptPayload =
        serde_json::from_value(envelope.payload.unwrap_or(serde_json::Value::Null))?;
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&payload.timestamp)
        .map_err(|err| MalformedMessage::BadTimestamp(err.to_string()))?
        .with_timezone(&Utc);

    let entry = TranscriptEntry::at(
        payload.text,
        ParticipantId::new(payload.participant_id),
        timestamp,
    )?;
    Ok(Decoded::Transcript(entry))
}
