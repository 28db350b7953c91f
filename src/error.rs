use thiserror::Error;

/// Failure while acquiring the local capture stream or the peer identity.
///
/// Fatal to session start: surfaced to the caller immediately and never
/// retried.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to acquire capture stream: {0}")]
    Capture(String),

    #[error("failed to obtain a peer identity: {0}")]
    Identity(String),
}

/// Data channel failure. Non-fatal: the session keeps running and the user
/// action may be retried.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The channel is not in its open sub-state; nothing was enqueued.
    #[error("data channel is not open")]
    NotOpen,

    #[error("data channel transport failed: {0}")]
    Transport(String),
}

/// Inbound frame that failed envelope parsing or payload validation.
///
/// Contained at the link boundary: the frame is dropped with a warning and
/// never reaches the transcript log.
#[derive(Debug, Error)]
pub enum MalformedMessage {
    #[error("invalid message JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transcript payload has empty text")]
    EmptyText,

    #[error("transcript payload has an invalid timestamp: {0}")]
    BadTimestamp(String),
}

/// Speech recognition failure.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer failed to start: {0}")]
    Start(String),

    /// Restart after a language change failed twice; recognition is stopped.
    #[error("recognition unavailable: {0}")]
    Unavailable(String),
}

/// Summarization service failure, surfaced verbatim to the requester.
#[derive(Debug, Error)]
#[error("summarization service error: {message}")]
pub struct ServiceError {
    pub message: String,
}

/// Errors visible on the session surface.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Malformed(#[from] MalformedMessage),

    #[error("operation not valid in the current session phase: {0}")]
    InvalidState(&'static str),
}
