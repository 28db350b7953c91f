use crate::transcript::Side;

/// Events on the session's own queue: timer expirations and user actions.
/// Provider and recognizer events arrive on their own channels and are
/// consumed by the same single event loop.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent {
    /// A caption quiet period elapsed. `token` must still name the side's
    /// pending countdown for the caption to clear.
    CaptionExpired { side: Side, token: u64 },
    /// User toggled captioning on.
    StartRecognition,
    /// User toggled captioning off.
    StopRecognition,
    /// User-requested hang-up.
    HangUp,
}
