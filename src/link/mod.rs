//! Reliable ordered transcript channel to the remote peer
//!
//! `DataChannelLink` wraps whatever byte transport the connection provider
//! hands over and enforces the wire envelope in both directions. Delivery
//! order and exactly-once are the transport's job; this layer does no
//! de-duplication and never buffers across the closed sub-state.

pub mod wire;

pub use wire::{decode, encode, Decoded, Envelope, TranscriptPayload, KIND_TRANSCRIPT};

use crate::error::LinkError;
use crate::transcript::{ParticipantId, TranscriptEntry};
use tracing::{debug, warn};

/// Where outbound frames go. The connection provider supplies a sink bound
/// to the remote peer's inbound path.
pub trait FrameSink: Send {
    fn send(&self, bytes: Vec<u8>) -> Result<(), LinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Connecting,
    Open,
    Closed,
}

/// The transcript message channel to one remote peer.
pub struct DataChannelLink {
    peer: ParticipantId,
    state: LinkState,
    sink: Box<dyn FrameSink>,
}

impl DataChannelLink {
    /// A link whose transport has not finished opening yet. Sends fail until
    /// [`mark_open`](Self::mark_open).
    pub fn pending(peer: ParticipantId, sink: Box<dyn FrameSink>) -> Self {
        Self {
            peer,
            state: LinkState::Connecting,
            sink,
        }
    }

    pub fn peer(&self) -> &ParticipantId {
        &self.peer
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    pub fn mark_open(&mut self) {
        if self.state == LinkState::Connecting {
            debug!(peer = %self.peer, "data channel open");
            self.state = LinkState::Open;
        }
    }

    pub fn close(&mut self) {
        self.state = LinkState::Closed;
    }

    /// Enqueues a transcript message for delivery.
    ///
    /// Only a link in the open sub-state delivers anything: otherwise this
    /// returns [`LinkError::NotOpen`] and the entry is neither sent nor held
    /// back for a later reopen. The caller must not assume delivery succeeded.
    pub fn send(&self, entry: &TranscriptEntry) -> Result<(), LinkError> {
        if !self.is_open() {
            warn!(peer = %self.peer, "data channel not open, transcript not sent");
            return Err(LinkError::NotOpen);
        }
        let bytes = wire::encode(entry).map_err(|err| LinkError::Transport(err.to_string()))?;
        self.sink.send(bytes)
    }

    /// Handles one inbound frame. Unknown kinds are ignored silently and
    /// malformed payloads are dropped with a warning; neither produces an
    /// entry, so neither can corrupt the transcript log.
    pub fn accept(&self, raw: &[u8]) -> Option<TranscriptEntry> {
        match wire::decode(raw) {
            Ok(Decoded::Transcript(entry)) => Some(entry),
            Ok(Decoded::Unknown(kind)) => {
                debug!(peer = %self.peer, %kind, "ignoring message of unknown kind");
                None
            }
            Err(err) => {
                warn!(peer = %self.peer, "dropping malformed message: {err}");
                None
            }
        }
    }
}

impl std::fmt::Debug for DataChannelLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataChannelLink")
            .field("peer", &self.peer)
            .field("state", &self.state)
            .finish()
    }
}
