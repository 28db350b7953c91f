//! Connection provider capability
//!
//! The peer-to-peer transport (signaling, NAT traversal, media negotiation)
//! is consumed through this trait, never implemented here. A provider issues
//! the local identity, opens media calls and data channels to a target
//! identity, and reports everything asynchronous on an event channel the
//! session loop consumes.

mod memory;

pub use memory::{MemoryHub, MemoryProvider};

use crate::error::{AcquisitionError, LinkError};
use crate::link::DataChannelLink;
use crate::media::LocalStream;
use crate::transcript::ParticipantId;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Asynchronous notifications from the connection provider.
#[derive(Debug)]
pub enum ProviderEvent {
    /// A remote peer opened a data channel to us.
    IncomingConnection(DataChannelLink),
    /// A remote peer is calling with media; answer with the local stream.
    IncomingCall { from: ParticipantId },
    /// The remote side's media stream arrived.
    RemoteStream { from: ParticipantId },
    /// Our data channel finished opening.
    LinkOpened,
    /// One raw frame arrived on the data channel.
    LinkData(Vec<u8>),
    /// The provider reports the peer link as lost.
    LinkClosed,
}

/// One session's handle on the peer-to-peer transport.
#[async_trait]
pub trait ConnectionProvider: Send {
    /// Registers with the provider and returns the identity other peers use
    /// to reach this session. Idempotent for the session lifetime.
    async fn create_identity(&mut self) -> Result<ParticipantId, AcquisitionError>;

    /// Hands over the receiving end of the provider's event channel. Called
    /// once, by the session that owns this provider.
    fn take_events(&mut self) -> mpsc::UnboundedReceiver<ProviderEvent>;

    /// Opens an outbound media call carrying the local stream.
    async fn call(&mut self, target: &ParticipantId, stream: &LocalStream)
        -> Result<(), LinkError>;

    /// Answers the pending inbound media call from `caller` with the local
    /// stream.
    async fn answer(
        &mut self,
        caller: &ParticipantId,
        stream: &LocalStream,
    ) -> Result<(), LinkError>;

    /// Opens the transcript data channel to `target`.
    async fn connect(&mut self, target: &ParticipantId) -> Result<DataChannelLink, LinkError>;

    /// Releases every provider-held resource. Idempotent.
    fn destroy(&mut self);
}
