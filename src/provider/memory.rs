use super::{ConnectionProvider, ProviderEvent};
use crate::error::{AcquisitionError, LinkError};
use crate::link::{DataChannelLink, FrameSink};
use crate::media::LocalStream;
use crate::transcript::ParticipantId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::info;

/// In-process loopback switch between registered peers.
///
/// Routes calls, data channels, and frames synchronously over mpsc queues so
/// two sessions can hold a complete call inside one test or demo process.
/// Delivery is reliable and ordered per direction, matching the transport
/// contract the link layer assumes.
#[derive(Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    peers: HashMap<ParticipantId, mpsc::UnboundedSender<ProviderEvent>>,
    /// Established data channel pairs, used to notify the surviving side
    /// when a peer drops.
    links: Vec<(ParticipantId, ParticipantId)>,
}

/// Outbound half of a memory data channel: frames land directly in the
/// remote session's provider event queue.
struct EventFrameSink {
    events: mpsc::UnboundedSender<ProviderEvent>,
}

impl FrameSink for EventFrameSink {
    fn send(&self, bytes: Vec<u8>) -> Result<(), LinkError> {
        self.events
            .send(ProviderEvent::LinkData(bytes))
            .map_err(|_| LinkError::Transport("peer event queue closed".to_string()))
    }
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, events: mpsc::UnboundedSender<ProviderEvent>) -> ParticipantId {
        let id = ParticipantId::new(format!("peer-{}", uuid::Uuid::new_v4()));
        let mut inner = self.inner.lock().expect("hub lock poisoned");
        inner.peers.insert(id.clone(), events);
        id
    }

    fn send_to(
        inner: &HubInner,
        target: &ParticipantId,
        event: ProviderEvent,
    ) -> Result<(), LinkError> {
        let tx = inner
            .peers
            .get(target)
            .ok_or_else(|| LinkError::Transport(format!("unknown peer {target}")))?;
        tx.send(event)
            .map_err(|_| LinkError::Transport(format!("peer {target} is gone")))
    }

    fn call(&self, from: &ParticipantId, target: &ParticipantId) -> Result<(), LinkError> {
        let inner = self.inner.lock().expect("hub lock poisoned");
        Self::send_to(&inner, target, ProviderEvent::IncomingCall { from: from.clone() })
    }

    /// Completes a media call: both sides observe the other's stream.
    fn answer(&self, callee: &ParticipantId, caller: &ParticipantId) -> Result<(), LinkError> {
        let inner = self.inner.lock().expect("hub lock poisoned");
        Self::send_to(&inner, caller, ProviderEvent::RemoteStream { from: callee.clone() })?;
        Self::send_to(&inner, callee, ProviderEvent::RemoteStream { from: caller.clone() })
    }

    /// Creates the paired data channel: the caller gets its half returned,
    /// the target gets its half as an incoming connection, and both sides
    /// see the channel open.
    fn connect(
        &self,
        from: &ParticipantId,
        target: &ParticipantId,
    ) -> Result<DataChannelLink, LinkError> {
        let mut inner = self.inner.lock().expect("hub lock poisoned");
        let caller_tx = inner
            .peers
            .get(from)
            .ok_or_else(|| LinkError::Transport(format!("unknown peer {from}")))?
            .clone();
        let target_tx = inner
            .peers
            .get(target)
            .ok_or_else(|| LinkError::Transport(format!("unknown peer {target}")))?
            .clone();

        let caller_link = DataChannelLink::pending(
            target.clone(),
            Box::new(EventFrameSink {
                events: target_tx.clone(),
            }),
        );
        let target_link = DataChannelLink::pending(
            from.clone(),
            Box::new(EventFrameSink {
                events: caller_tx.clone(),
            }),
        );

        target_tx
            .send(ProviderEvent::IncomingConnection(target_link))
            .map_err(|_| LinkError::Transport(format!("peer {target} is gone")))?;
        target_tx.send(ProviderEvent::LinkOpened).ok();
        caller_tx.send(ProviderEvent::LinkOpened).ok();

        inner.links.push((from.clone(), target.clone()));
        Ok(caller_link)
    }

    /// Delivers an arbitrary raw frame to a peer's inbound queue. Lets tests
    /// exercise the receiver's handling of foreign or malformed traffic.
    pub fn send_raw(&self, target: &ParticipantId, bytes: Vec<u8>) -> Result<(), LinkError> {
        let inner = self.inner.lock().expect("hub lock poisoned");
        Self::send_to(&inner, target, ProviderEvent::LinkData(bytes))
    }

    fn drop_peer(&self, id: &ParticipantId) {
        let mut inner = self.inner.lock().expect("hub lock poisoned");
        let inner = &mut *inner;
        inner.peers.remove(id);
        let peers = &inner.peers;
        inner.links.retain(|(a, b)| {
            let other = if a == id {
                b
            } else if b == id {
                a
            } else {
                return true;
            };
            if let Some(tx) = peers.get(other) {
                tx.send(ProviderEvent::LinkClosed).ok();
            }
            false
        });
    }
}

/// Connection provider backed by a [`MemoryHub`]. One instance per session;
/// no shared module-level state, so any number of hubs and sessions can
/// coexist in one process.
pub struct MemoryProvider {
    hub: MemoryHub,
    events_tx: mpsc::UnboundedSender<ProviderEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<ProviderEvent>>,
    identity: Option<ParticipantId>,
    destroyed: bool,
}

impl MemoryProvider {
    pub fn new(hub: MemoryHub) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            hub,
            events_tx,
            events_rx: Some(events_rx),
            identity: None,
            destroyed: false,
        }
    }

    fn identity(&self) -> Result<&ParticipantId, LinkError> {
        self.identity
            .as_ref()
            .ok_or_else(|| LinkError::Transport("no identity issued yet".to_string()))
    }
}

#[async_trait]
impl ConnectionProvider for MemoryProvider {
    async fn create_identity(&mut self) -> Result<ParticipantId, AcquisitionError> {
        if let Some(id) = &self.identity {
            return Ok(id.clone());
        }
        let id = self.hub.register(self.events_tx.clone());
        info!(%id, "registered with memory hub");
        self.identity = Some(id.clone());
        Ok(id)
    }

    fn take_events(&mut self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        // A second take would hand back a receiver that never fires.
        self.events_rx
            .take()
            .unwrap_or_else(|| mpsc::unbounded_channel().1)
    }

    async fn call(
        &mut self,
        target: &ParticipantId,
        _stream: &LocalStream,
    ) -> Result<(), LinkError> {
        let id = self.identity()?.clone();
        self.hub.call(&id, target)
    }

    async fn answer(
        &mut self,
        caller: &ParticipantId,
        _stream: &LocalStream,
    ) -> Result<(), LinkError> {
        let id = self.identity()?.clone();
        self.hub.answer(&id, caller)
    }

    async fn connect(&mut self, target: &ParticipantId) -> Result<DataChannelLink, LinkError> {
        let id = self.identity()?.clone();
        self.hub.connect(&id, target)
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(id) = &self.identity {
            info!(%id, "leaving memory hub");
            self.hub.drop_peer(id);
        }
        self.destroyed = true;
    }
}
