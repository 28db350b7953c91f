use super::config::SessionConfig;
use super::events::SessionEvent;
use crate::error::{RecognizerError, SessionError};
use crate::link::DataChannelLink;
use crate::media::{MediaController, MediaSource};
use crate::provider::{ConnectionProvider, ProviderEvent};
use crate::recognizer::{RecognizerAdapter, RecognizerEvent, RecognizerFactory};
use crate::transcript::{CaptionReset, ParticipantId, Side, TranscriptAggregator, TranscriptEntry};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Connection phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, nothing acquired yet.
    Idle,
    /// Acquiring the capture stream and the provider identity.
    Initializing,
    /// Identity issued; reachable, no peer yet.
    Ready,
    /// An inbound peer is attaching; waiting for the rest of its media/data
    /// pair.
    AwaitingPeer,
    /// We placed an outbound call; waiting for the remote stream.
    Connecting,
    /// Two-way media and data established.
    Connected,
    /// Capture or identity acquisition failed. Terminal.
    Failed,
    /// Hung up or lost the peer link. Terminal; resources released.
    Ended,
}

/// One call's worth of state, from identity acquisition to teardown.
///
/// All transitions run on a single event loop: provider events, recognizer
/// events, and the session's own queue (timers, hang-up) are consumed one at
/// a time, so no two handlers ever observe the session mid-mutation.
pub struct PeerSession {
    config: SessionConfig,
    phase: SessionPhase,
    provider: Box<dyn ConnectionProvider>,
    provider_rx: mpsc::UnboundedReceiver<ProviderEvent>,
    media_source: Box<dyn MediaSource>,
    media: Option<MediaController>,
    recognizer: RecognizerAdapter,
    recognizer_rx: mpsc::UnboundedReceiver<RecognizerEvent>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    local_id: Option<ParticipantId>,
    remote_id: Option<ParticipantId>,
    link: Option<DataChannelLink>,
    aggregator: Option<TranscriptAggregator>,
}

impl PeerSession {
    pub fn new(
        config: SessionConfig,
        mut provider: Box<dyn ConnectionProvider>,
        recognizers: Box<dyn RecognizerFactory>,
        media_source: Box<dyn MediaSource>,
    ) -> Self {
        let provider_rx = provider.take_events();
        let (recognizer, recognizer_rx) = RecognizerAdapter::new(recognizers, &config.language);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            phase: SessionPhase::Idle,
            provider,
            provider_rx,
            media_source,
            media: None,
            recognizer,
            recognizer_rx,
            events_tx,
            events_rx,
            local_id: None,
            remote_id: None,
            link: None,
            aggregator: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn local_id(&self) -> Option<&ParticipantId> {
        self.local_id.as_ref()
    }

    pub fn remote_id(&self) -> Option<&ParticipantId> {
        self.remote_id.as_ref()
    }

    pub fn language(&self) -> &str {
        self.recognizer.language()
    }

    pub fn is_listening(&self) -> bool {
        self.recognizer.is_listening()
    }

    /// Sender for user actions (hang-up) from outside the event loop.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events_tx.clone()
    }

    /// The caption currently displayed for a side, if any.
    pub fn caption(&self, side: Side) -> Option<&str> {
        self.aggregator.as_ref().and_then(|agg| agg.caption(side))
    }

    /// Chronological transcript snapshot; empty before the session starts.
    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.aggregator
            .as_ref()
            .map(|agg| agg.snapshot())
            .unwrap_or_default()
    }

    pub fn aggregator(&self) -> Option<&TranscriptAggregator> {
        self.aggregator.as_ref()
    }

    /// `Idle → Initializing → Ready`: acquires the capture stream, then the
    /// provider identity. Either failure is fatal to the session and moves
    /// it to `Failed`; nothing is retried.
    pub async fn start(&mut self) -> Result<ParticipantId, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::InvalidState("start"));
        }
        self.phase = SessionPhase::Initializing;

        let stream = match self.media_source.open().await {
            Ok(stream) => stream,
            Err(err) => {
                error!("capture acquisition failed: {err}");
                self.phase = SessionPhase::Failed;
                return Err(err.into());
            }
        };
        self.media = Some(MediaController::new(stream));

        let id = match self.provider.create_identity().await {
            Ok(id) => id,
            Err(err) => {
                error!("identity acquisition failed: {err}");
                if let Some(media) = &mut self.media {
                    media.release();
                }
                self.phase = SessionPhase::Failed;
                return Err(err.into());
            }
        };

        info!(%id, "session ready");
        self.aggregator = Some(TranscriptAggregator::new(
            id.clone(),
            self.config.caption_timeout,
        ));
        self.local_id = Some(id.clone());
        self.phase = SessionPhase::Ready;
        Ok(id)
    }

    /// Places an outbound call: opens the media call and the data channel to
    /// the same target. The session connects once the remote stream arrives.
    pub async fn call(&mut self, target: &ParticipantId) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::InvalidState("call"));
        }
        let media = self
            .media
            .as_ref()
            .ok_or(SessionError::InvalidState("call"))?;

        info!(%target, "calling peer");
        self.provider.call(target, media.stream()).await?;
        let link = self.provider.connect(target).await?;
        self.link = Some(link);
        self.remote_id = Some(target.clone());
        self.phase = SessionPhase::Connecting;
        Ok(())
    }

    /// Runs the event loop until the session ends or every event source
    /// closes.
    pub async fn run(&mut self) {
        while !matches!(self.phase, SessionPhase::Ended | SessionPhase::Failed) {
            enum Next {
                Provider(ProviderEvent),
                Recognizer(RecognizerEvent),
                Session(SessionEvent),
                Closed,
            }

            let next = tokio::select! {
                ev = self.provider_rx.recv() => ev.map(Next::Provider).unwrap_or(Next::Closed),
                ev = self.recognizer_rx.recv() => ev.map(Next::Recognizer).unwrap_or(Next::Closed),
                ev = self.events_rx.recv() => ev.map(Next::Session).unwrap_or(Next::Closed),
            };

            match next {
                Next::Provider(ev) => self.on_provider(ev).await,
                Next::Recognizer(ev) => self.on_recognizer(ev).await,
                Next::Session(ev) => self.on_session(ev).await,
                Next::Closed => break,
            }
        }
    }

    /// Drains every event already queued, without waiting for more. Lets
    /// tests and the demo step the session deterministically.
    pub async fn pump(&mut self) {
        loop {
            let mut handled = false;
            while let Ok(ev) = self.provider_rx.try_recv() {
                handled = true;
                self.on_provider(ev).await;
            }
            while let Ok(ev) = self.recognizer_rx.try_recv() {
                handled = true;
                self.on_recognizer(ev).await;
            }
            while let Ok(ev) = self.events_rx.try_recv() {
                handled = true;
                self.on_session(ev).await;
            }
            if !handled {
                break;
            }
        }
    }

    async fn on_session(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CaptionExpired { side, token } => {
                if let Some(agg) = &mut self.aggregator {
                    if agg.expire_caption(side, token) {
                        debug!(?side, "caption expired");
                    }
                }
            }
            SessionEvent::StartRecognition => {
                if let Err(err) = self.recognizer.start().await {
                    warn!("failed to start recognition: {err}");
                }
            }
            SessionEvent::StopRecognition => self.recognizer.stop().await,
            SessionEvent::HangUp => self.end().await,
        }
    }

    /// True when `peer` may start a call with this session: the slot is free
    /// or already belongs to the same peer, and we are not mid-call elsewhere.
    fn accepts_peer(&self, peer: &ParticipantId) -> bool {
        let phase_ok = matches!(self.phase, SessionPhase::Ready | SessionPhase::AwaitingPeer);
        let peer_ok = self
            .remote_id
            .as_ref()
            .map(|current| current == peer)
            .unwrap_or(true);
        phase_ok && peer_ok
    }

    /// True when `peer` may attach its data connection. The media call, the
    /// answer, and the remote stream can all complete before the data
    /// connection arrives, so the current peer is admitted in any in-call
    /// phase as long as the link slot is still empty.
    fn accepts_link(&self, peer: &ParticipantId) -> bool {
        let phase_ok = matches!(
            self.phase,
            SessionPhase::Ready
                | SessionPhase::AwaitingPeer
                | SessionPhase::Connecting
                | SessionPhase::Connected
        );
        let peer_ok = self
            .remote_id
            .as_ref()
            .map(|current| current == peer)
            .unwrap_or(true);
        self.link.is_none() && phase_ok && peer_ok
    }

    async fn on_provider(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::IncomingConnection(link) => {
                let peer = link.peer().clone();
                if !self.accepts_link(&peer) {
                    // Only one active peer is supported; a second inbound
                    // request is rejected, not queued.
                    warn!(%peer, "rejecting data connection, session already has a peer");
                    return;
                }
                info!(%peer, "data connection received");
                self.link = Some(link);
                self.remote_id = Some(peer);
                if self.phase == SessionPhase::Ready {
                    self.phase = SessionPhase::AwaitingPeer;
                }
            }
            ProviderEvent::IncomingCall { from } => {
                if !self.accepts_peer(&from) {
                    warn!(peer = %from, "rejecting media call, session already has a peer");
                    return;
                }
                let Some(media) = self.media.as_ref() else {
                    warn!(peer = %from, "no capture stream, cannot answer call");
                    return;
                };
                info!(peer = %from, "answering media call");
                if let Err(err) = self.provider.answer(&from, media.stream()).await {
                    warn!(peer = %from, "failed to answer call: {err}");
                    return;
                }
                self.remote_id = Some(from);
                self.phase = SessionPhase::AwaitingPeer;
            }
            ProviderEvent::RemoteStream { from } => {
                let expected = self.remote_id.as_ref() == Some(&from);
                let connecting = matches!(
                    self.phase,
                    SessionPhase::AwaitingPeer | SessionPhase::Connecting
                );
                if expected && connecting {
                    info!(peer = %from, "remote stream arrived, call connected");
                    self.phase = SessionPhase::Connected;
                } else {
                    debug!(peer = %from, phase = ?self.phase, "ignoring unexpected remote stream");
                }
            }
            ProviderEvent::LinkOpened => {
                if let Some(link) = &mut self.link {
                    link.mark_open();
                }
            }
            ProviderEvent::LinkData(raw) => {
                let Some(link) = &self.link else {
                    debug!("discarding data frame, no link attached");
                    return;
                };
                if let Some(entry) = link.accept(&raw) {
                    if let Some(agg) = &mut self.aggregator {
                        let reset = agg.record_remote(entry);
                        self.arm_caption_timer(reset);
                    }
                }
            }
            ProviderEvent::LinkClosed => {
                info!("peer link lost, ending session");
                self.end().await;
            }
        }
    }

    async fn on_recognizer(&mut self, event: RecognizerEvent) {
        match event {
            RecognizerEvent::Interim(text) => {
                if let Some(agg) = &mut self.aggregator {
                    agg.set_interim(&text);
                }
            }
            RecognizerEvent::Final(text) => {
                if let Err(err) = self.record_local(&text) {
                    warn!("discarding final recognizer segment: {err}");
                }
            }
            RecognizerEvent::Error(message) => {
                warn!("speech recognition error: {message}");
                self.recognizer.mark_stopped();
            }
        }
    }

    /// Appends a finalized local utterance and broadcasts it to the peer.
    ///
    /// The local append always happens first; a link that is missing or not
    /// open makes the broadcast an observable failure, never a rollback.
    pub fn record_local(&mut self, text: &str) -> Result<TranscriptEntry, SessionError> {
        let agg = self
            .aggregator
            .as_mut()
            .ok_or(SessionError::InvalidState("record"))?;
        let (entry, reset) = agg.record_local(text)?;
        self.arm_caption_timer(reset);

        match &self.link {
            Some(link) => {
                if let Err(err) = link.send(&entry) {
                    warn!("transcript kept locally, not delivered: {err}");
                }
            }
            None => warn!("no data link, transcript kept locally only"),
        }
        Ok(entry)
    }

    fn arm_caption_timer(&self, reset: CaptionReset) {
        let tx = self.events_tx.clone();
        let CaptionReset { side, token, after } = reset;
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Stale tokens are ignored by the aggregator; a send after
            // teardown just lands in a closed queue.
            tx.send(SessionEvent::CaptionExpired { side, token }).ok();
        });
    }

    pub async fn start_recognition(&mut self) -> Result<(), RecognizerError> {
        self.recognizer.start().await
    }

    pub async fn stop_recognition(&mut self) {
        self.recognizer.stop().await;
    }

    /// Switches recognition to a new language tag. Pending interim text is
    /// discarded; it was never going to be persisted.
    pub async fn set_language(&mut self, tag: &str) -> Result<(), RecognizerError> {
        if let Some(agg) = &mut self.aggregator {
            agg.discard_interim();
        }
        self.recognizer.set_language(tag).await
    }

    /// Flips local audio tracks; `None` before media is acquired.
    pub fn toggle_audio(&mut self) -> Option<bool> {
        self.media.as_mut().map(|media| media.toggle_audio())
    }

    /// Flips local video tracks; `None` before media is acquired.
    pub fn toggle_video(&mut self) -> Option<bool> {
        self.media.as_mut().map(|media| media.toggle_video())
    }

    /// Terminal teardown: releases the capture stream, the data link, and
    /// the provider handle exactly once, and invalidates pending caption
    /// countdowns. Safe to call any number of times, from any phase.
    pub async fn end(&mut self) {
        if self.phase == SessionPhase::Ended {
            return;
        }
        info!("ending session");
        self.recognizer.stop().await;
        if let Some(agg) = &mut self.aggregator {
            agg.cancel_timers();
            agg.discard_interim();
        }
        if let Some(link) = &mut self.link {
            link.close();
        }
        self.link = None;
        if let Some(media) = &mut self.media {
            media.release();
        }
        self.provider.destroy();
        self.phase = SessionPhase::Ended;
    }
}
