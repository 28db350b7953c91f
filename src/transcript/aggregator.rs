use super::caption::{CaptionReset, CaptionTimer};
use super::entry::{chronological, ParticipantId, Side, TranscriptEntry};
use crate::error::MalformedMessage;
use std::time::Duration;

/// One side's transient caption: the most recent utterance shown until its
/// quiet period elapses. Never persisted.
#[derive(Debug)]
struct CaptionSlot {
    text: Option<String>,
    /// True while the displayed text is an interim (not yet final) hypothesis.
    interim: bool,
    timer: CaptionTimer,
}

impl CaptionSlot {
    fn new(timeout: Duration) -> Self {
        Self {
            text: None,
            interim: false,
            timer: CaptionTimer::new(timeout),
        }
    }
}

/// Merges locally produced and remotely received transcript entries into one
/// append-only log and tracks the transient caption per side.
///
/// Single-writer per side: `record_local` is the only writer for the local
/// side, `record_remote` (fed by the data link in delivery order) for the
/// remote side. Past entries are never mutated or removed; summarization
/// relies on the log being complete.
pub struct TranscriptAggregator {
    local_id: ParticipantId,
    log: Vec<TranscriptEntry>,
    local: CaptionSlot,
    remote: CaptionSlot,
}

impl TranscriptAggregator {
    pub fn new(local_id: ParticipantId, caption_timeout: Duration) -> Self {
        Self {
            local_id,
            log: Vec::new(),
            local: CaptionSlot::new(caption_timeout),
            remote: CaptionSlot::new(caption_timeout),
        }
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    /// Records a finalized local utterance: validates it, stamps it with the
    /// current time, appends it, and replaces the local caption.
    ///
    /// Returns the entry (for broadcasting to the peer) together with the
    /// caption countdown to arm. The append happens regardless of whether the
    /// broadcast later succeeds.
    pub fn record_local(
        &mut self,
        text: &str,
    ) -> Result<(TranscriptEntry, CaptionReset), MalformedMessage> {
        let entry = TranscriptEntry::now(text, self.local_id.clone())?;
        self.log.push(entry.clone());
        let reset = Self::show(&mut self.local, Side::Local, &entry.text);
        Ok((entry, reset))
    }

    /// Records an entry received from the peer, keeping its producer-side
    /// timestamp, and replaces the remote caption. The local caption slot and
    /// its timer are untouched.
    pub fn record_remote(&mut self, entry: TranscriptEntry) -> CaptionReset {
        let reset = Self::show(&mut self.remote, Side::Remote, &entry.text);
        self.log.push(entry);
        reset
    }

    fn show(slot: &mut CaptionSlot, side: Side, text: &str) -> CaptionReset {
        slot.text = Some(text.to_string());
        slot.interim = false;
        CaptionReset {
            side,
            token: slot.timer.reset(),
            after: slot.timer.duration(),
        }
    }

    /// Updates the local caption with interim recognizer text. Display only:
    /// nothing is appended to the log and the caption timer is not reset.
    pub fn set_interim(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.local.text = Some(text.to_string());
        self.local.interim = true;
    }

    /// Drops interim text from the local caption, e.g. on a language change.
    /// Finalized captions stay.
    pub fn discard_interim(&mut self) {
        if self.local.interim {
            self.local.text = None;
            self.local.interim = false;
        }
    }

    /// Clears the side's caption if `token` still names its pending
    /// countdown. Stale tokens (the caption was replaced or cancelled in the
    /// meantime) do nothing.
    pub fn expire_caption(&mut self, side: Side, token: u64) -> bool {
        let slot = self.slot_mut(side);
        if !slot.timer.is_current(token) {
            return false;
        }
        slot.text = None;
        slot.interim = false;
        true
    }

    /// Invalidates both pending countdowns. Used at session teardown.
    pub fn cancel_timers(&mut self) {
        self.local.timer.cancel();
        self.remote.timer.cancel();
    }

    /// The caption currently displayed for a side, if any.
    pub fn caption(&self, side: Side) -> Option<&str> {
        self.slot(side).text.as_deref()
    }

    fn slot(&self, side: Side) -> &CaptionSlot {
        match side {
            Side::Local => &self.local,
            Side::Remote => &self.remote,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut CaptionSlot {
        match side {
            Side::Local => &mut self.local,
            Side::Remote => &mut self.remote,
        }
    }

    /// The full log in canonical chronological order (ascending by
    /// production timestamp). This is the one ordering used everywhere;
    /// see [`chronological`].
    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        chronological(&self.log)
    }

    /// Most-recent-first view for display. Purely derived from
    /// [`snapshot`](Self::snapshot), never a second source of truth.
    pub fn recent_first(&self) -> Vec<TranscriptEntry> {
        let mut entries = self.snapshot();
        entries.reverse();
        entries
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
