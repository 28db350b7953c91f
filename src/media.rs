//! Local capture stream ownership and track toggles.

use crate::error::AcquisitionError;
use async_trait::async_trait;
use tracing::info;

/// Opaque stand-in for the local audio/video capture stream.
#[derive(Debug)]
pub struct LocalStream {
    audio_enabled: bool,
    video_enabled: bool,
    released: bool,
}

impl LocalStream {
    pub fn new() -> Self {
        Self {
            audio_enabled: true,
            video_enabled: true,
            released: false,
        }
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }
}

impl Default for LocalStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability that produces the local capture stream. Failure here is fatal
/// to session start.
#[async_trait]
pub trait MediaSource: Send {
    async fn open(&mut self) -> Result<LocalStream, AcquisitionError>;
}

/// Capture source for environments without real devices: always succeeds
/// with a fresh stream. Used by tests and the demo binary.
pub struct SyntheticMediaSource;

#[async_trait]
impl MediaSource for SyntheticMediaSource {
    async fn open(&mut self) -> Result<LocalStream, AcquisitionError> {
        Ok(LocalStream::new())
    }
}

/// Owns the local capture stream for one session and exposes the mute
/// toggles for its tracks.
#[derive(Debug)]
pub struct MediaController {
    stream: LocalStream,
}

impl MediaController {
    pub fn new(stream: LocalStream) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &LocalStream {
        &self.stream
    }

    /// Flips the audio tracks and returns the new enabled state.
    pub fn toggle_audio(&mut self) -> bool {
        self.stream.audio_enabled = !self.stream.audio_enabled;
        self.stream.audio_enabled
    }

    /// Flips the video tracks and returns the new enabled state.
    pub fn toggle_video(&mut self) -> bool {
        self.stream.video_enabled = !self.stream.video_enabled;
        self.stream.video_enabled
    }

    /// Stops all tracks. Idempotent: repeated calls do nothing.
    pub fn release(&mut self) {
        if self.stream.released {
            return;
        }
        info!("releasing capture stream");
        self.stream.audio_enabled = false;
        self.stream.video_enabled = false;
        self.stream.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.stream.released
    }
}
