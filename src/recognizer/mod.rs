//! Continuous speech recognition capability
//!
//! The engine itself is external; this module defines the capability trait,
//! the event stream it feeds, and the adapter that owns one engine instance
//! per session and handles language reconfiguration.

mod scripted;

pub use scripted::{ScriptedRecognizer, ScriptedRecognizerFactory};

use crate::error::RecognizerError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Text events emitted by a continuous recognizer.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// Hypothesis that may still change. Display only; never persisted.
    Interim(String),
    /// Finalized utterance text.
    Final(String),
    /// Engine-reported failure; recognition has stopped.
    Error(String),
}

/// One recognizer instance, bound to a single language tag for its lifetime.
/// Changing language means building a new instance.
#[async_trait]
pub trait SpeechRecognizer: Send {
    async fn start(&mut self) -> Result<(), RecognizerError>;
    async fn stop(&mut self);
    fn language(&self) -> &str;
}

/// Builds recognizer instances wired to the session's event channel.
pub trait RecognizerFactory: Send {
    fn create(
        &self,
        language: &str,
        events: mpsc::UnboundedSender<RecognizerEvent>,
    ) -> Box<dyn SpeechRecognizer>;
}

/// Per-session owner of the active recognizer instance.
///
/// Tracks whether recognition is listening and rebuilds the engine on a
/// language change: stop, discard the old instance, construct one for the
/// new tag, and resume if it was listening before. Interim text pending at
/// the moment of the change is the session's to discard; it was never going
/// to be persisted.
pub struct RecognizerAdapter {
    factory: Box<dyn RecognizerFactory>,
    events_tx: mpsc::UnboundedSender<RecognizerEvent>,
    recognizer: Box<dyn SpeechRecognizer>,
    language: String,
    listening: bool,
}

impl RecognizerAdapter {
    /// Builds the adapter and hands back the receiving end of its event
    /// channel for the session loop to consume.
    pub fn new(
        factory: Box<dyn RecognizerFactory>,
        language: &str,
    ) -> (Self, mpsc::UnboundedReceiver<RecognizerEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let recognizer = factory.create(language, events_tx.clone());
        (
            Self {
                factory,
                events_tx,
                recognizer,
                language: language.to_string(),
                listening: false,
            },
            events_rx,
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub async fn start(&mut self) -> Result<(), RecognizerError> {
        if self.listening {
            return Ok(());
        }
        self.recognizer.start().await?;
        self.listening = true;
        info!(language = %self.language, "recognition started");
        Ok(())
    }

    pub async fn stop(&mut self) {
        if !self.listening {
            return;
        }
        self.recognizer.stop().await;
        self.listening = false;
        info!("recognition stopped");
    }

    /// Marks recognition as stopped after an engine-reported error. The
    /// engine has already given up on its own.
    pub fn mark_stopped(&mut self) {
        self.listening = false;
    }

    /// Rebinds recognition to a new language tag.
    ///
    /// Stops the current instance, constructs a replacement for the new tag,
    /// and restarts it if it was listening. A restart failure gets one
    /// immediate retry with a fresh instance; failing that, recognition
    /// stays stopped and the error is surfaced.
    pub async fn set_language(&mut self, tag: &str) -> Result<(), RecognizerError> {
        if tag == self.language {
            return Ok(());
        }
        let was_listening = self.listening;
        self.recognizer.stop().await;
        self.listening = false;
        self.language = tag.to_string();
        self.recognizer = self.factory.create(tag, self.events_tx.clone());
        info!(language = %tag, "recognizer rebuilt for new language");

        if !was_listening {
            return Ok(());
        }
        if let Err(first) = self.recognizer.start().await {
            warn!("recognizer restart failed, retrying once: {first}");
            self.recognizer = self.factory.create(tag, self.events_tx.clone());
            if let Err(second) = self.recognizer.start().await {
                return Err(RecognizerError::Unavailable(second.to_string()));
            }
        }
        self.listening = true;
        Ok(())
    }
}
