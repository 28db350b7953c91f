use super::{RecognizerEvent, RecognizerFactory, SpeechRecognizer};
use crate::error::RecognizerError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Recognizer that replays a fixed script of utterances when started.
///
/// Stands in for a real engine in tests and demos: each scripted line is
/// emitted as a truncated interim hypothesis followed by the final text.
pub struct ScriptedRecognizer {
    language: String,
    script: Vec<String>,
    events: mpsc::UnboundedSender<RecognizerEvent>,
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(&mut self) -> Result<(), RecognizerError> {
        for line in self.script.drain(..) {
            let cut = line.chars().count() / 2;
            if cut > 0 {
                let partial: String = line.chars().take(cut).collect();
                self.events.send(RecognizerEvent::Interim(partial)).ok();
            }
            self.events.send(RecognizerEvent::Final(line)).ok();
        }
        Ok(())
    }

    async fn stop(&mut self) {}

    fn language(&self) -> &str {
        &self.language
    }
}

/// Factory producing [`ScriptedRecognizer`]s that all replay the same script.
pub struct ScriptedRecognizerFactory {
    script: Vec<String>,
}

impl ScriptedRecognizerFactory {
    pub fn new(script: Vec<String>) -> Self {
        Self { script }
    }

    /// A factory whose recognizers emit nothing until fed externally.
    pub fn silent() -> Self {
        Self { script: Vec::new() }
    }
}

impl RecognizerFactory for ScriptedRecognizerFactory {
    fn create(
        &self,
        language: &str,
        events: mpsc::UnboundedSender<RecognizerEvent>,
    ) -> Box<dyn SpeechRecognizer> {
        Box::new(ScriptedRecognizer {
            language: language.to_string(),
            script: self.script.clone(),
            events,
        })
    }
}
