// Tests for recognizer language reconfiguration and the retry-once rule.

use async_trait::async_trait;
use call_captions::{
    RecognizerAdapter, RecognizerError, RecognizerEvent, RecognizerFactory,
    ScriptedRecognizerFactory, SpeechRecognizer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct ProbeRecognizer {
    language: String,
    starts: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
}

#[async_trait]
impl SpeechRecognizer for ProbeRecognizer {
    async fn start(&mut self) -> Result<(), RecognizerError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(RecognizerError::Start("engine busy".to_string()));
        }
        Ok(())
    }

    async fn stop(&mut self) {}

    fn language(&self) -> &str {
        &self.language
    }
}

/// Factory that counts instances and can be told to fail the next N starts.
struct ProbeFactory {
    created: Arc<AtomicUsize>,
    starts: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
}

impl ProbeFactory {
    fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let starts = Arc::new(AtomicUsize::new(0));
        let failures_left = Arc::new(AtomicUsize::new(0));
        (
            Self {
                created: Arc::clone(&created),
                starts: Arc::clone(&starts),
                failures_left: Arc::clone(&failures_left),
            },
            created,
            starts,
            failures_left,
        )
    }
}

impl RecognizerFactory for ProbeFactory {
    fn create(
        &self,
        language: &str,
        _events: mpsc::UnboundedSender<RecognizerEvent>,
    ) -> Box<dyn SpeechRecognizer> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(ProbeRecognizer {
            language: language.to_string(),
            starts: Arc::clone(&self.starts),
            failures_left: Arc::clone(&self.failures_left),
        })
    }
}

#[tokio::test]
async fn test_language_change_rebuilds_and_restarts() {
    let (factory, created, starts, _failures) = ProbeFactory::new();
    let (mut adapter, _rx) = RecognizerAdapter::new(Box::new(factory), "en-US");
    assert_eq!(created.load(Ordering::SeqCst), 1);

    adapter.start().await.unwrap();
    assert!(adapter.is_listening());

    adapter.set_language("hi-IN").await.unwrap();
    assert_eq!(adapter.language(), "hi-IN");
    assert!(adapter.is_listening(), "was listening, so it resumes");
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_eq!(starts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_language_change_while_stopped_stays_stopped() {
    let (factory, created, starts, _failures) = ProbeFactory::new();
    let (mut adapter, _rx) = RecognizerAdapter::new(Box::new(factory), "en-US");

    adapter.set_language("kn-IN").await.unwrap();
    assert_eq!(adapter.language(), "kn-IN");
    assert!(!adapter.is_listening());
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_eq!(starts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_same_language_is_a_noop() {
    let (factory, created, _starts, _failures) = ProbeFactory::new();
    let (mut adapter, _rx) = RecognizerAdapter::new(Box::new(factory), "en-US");

    adapter.set_language("en-US").await.unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_restart_failure_retries_exactly_once() {
    let (factory, created, starts, failures) = ProbeFactory::new();
    let (mut adapter, _rx) = RecognizerAdapter::new(Box::new(factory), "en-US");
    adapter.start().await.unwrap();

    // First restart attempt fails, the single retry succeeds.
    failures.store(1, Ordering::SeqCst);
    adapter.set_language("hi-IN").await.unwrap();
    assert!(adapter.is_listening());
    assert_eq!(created.load(Ordering::SeqCst), 3); // initial + rebuild + retry
    assert_eq!(starts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_double_restart_failure_leaves_recognition_stopped() {
    let (factory, _created, _starts, failures) = ProbeFactory::new();
    let (mut adapter, _rx) = RecognizerAdapter::new(Box::new(factory), "en-US");
    adapter.start().await.unwrap();

    failures.store(2, Ordering::SeqCst);
    let err = adapter.set_language("hi-IN").await.unwrap_err();
    assert!(matches!(err, RecognizerError::Unavailable(_)));
    assert!(!adapter.is_listening());
    // The language switch itself stuck; only listening was lost.
    assert_eq!(adapter.language(), "hi-IN");
}

#[tokio::test]
async fn test_scripted_interim_splits_on_characters() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let factory = ScriptedRecognizerFactory::new(vec!["नमस्ते".to_string()]);
    let mut recognizer = factory.create("hi-IN", tx);
    recognizer.start().await.unwrap();

    // Six characters, eighteen bytes: the interim hypothesis is the first
    // three characters, never a byte-level split.
    match rx.try_recv().unwrap() {
        RecognizerEvent::Interim(partial) => assert_eq!(partial, "नमस"),
        other => panic!("expected an interim hypothesis, got {other:?}"),
    }
    match rx.try_recv().unwrap() {
        RecognizerEvent::Final(text) => assert_eq!(text, "नमस्ते"),
        other => panic!("expected the final text, got {other:?}"),
    }
}
