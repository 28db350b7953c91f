// Tests for summary requests: formatting, short-circuit, and failure
// propagation.

use async_trait::async_trait;
use call_captions::{
    ParticipantId, ServiceError, Summarizer, SummaryRequest, SummaryRequester, SummaryResponse,
    TranscriptEntry, NOTHING_TO_SUMMARIZE,
};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct FakeService {
    calls: AtomicUsize,
    last_request: Mutex<Option<SummaryRequest>>,
    fail: bool,
}

impl FakeService {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            fail,
        })
    }
}

#[async_trait]
impl Summarizer for FakeService {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        if self.fail {
            return Err(ServiceError {
                message: "model overloaded".to_string(),
            });
        }
        Ok("a short meeting".to_string())
    }
}

fn entries(texts: &[&str]) -> Vec<TranscriptEntry> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            TranscriptEntry::at(
                *text,
                ParticipantId::from("p"),
                Utc::now() + ChronoDuration::seconds(i as i64),
            )
            .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_empty_transcript_short_circuits() {
    let service = FakeService::new(false);
    let requester = SummaryRequester::new(service.clone());

    let result = requester.summarize(&[], "English").await.unwrap();
    assert_eq!(result, NOTHING_TO_SUMMARIZE);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_entries_joined_with_single_spaces() {
    let service = FakeService::new(false);
    let requester = SummaryRequester::new(service.clone());

    let summary = requester
        .summarize(&entries(&["hello", "hi there", "goodbye"]), "English")
        .await
        .unwrap();
    assert_eq!(summary, "a short meeting");

    let request = service.last_request.lock().unwrap().take().unwrap();
    assert_eq!(request.text, "hello hi there goodbye");
    assert_eq!(request.language_hint, "English");
}

#[tokio::test]
async fn test_service_failure_surfaces_without_retry() {
    let service = FakeService::new(true);
    let requester = SummaryRequester::new(service.clone());

    let err = requester
        .summarize(&entries(&["something"]), "Hindi")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("model overloaded"));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_request_wire_shape() {
    let request = SummaryRequest {
        text: "hello world".to_string(),
        language_hint: "English".to_string(),
    };
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"languageHint\":\"English\""));
    assert!(json.contains("\"text\":\"hello world\""));
}

#[test]
fn test_response_parses_both_shapes() {
    let ok: SummaryResponse = serde_json::from_str(r#"{"summary":"short"}"#).unwrap();
    assert!(matches!(ok, SummaryResponse::Summary { summary } if summary == "short"));

    let err: SummaryResponse = serde_json::from_str(r#"{"errorMessage":"quota"}"#).unwrap();
    assert!(matches!(
        err,
        SummaryResponse::Error { error_message } if error_message == "quota"
    ));
}
