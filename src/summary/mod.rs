//! On-demand transcript summarization
//!
//! The hosted summarization service is external; this module formats the
//! chronological transcript for it and surfaces its answer or failure as-is.
//! One attempt per request, no retry. A result arriving after the caller
//! lost interest is simply dropped with the future that carried it.

mod http;

pub use http::HttpSummarizer;

use crate::error::ServiceError;
use crate::transcript::TranscriptEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Fixed result for a transcript with nothing in it; the service is not
/// contacted in that case.
pub const NOTHING_TO_SUMMARIZE: &str = "No subtitles recorded to summarize.";

/// Request body for the summarization service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    #[serde(rename = "languageHint")]
    pub language_hint: String,
}

/// Service response: either a summary or an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryResponse {
    Summary { summary: String },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

/// The external summarization capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, ServiceError>;
}

/// Formats the merged transcript and forwards it to the summarization
/// service.
pub struct SummaryRequester {
    service: Arc<dyn Summarizer>,
}

impl SummaryRequester {
    pub fn new(service: Arc<dyn Summarizer>) -> Self {
        Self { service }
    }

    /// Joins the chronological snapshot with single spaces and requests a
    /// summary. A blank transcript short-circuits to
    /// [`NOTHING_TO_SUMMARIZE`] without touching the service; a service
    /// failure is surfaced verbatim.
    pub async fn summarize(
        &self,
        entries: &[TranscriptEntry],
        language_hint: &str,
    ) -> Result<String, ServiceError> {
        let text = entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Ok(NOTHING_TO_SUMMARIZE.to_string());
        }

        info!(entries = entries.len(), "requesting summary");
        self.service
            .summarize(SummaryRequest {
                text,
                language_hint: language_hint.to_string(),
            })
            .await
    }
}
