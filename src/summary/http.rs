use super::{Summarizer, SummaryRequest, SummaryResponse};
use crate::error::ServiceError;
use async_trait::async_trait;

/// Summarizer client for a hosted HTTP service speaking the
/// `{text, languageHint}` / `{summary} | {errorMessage}` contract.
pub struct HttpSummarizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSummarizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| ServiceError {
                message: err.to_string(),
            })?;

        let body: SummaryResponse = response.json().await.map_err(|err| ServiceError {
            message: err.to_string(),
        })?;

        match body {
            SummaryResponse::Summary { summary } => Ok(summary),
            SummaryResponse::Error { error_message } => Err(ServiceError {
                message: error_message,
            }),
        }
    }
}
