use crate::transcript::DEFAULT_CAPTION_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one call session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// BCP 47 tag recognition starts in (e.g. "en-US").
    pub language: String,

    /// Quiet period before a displayed caption clears.
    /// Default: 3 seconds
    pub caption_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            caption_timeout: DEFAULT_CAPTION_TIMEOUT,
        }
    }
}
