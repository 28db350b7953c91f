use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub session: SessionSettings,
    pub summarizer: SummarizerSettings,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub language: String,
    pub caption_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct SummarizerSettings {
    pub endpoint: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            language: self.session.language.clone(),
            caption_timeout: Duration::from_millis(self.session.caption_timeout_ms),
        }
    }
}
