use async_trait::async_trait;
use std::time::Duration;

use super::AudioError;
use crate::config::AudioConfig;

/// Text-to-speech backend producing MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AudioError>;
}

/// Client for a translate-TTS style HTTP endpoint.
pub struct HttpSpeechSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

impl HttpSpeechSynthesizer {
    pub fn new(
        endpoint: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AudioError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            language: language.into(),
        })
    }

    pub fn from_config(config: &AudioConfig) -> Result<Self, AudioError> {
        Self::new(
            config.endpoint.clone(),
            config.language.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AudioError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AudioError::EmptyAudio);
        }
        Ok(bytes.to_vec())
    }
}
