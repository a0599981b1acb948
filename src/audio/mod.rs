//! Best-effort spoken summary of a prediction. Nothing in here may fail a
//! `/predict` request.

pub mod store;
pub mod synth;

use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

use crate::model::ChurnLabel;

pub use store::AudioStore;
pub use synth::{HttpSpeechSynthesizer, SpeechSynthesizer};

/// Route prefix under which stored clips are served.
pub const AUDIO_ROUTE: &str = "/get_audio";

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Speech request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Audio storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Speech service returned no audio")]
    EmptyAudio,

    #[error("Invalid audio file name: {0}")]
    InvalidName(String),
}

pub fn spoken_text(label: ChurnLabel) -> &'static str {
    match label {
        ChurnLabel::Churn => "The customer is likely to churn.",
        ChurnLabel::NoChurn => "The customer is not likely to churn.",
    }
}

/// Synthesizes a clip for a label and stores it under a per-request name.
#[derive(Clone)]
pub struct AudioNarrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: AudioStore,
}

impl AudioNarrator {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: AudioStore) -> Self {
        Self { synthesizer, store }
    }

    pub fn store(&self) -> &AudioStore {
        &self.store
    }

    /// Returns the URL path of the stored clip, or `None` when synthesis or
    /// storage failed. Failures are logged and counted, never propagated.
    pub async fn narrate(&self, label: ChurnLabel) -> Option<String> {
        match self.try_narrate(label).await {
            Ok(filename) => Some(format!("{}/{}", AUDIO_ROUTE, filename)),
            Err(error) => {
                counter!("churn_audio_failures_total").increment(1);
                tracing::warn!(error = %error, "Audio synthesis skipped");
                None
            }
        }
    }

    async fn try_narrate(&self, label: ChurnLabel) -> Result<String, AudioError> {
        let audio = self.synthesizer.synthesize(spoken_text(label)).await?;
        if audio.is_empty() {
            return Err(AudioError::EmptyAudio);
        }
        self.store.save(&audio).await
    }
}
