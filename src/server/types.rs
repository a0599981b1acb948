use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioNarrator, AudioStore};
use crate::model::ChurnLabel;
use crate::service::PredictionService;

/// Header carrying the URL path of the spoken summary.
pub const AUDIO_HEADER: &str = "x-audio-file";

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    pub narrator: Option<AudioNarrator>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn audio_store(&self) -> Option<&AudioStore> {
        self.narrator.as_ref().map(AudioNarrator::store)
    }
}

// --- DTOs (Data Transfer Objects) ---

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PredictResponse {
    #[serde(rename = "Prediction")]
    pub prediction: String,
    pub status: String,
}

impl PredictResponse {
    pub fn success(label: ChurnLabel) -> Self {
        Self {
            prediction: label.as_str().to_string(),
            status: "success".to_string(),
        }
    }
}
