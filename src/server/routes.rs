use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::audio::AudioNarrator;
use crate::model::InferenceContext;
use crate::server::handlers;
use crate::server::types::{AppState, AUDIO_HEADER};
use crate::service::PredictionService;

pub fn create_router(
    context: Arc<InferenceContext>,
    narrator: Option<AudioNarrator>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let state = Arc::new(AppState {
        service: PredictionService::new(context),
        narrator,
        metrics: metrics_handle,
    });

    // Browser clients are served from another origin and read the audio header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(AUDIO_HEADER)]);

    Router::new()
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict))
        .route("/get_audio/:filename", get(handlers::get_audio))
        .route("/metrics", get(handlers::metrics))
        .layer(cors)
        .with_state(state)
}
