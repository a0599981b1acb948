use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::audio::AudioError;
use crate::error::{error_response, PredictError};
use crate::server::types::*;

pub async fn home() -> &'static str {
    "Customer Churn App is Running"
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(HeaderMap, Json<PredictResponse>), PredictError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::info!(status = %rejection.status(), "Request body rejected");
            return Err(rejection.into());
        }
    };
    let label = state.service.predict(&body)?;

    // Awaited inline so the header only ever names a file that already exists.
    // A slow speech endpoint delays the response by at most `audio.timeout_ms`.
    let mut headers = HeaderMap::new();
    if let Some(narrator) = &state.narrator {
        if let Some(url) = narrator.narrate(label).await {
            match HeaderValue::from_str(&url) {
                Ok(value) => {
                    headers.insert(AUDIO_HEADER, value);
                }
                Err(_) => tracing::warn!(url = %url, "Audio URL is not a valid header value"),
            }
        }
    }

    Ok((headers, Json(PredictResponse::success(label))))
}

pub async fn get_audio(State(state): State<Arc<AppState>>, Path(filename): Path<String>) -> Response {
    let Some(store) = state.audio_store() else {
        return error_response(StatusCode::NOT_FOUND, "Audio file not found");
    };

    match store.read(&filename).await {
        Ok(audio) => ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response(),
        Err(AudioError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            error_response(StatusCode::NOT_FOUND, "Audio file not found")
        }
        Err(AudioError::InvalidName(_)) => {
            error_response(StatusCode::NOT_FOUND, "Audio file not found")
        }
        Err(error) => {
            tracing::error!(file = %filename, error = %error, "Failed to read audio file");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error: could not read audio file")
        }
    }
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
