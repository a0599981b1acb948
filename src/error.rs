use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can end a `/predict` request early.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("No data provided")]
    MissingBody,

    /// The body could not be read at all (too large, broken stream).
    #[error("{}", .0.body_text())]
    BodyRejected(#[from] BytesRejection),

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid numeric value in {field}")]
    InvalidNumeric { field: String },

    #[error("Invalid value in {field}: previously unseen label '{value}'")]
    UnknownCategory { field: String, value: String },

    #[error("Error: {0}")]
    Internal(#[from] ModelError),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::BodyRejected(rejection) => rejection.status(),
            PredictError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

/// JSON error envelope shared by every endpoint.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    pub status: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        message: message.into(),
        status: "error".to_string(),
    });

    (status, body).into_response()
}

/// Faults raised while running the classifier itself.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("feature vector has {got} values, model expects {expected}")]
    FeatureCount { expected: usize, got: usize },

    #[error("model returned unsupported class {0}")]
    UnsupportedClass(i64),

    #[error("model produced no output")]
    EmptyOutput,

    #[error("tree {0} could not be evaluated")]
    CorruptTree(usize),

    #[error("inference panicked: {0}")]
    Panicked(String),

    #[error("model session lock poisoned")]
    Poisoned,

    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] ort::Error),
}

/// Faults raised while loading the persisted model and encoder artifacts.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Artifact not found at path: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid encoder table: {0}")]
    InvalidEncoders(String),

    #[error("ONNX models require the `onnx` feature")]
    OnnxUnavailable,

    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] ort::Error),
}
