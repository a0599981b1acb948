pub mod audio;
pub mod config;
pub mod error;
pub mod model;
pub mod preprocessing;
pub mod server;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod test_support;

// Re-export common types
pub use error::{LoadError, ModelError, PredictError};
pub use model::{ChurnLabel, Classifier, InferenceContext};
pub use service::PredictionService;
