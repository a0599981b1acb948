use std::path::Path;

use super::{Classifier, InferenceContext, RandomForest};
use crate::config::{ModelConfig, ModelFormat};
use crate::error::LoadError;
use crate::preprocessing::EncoderTable;

fn read_artifact(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the per-field encoder vocabularies.
pub fn load_encoders(path: impl AsRef<Path>) -> Result<EncoderTable, LoadError> {
    let path = path.as_ref();
    let content = read_artifact(path)?;
    let table = EncoderTable::from_json(&content, &path.display().to_string())?;

    tracing::info!(path = %path.display(), fields = table.len(), "Loaded encoders");
    Ok(table)
}

/// Loads a random-forest model artifact.
pub fn load_forest(path: impl AsRef<Path>) -> Result<RandomForest, LoadError> {
    let path = path.as_ref();
    let content = read_artifact(path)?;
    let forest = RandomForest::from_json(&content, &path.display().to_string())?;

    tracing::info!(
        path = %path.display(),
        trees = forest.n_trees(),
        features = forest.n_features(),
        "Loaded forest model"
    );
    Ok(forest)
}

pub fn load_classifier(config: &ModelConfig) -> Result<Box<dyn Classifier>, LoadError> {
    match config.format {
        ModelFormat::Forest => Ok(Box::new(load_forest(&config.path)?)),
        #[cfg(feature = "onnx")]
        ModelFormat::Onnx => Ok(Box::new(super::onnx::OnnxClassifier::load(&config.path)?)),
        #[cfg(not(feature = "onnx"))]
        ModelFormat::Onnx => Err(LoadError::OnnxUnavailable),
    }
}

/// Builds the inference context. Any failure here must stop the process
/// before it starts serving.
pub fn load_context(config: &ModelConfig) -> Result<InferenceContext, LoadError> {
    let classifier = load_classifier(config)?;
    let encoders = load_encoders(&config.encoders_path)?;
    Ok(InferenceContext::new(classifier, encoders))
}
