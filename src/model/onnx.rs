use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;

use super::{ChurnLabel, Classifier};
use crate::error::{LoadError, ModelError};
use crate::preprocessing::{FeatureVector, FIELD_COUNT};

/// Classifier exported to ONNX with a single float input of shape
/// `[1, FIELD_COUNT]`; the first output holds the int64 class label.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxClassifier {
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| LoadError::InvalidModel("ONNX model declares no inputs".to_string()))?;

        tracing::info!(
            path = %path.display(),
            input = %input_name,
            features = FIELD_COUNT,
            "Loaded ONNX model"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel, ModelError> {
        let batch = features.to_batch();
        let shape = batch.shape().to_vec();
        let data: Box<[f32]> = batch.iter().copied().collect();
        let input_value = Value::from_array((shape, data))?;

        let mut session = self.session.lock().map_err(|_| ModelError::Poisoned)?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>()?;
        let class = labels.first().copied().ok_or(ModelError::EmptyOutput)?;
        ChurnLabel::from_class(class)
    }
}
