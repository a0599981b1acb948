//! Classifier backends and the immutable inference context shared by every
//! request.

pub mod context;
pub mod forest;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::fmt;

use crate::error::ModelError;
use crate::preprocessing::FeatureVector;

pub use context::InferenceContext;
pub use forest::RandomForest;

/// Binary outcome of the churn classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChurnLabel {
    NoChurn,
    Churn,
}

impl ChurnLabel {
    pub fn from_class(class: i64) -> Result<Self, ModelError> {
        match class {
            0 => Ok(ChurnLabel::NoChurn),
            1 => Ok(ChurnLabel::Churn),
            other => Err(ModelError::UnsupportedClass(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChurnLabel::NoChurn => "No Churn",
            ChurnLabel::Churn => "Churn",
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trained binary classifier. Implementations are read-only after
/// construction and deterministic for a given vector.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(ChurnLabel::from_class(0).unwrap(), ChurnLabel::NoChurn);
        assert_eq!(ChurnLabel::from_class(1).unwrap(), ChurnLabel::Churn);
        assert!(matches!(
            ChurnLabel::from_class(2),
            Err(ModelError::UnsupportedClass(2))
        ));
    }

    #[test]
    fn test_label_text() {
        assert_eq!(ChurnLabel::Churn.to_string(), "Churn");
        assert_eq!(ChurnLabel::NoChurn.to_string(), "No Churn");
    }
}
