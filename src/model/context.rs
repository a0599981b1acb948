use std::fmt;

use super::Classifier;
use crate::preprocessing::EncoderTable;

/// Model and encoder vocabularies, built once at startup and shared
/// read-only by every request.
pub struct InferenceContext {
    classifier: Box<dyn Classifier>,
    encoders: EncoderTable,
}

impl InferenceContext {
    pub fn new(classifier: Box<dyn Classifier>, encoders: EncoderTable) -> Self {
        Self {
            classifier,
            encoders,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoders(&self) -> &EncoderTable {
        &self.encoders
    }
}

impl fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceContext")
            .field("encoders", &self.encoders.len())
            .finish_non_exhaustive()
    }
}
