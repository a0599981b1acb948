//! The `/predict` pipeline: validate, coerce, encode, classify.

use metrics::{counter, histogram};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ModelError, PredictError};
use crate::model::{ChurnLabel, InferenceContext};
use crate::preprocessing::{self, schema, FeatureVector};

/// Last stage a request completed before it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Coerced,
    Encoded,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Coerced => "coerced",
            Stage::Encoded => "encoded",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PredictionService {
    context: Arc<InferenceContext>,
}

impl PredictionService {
    pub fn new(context: Arc<InferenceContext>) -> Self {
        Self { context }
    }

    /// Runs one request body through the whole pipeline. Each request either
    /// fully succeeds or fails at the first stage that rejects it.
    pub fn predict(&self, body: &[u8]) -> Result<ChurnLabel, PredictError> {
        let start = Instant::now();
        let result = self.run(body);
        histogram!("churn_prediction_duration_seconds").record(start.elapsed().as_secs_f64());

        match result {
            Ok(label) => {
                counter!("churn_predictions_total", "label" => label.as_str()).increment(1);
                tracing::info!(prediction = %label, "Prediction served");
                Ok(label)
            }
            Err((stage, error)) => {
                counter!("churn_prediction_failures_total", "stage" => stage.as_str())
                    .increment(1);
                match &error {
                    PredictError::Internal(_) => {
                        tracing::error!(stage = stage.as_str(), error = %error, "Prediction failed")
                    }
                    _ => {
                        tracing::info!(stage = stage.as_str(), error = %error, "Prediction rejected")
                    }
                }
                Err(error)
            }
        }
    }

    fn run(&self, body: &[u8]) -> Result<ChurnLabel, (Stage, PredictError)> {
        let at = |stage: Stage| move |e: PredictError| (stage, e);

        let parsed = schema::parse_body(body).map_err(at(Stage::Received))?;
        let record = preprocessing::validate(parsed).map_err(at(Stage::Received))?;
        tracing::debug!(fields = record.len(), "Record validated");

        let record = preprocessing::coerce(record, &preprocessing::numeric_fields())
            .map_err(at(Stage::Validated))?;
        tracing::debug!("Numeric fields coerced");

        let vector =
            preprocessing::encode(&record, self.context.encoders()).map_err(at(Stage::Coerced))?;
        tracing::debug!(columns = vector.len(), "Record encoded");

        self.classify(&vector).map_err(at(Stage::Encoded))
    }

    /// Runs the classifier, turning a panicking backend into an internal error.
    fn classify(&self, vector: &FeatureVector) -> Result<ChurnLabel, PredictError> {
        let classifier = self.context.classifier();
        match panic::catch_unwind(AssertUnwindSafe(|| classifier.predict(vector))) {
            Ok(result) => Ok(result?),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(ModelError::Panicked(message).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        context_with, forest_context, sample_body, FailingClassifier, FixedClassifier,
        PanickingClassifier,
    };
    use serde_json::json;

    fn body(value: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[test]
    fn test_sample_record_predicts() {
        let service = PredictionService::new(forest_context());
        let label = service.predict(&body(&sample_body())).unwrap();
        // month-to-month with tenure 1
        assert_eq!(label, ChurnLabel::Churn);
    }

    #[test]
    fn test_repeated_requests_are_stable() {
        let service = PredictionService::new(forest_context());
        let payload = body(&sample_body());
        let first = service.predict(&payload).unwrap();
        let second = service.predict(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_tenure_does_not_churn() {
        let service = PredictionService::new(forest_context());
        let mut record = sample_body();
        record["tenure"] = json!("48");
        record["Contract"] = json!("Two year");
        assert_eq!(service.predict(&body(&record)).unwrap(), ChurnLabel::NoChurn);
    }

    #[test]
    fn test_empty_body() {
        let service = PredictionService::new(forest_context());
        assert!(matches!(service.predict(b""), Err(PredictError::MissingBody)));
        assert!(matches!(service.predict(b"{}"), Err(PredictError::MissingBody)));
    }

    #[test]
    fn test_malformed_body() {
        let service = PredictionService::new(forest_context());
        assert!(matches!(
            service.predict(b"{\"gender\": "),
            Err(PredictError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_validation_runs_before_coercion() {
        let service = PredictionService::new(forest_context());
        let mut record = sample_body();
        record["TotalCharges"] = json!("");
        record.as_object_mut().unwrap().remove("gender");

        assert!(matches!(
            service.predict(&body(&record)),
            Err(PredictError::MissingColumns(_))
        ));
    }

    #[test]
    fn test_coercion_runs_before_encoding() {
        let service = PredictionService::new(forest_context());
        let mut record = sample_body();
        record["TotalCharges"] = json!("");
        record["InternetService"] = json!("Satellite");

        match service.predict(&body(&record)) {
            Err(PredictError::InvalidNumeric { field }) => assert_eq!(field, "TotalCharges"),
            other => panic!("Expected InvalidNumeric, got {:?}", other),
        }
    }

    #[test]
    fn test_classifier_not_called_on_rejection() {
        let classifier = FixedClassifier::new(ChurnLabel::Churn);
        let service = PredictionService::new(context_with(classifier.clone()));
        let mut record = sample_body();
        record["InternetService"] = json!("Satellite");

        assert!(service.predict(&body(&record)).is_err());
        assert_eq!(classifier.calls(), 0);

        assert!(service.predict(&body(&sample_body())).is_ok());
        assert_eq!(classifier.calls(), 1);
    }

    #[test]
    fn test_classifier_error_is_internal() {
        let service = PredictionService::new(context_with(FailingClassifier));
        let error = service.predict(&body(&sample_body())).unwrap_err();
        assert!(matches!(error, PredictError::Internal(_)));
        assert!(error.status_code().is_server_error());
    }

    #[test]
    fn test_classifier_panic_is_internal() {
        let service = PredictionService::new(context_with(PanickingClassifier));
        match service.predict(&body(&sample_body())) {
            Err(PredictError::Internal(ModelError::Panicked(message))) => {
                assert_eq!(message, "backend exploded")
            }
            other => panic!("Expected Panicked, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Received.as_str(), "received");
        assert_eq!(Stage::Encoded.as_str(), "encoded");
    }

    #[test]
    fn test_failures_counted_by_last_completed_stage() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let service = PredictionService::new(context_with(FailingClassifier));
        let mut unknown = sample_body();
        unknown["InternetService"] = json!("Satellite");

        metrics::with_local_recorder(&recorder, || {
            let _ = service.predict(b"");
            let _ = service.predict(&body(&unknown));
            let _ = service.predict(&body(&sample_body()));
        });

        let output = handle.render();
        assert!(output.contains("stage=\"received\""));
        assert!(output.contains("stage=\"coerced\""));
        assert!(output.contains("stage=\"encoded\""));
        assert!(!output.contains("stage=\"validated\""));
    }
}
