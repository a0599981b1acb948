//! Shared fixtures for unit and router tests.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ModelError;
use crate::model::forest::{Node, Tree};
use crate::model::{ChurnLabel, Classifier, InferenceContext, RandomForest};
use crate::preprocessing::{EncoderTable, FeatureVector, Vocabulary, FIELD_COUNT};

/// The reference customer from the API smoke test.
pub fn sample_body() -> Value {
    json!({
        "gender": "Female",
        "SeniorCitizen": 0,
        "Partner": "Yes",
        "Dependents": "No",
        "tenure": 1,
        "PhoneService": "No",
        "MultipleLines": "No phone service",
        "InternetService": "DSL",
        "OnlineSecurity": "No",
        "OnlineBackup": "Yes",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "No",
        "StreamingMovies": "No",
        "Contract": "Month-to-month",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Electronic check",
        "MonthlyCharges": 29.85,
        "TotalCharges": 29.85
    })
}

pub fn standard_encoders() -> EncoderTable {
    let yes_no = ["No", "Yes"];
    let internet_addon = ["No", "No internet service", "Yes"];
    let vocabularies: Vec<(&str, Vec<&str>)> = vec![
        ("gender", vec!["Female", "Male"]),
        ("Partner", yes_no.to_vec()),
        ("Dependents", yes_no.to_vec()),
        ("PhoneService", yes_no.to_vec()),
        ("MultipleLines", vec!["No", "No phone service", "Yes"]),
        ("InternetService", vec!["DSL", "Fiber optic", "No"]),
        ("OnlineSecurity", internet_addon.to_vec()),
        ("OnlineBackup", internet_addon.to_vec()),
        ("DeviceProtection", internet_addon.to_vec()),
        ("TechSupport", internet_addon.to_vec()),
        ("StreamingTV", internet_addon.to_vec()),
        ("StreamingMovies", internet_addon.to_vec()),
        ("Contract", vec!["Month-to-month", "One year", "Two year"]),
        ("PaperlessBilling", yes_no.to_vec()),
        (
            "PaymentMethod",
            vec![
                "Bank transfer (automatic)",
                "Credit card (automatic)",
                "Electronic check",
                "Mailed check",
            ],
        ),
    ];

    let mut table = EncoderTable::new();
    for (field, classes) in vocabularies {
        table.insert(field, Vocabulary::from_classes(classes).unwrap());
    }
    table
}

/// One tree: month-to-month customers with tenure <= 12.5 churn.
pub fn churn_forest() -> RandomForest {
    let tree = Tree {
        nodes: vec![
            Node::Split {
                feature: 14,
                threshold: 0.5,
                left: 1,
                right: 4,
            },
            Node::Split {
                feature: 4,
                threshold: 12.5,
                left: 2,
                right: 3,
            },
            Node::Leaf { value: [0.3, 0.7] },
            Node::Leaf { value: [0.8, 0.2] },
            Node::Leaf { value: [0.9, 0.1] },
        ],
    };
    RandomForest::new(FIELD_COUNT, vec![tree]).unwrap()
}

/// All-zero vector with the given `(column, value)` overrides.
pub fn vector_with(overrides: &[(usize, f64)]) -> FeatureVector {
    let mut values = vec![0.0; FIELD_COUNT];
    for &(column, value) in overrides {
        values[column] = value;
    }
    FeatureVector::new(values).unwrap()
}

pub fn forest_context() -> Arc<InferenceContext> {
    Arc::new(InferenceContext::new(
        Box::new(churn_forest()),
        standard_encoders(),
    ))
}

pub fn context_with(classifier: impl Classifier + 'static) -> Arc<InferenceContext> {
    Arc::new(InferenceContext::new(
        Box::new(classifier),
        standard_encoders(),
    ))
}

/// Always answers with the same label and counts its calls.
#[derive(Clone)]
pub struct FixedClassifier {
    pub label: ChurnLabel,
    pub calls: Arc<AtomicUsize>,
}

impl FixedClassifier {
    pub fn new(label: ChurnLabel) -> Self {
        Self {
            label,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<ChurnLabel, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.label)
    }
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<ChurnLabel, ModelError> {
        Err(ModelError::UnsupportedClass(3))
    }
}

pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<ChurnLabel, ModelError> {
        panic!("backend exploded")
    }
}
