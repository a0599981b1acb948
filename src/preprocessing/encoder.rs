use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::numeric::parse_number;
use super::{schema, FeatureVector, Record, FIELDS};
use crate::error::{LoadError, PredictError};

/// Fixed label → code mapping for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    codes: HashMap<String, u32>,
}

impl Vocabulary {
    /// Codes follow list position, the layout of a fitted label encoder's classes.
    pub fn from_classes<I, S>(classes: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes = HashMap::new();
        for (code, label) in classes.into_iter().enumerate() {
            let label = label.into();
            if codes.insert(label.clone(), code as u32).is_some() {
                return Err(format!("duplicate label '{}'", label));
            }
        }
        Self::from_codes(codes)
    }

    pub fn from_codes(codes: HashMap<String, u32>) -> Result<Self, String> {
        if codes.is_empty() {
            return Err("empty vocabulary".to_string());
        }
        Ok(Self { codes })
    }

    pub fn code(&self, label: &str) -> Option<u32> {
        self.codes.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyRepr {
    Classes(Vec<String>),
    Codes(HashMap<String, u32>),
}

/// Per-field vocabularies, built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderTable {
    vocabularies: HashMap<String, Vocabulary>,
}

impl EncoderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, vocabulary: Vocabulary) {
        self.vocabularies.insert(field.into(), vocabulary);
    }

    pub fn get(&self, field: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(field)
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }

    /// Parses the persisted vocabulary artifact read from `origin`. Each field
    /// maps either to its ordered class list or to an explicit `{label: code}`
    /// object.
    pub fn from_json(content: &str, origin: &str) -> Result<Self, LoadError> {
        let raw: HashMap<String, VocabularyRepr> =
            serde_json::from_str(content).map_err(|source| LoadError::Json {
                path: origin.to_string(),
                source,
            })?;

        let mut table = Self::new();
        for (field, repr) in raw {
            let vocabulary = match repr {
                VocabularyRepr::Classes(classes) => Vocabulary::from_classes(classes),
                VocabularyRepr::Codes(codes) => Vocabulary::from_codes(codes),
            }
            .map_err(|e| LoadError::InvalidEncoders(format!("{}: {}", field, e)))?;

            if schema::column_index(&field).is_none() {
                tracing::warn!(field = %field, "Encoder for unknown field ignored");
                continue;
            }
            table.insert(field, vocabulary);
        }
        Ok(table)
    }
}

/// Text used to look a raw value up in a vocabulary.
fn category_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the feature vector in training column order. Fields with a
/// vocabulary are replaced by their code; every other field must already be
/// numeric. Nothing is returned unless every column encodes.
pub fn encode(record: &Record, table: &EncoderTable) -> Result<FeatureVector, PredictError> {
    let mut values = Vec::with_capacity(FIELDS.len());

    for spec in FIELDS.iter() {
        let raw = record
            .get(spec.name)
            .ok_or_else(|| PredictError::MissingColumns(vec![spec.name.to_string()]))?;

        let value = match table.get(spec.name) {
            Some(vocabulary) => {
                let label = category_label(raw);
                let code = vocabulary
                    .code(&label)
                    .ok_or_else(|| PredictError::UnknownCategory {
                        field: spec.name.to_string(),
                        value: label,
                    })?;
                f64::from(code)
            }
            None => parse_number(raw).ok_or_else(|| PredictError::InvalidNumeric {
                field: spec.name.to_string(),
            })?,
        };
        values.push(value);
    }

    FeatureVector::new(values).ok_or_else(|| PredictError::InvalidNumeric {
        field: "feature vector".to_string(),
    })
}
