//! Request preprocessing: schema validation, numeric coercion and
//! categorical encoding of a customer record into the model's feature vector.

pub mod encoder;
pub mod numeric;
pub mod schema;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde_json::{Map, Value};

pub use encoder::{encode, EncoderTable, Vocabulary};
pub use numeric::coerce;
pub use schema::{numeric_fields, validate, FieldKind, FieldSpec, FIELDS, FIELD_COUNT};

/// A customer record as submitted by the caller, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Fully numeric model input, one column per entry of [`FIELDS`] in
/// training order. Every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    /// Builds a vector from raw column values, rejecting anything with the
    /// wrong width or a non-finite entry.
    pub fn new(values: Vec<f64>) -> Option<Self> {
        if values.len() != FIELD_COUNT || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            values: Array1::from_vec(values),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Single-row `[1, FIELD_COUNT]` f32 batch, the layout tensor runtimes expect.
    pub fn to_batch(&self) -> Array2<f32> {
        self.values
            .mapv(|v| v as f32)
            .insert_axis(Axis(0))
            .as_standard_layout()
            .to_owned()
    }
}
