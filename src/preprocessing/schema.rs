use serde_json::Value;

use super::Record;
use crate::error::PredictError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn categorical(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Categorical,
    }
}

const fn numeric(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Numeric,
    }
}

/// Required input fields, in the column order the encoders and model were
/// trained with. Reordering this list silently corrupts predictions.
pub const FIELDS: [FieldSpec; 19] = [
    categorical("gender"),
    categorical("SeniorCitizen"),
    categorical("Partner"),
    categorical("Dependents"),
    numeric("tenure"),
    categorical("PhoneService"),
    categorical("MultipleLines"),
    categorical("InternetService"),
    categorical("OnlineSecurity"),
    categorical("OnlineBackup"),
    categorical("DeviceProtection"),
    categorical("TechSupport"),
    categorical("StreamingTV"),
    categorical("StreamingMovies"),
    categorical("Contract"),
    categorical("PaperlessBilling"),
    categorical("PaymentMethod"),
    numeric("MonthlyCharges"),
    numeric("TotalCharges"),
];

pub const FIELD_COUNT: usize = FIELDS.len();

/// Names of the `Numeric` entries of [`FIELDS`], in column order.
pub fn numeric_fields() -> Vec<&'static str> {
    FIELDS
        .iter()
        .filter(|spec| spec.kind == FieldKind::Numeric)
        .map(|spec| spec.name)
        .collect()
}

pub fn column_index(field: &str) -> Option<usize> {
    FIELDS.iter().position(|spec| spec.name == field)
}

/// Turns a raw request body into a JSON value. `Ok(None)` means there was
/// nothing to parse.
pub fn parse_body(body: &[u8]) -> Result<Option<Value>, PredictError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| PredictError::MalformedBody(e.to_string()))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Checks that the body is a non-empty record carrying every required field.
/// All absent fields are reported together.
pub fn validate(body: Option<Value>) -> Result<Record, PredictError> {
    let fields = match body {
        None => return Err(PredictError::MissingBody),
        Some(value) if is_falsy(&value) => return Err(PredictError::MissingBody),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(PredictError::MissingColumns(
                FIELDS.iter().map(|spec| spec.name.to_string()).collect(),
            ))
        }
    };

    let missing: Vec<String> = FIELDS
        .iter()
        .filter(|spec| !fields.contains_key(spec.name))
        .map(|spec| spec.name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PredictError::MissingColumns(missing));
    }

    Ok(Record::new(fields))
}
