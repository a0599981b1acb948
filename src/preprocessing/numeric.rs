use serde_json::{Number, Value};

use super::Record;
use crate::error::PredictError;

/// Reads a JSON number, or a string holding one. Blank strings and
/// non-finite results are not numbers.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Replaces each of `fields` with its numeric form. Stops at the first field
/// that does not convert; every other field is left as submitted.
pub fn coerce(mut record: Record, fields: &[&str]) -> Result<Record, PredictError> {
    for &field in fields {
        let number = record
            .get(field)
            .and_then(parse_number)
            .and_then(Number::from_f64)
            .ok_or_else(|| PredictError::InvalidNumeric {
                field: field.to_string(),
            })?;
        record.set(field, Value::Number(number));
    }
    Ok(record)
}
