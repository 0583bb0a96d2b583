//! Payload presence checks and scalar coercion.

use serde_json::{Map, Value};

use crate::error::DomainError;

/// Fields every create and update payload must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "error_description",
    "category",
    "customer_overview_type",
    "error_date",
    "error_count",
];

/// Outcome of the presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    Complete,
    /// The first required field that is absent, null or blank.
    Missing(&'static str),
}

impl FieldCheck {
    pub fn is_complete(&self) -> bool {
        matches!(self, FieldCheck::Complete)
    }
}

/// Check that every required field is present with a non-blank value.
pub fn check_required_fields(payload: &Map<String, Value>) -> FieldCheck {
    REQUIRED_FIELDS
        .iter()
        .find(|field| !payload.get(**field).is_some_and(is_present))
        .map_or(FieldCheck::Complete, |field| FieldCheck::Missing(*field))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Parse `error_count` as a whole number that fits the storage column.
///
/// Integers, integral floats and decimal strings are accepted; booleans and
/// fractional values are not.
pub fn parse_count(value: &Value) -> Result<i32, DomainError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(DomainError::CountFormat)
}

/// Render a free-text field for storage, trimmed.
pub(super) fn text_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
