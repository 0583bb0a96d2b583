use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::date::parse_date_value;
use super::validation::{FieldCheck, check_required_fields, parse_count, text_field};
use crate::error::DomainError;

/// Error record entity - one error report logged against a customer interaction.
///
/// `error_date` serializes as an ISO-8601 calendar date regardless of how it
/// was originally supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error_id: i32,
    pub error_description: String,
    pub category: String,
    pub customer_overview_type: String,
    pub error_date: NaiveDate,
    pub error_count: i32,
}

/// A validated record that has not been assigned an `error_id` yet.
///
/// Used for both creation and full replacement; there is no partial form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewErrorRecord {
    pub error_description: String,
    pub category: String,
    pub customer_overview_type: String,
    pub error_date: NaiveDate,
    pub error_count: i32,
}

impl NewErrorRecord {
    /// Validate and normalize an inbound payload.
    ///
    /// Checks run in a fixed order and stop at the first failure: field
    /// presence, then `error_date`, then `error_count`.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, DomainError> {
        if let FieldCheck::Missing(field) = check_required_fields(payload) {
            return Err(DomainError::MissingFields { field });
        }

        let error_date = parse_date_value(&payload["error_date"])?;
        let error_count = parse_count(&payload["error_count"])?;

        Ok(Self {
            error_description: text_field(&payload["error_description"]),
            category: text_field(&payload["category"]),
            customer_overview_type: text_field(&payload["customer_overview_type"]),
            error_date,
            error_count,
        })
    }

    /// Attach the storage-assigned id.
    pub fn with_id(self, error_id: i32) -> ErrorRecord {
        ErrorRecord {
            error_id,
            error_description: self.error_description,
            category: self.category,
            customer_overview_type: self.customer_overview_type,
            error_date: self.error_date,
            error_count: self.error_count,
        }
    }
}
