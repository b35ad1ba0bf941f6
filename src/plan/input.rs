//! Boundary validation of plan requests.
//!
//! The engine tolerates anything well-typed; these checks let a front end
//! reject malformed requests before they reach it.

use thiserror::Error;

use super::consumption::{MAX_QUANTITY, MIN_QUANTITY};
use super::types::PlanInput;
use crate::catalog::TemplateCatalog;

/// Request validation error with a JSON-style field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {field}: {message}")]
pub struct InputError {
    /// Field path (e.g., `"appliances[2].quantity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl InputError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl PlanInput {
    /// Validates the request and returns every violation found.
    ///
    /// Returns an empty vector if the request is acceptable.
    pub fn validate<T: TemplateCatalog + ?Sized>(&self, templates: &T) -> Vec<InputError> {
        let mut errors = Vec::new();

        if templates.lookup(&self.template_id).is_none() {
            errors.push(InputError::new(
                "templateId",
                format!("unknown template \"{}\"", self.template_id),
            ));
        }

        if self.appliances.is_empty() {
            errors.push(InputError::new("appliances", "must not be empty"));
        }
        for (i, sel) in self.appliances.iter().enumerate() {
            if sel.appliance_id.trim().is_empty() {
                errors.push(InputError::new(
                    format!("appliances[{i}].applianceId"),
                    "must not be empty",
                ));
            }
            if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&sel.quantity) {
                errors.push(InputError::new(
                    format!("appliances[{i}].quantity"),
                    format!(
                        "must be in [{MIN_QUANTITY}, {MAX_QUANTITY}], got {}",
                        sel.quantity
                    ),
                ));
            }
        }

        for (field, value) in [
            ("billAmount", self.bill_amount),
            ("billKwhPerMonth", self.bill_kwh_per_month),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    errors.push(InputError::new(field, "must be a finite number >= 0"));
                }
            }
        }

        errors
    }
}
