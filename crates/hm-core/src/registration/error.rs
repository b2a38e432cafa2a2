use serde::{Deserialize, Serialize};

use super::ProfileField;
use crate::validation::ValidationIssue;

/// Registration error types surfaced inline by the step screens.
///
/// None of these is fatal: the flow stays on the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegistrationError {
    #[error("{field}: {issue}")]
    InvalidField {
        field: ProfileField,
        issue: ValidationIssue,
    },
    #[error("registration is incomplete, missing {}", join_fields(.missing))]
    ProfileIncomplete { missing: Vec<ProfileField> },
}

impl RegistrationError {
    pub fn invalid(field: ProfileField, issue: ValidationIssue) -> Self {
        RegistrationError::InvalidField { field, issue }
    }

    /// Field the error is scoped to, if it is a field error.
    pub fn field(&self) -> Option<ProfileField> {
        match self {
            RegistrationError::InvalidField { field, .. } => Some(*field),
            RegistrationError::ProfileIncomplete { .. } => None,
        }
    }
}

fn join_fields(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
