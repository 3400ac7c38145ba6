use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Batch partially failed: {succeeded} succeeded, {failed} failed")]
    PartialBatchFailure { succeeded: usize, failed: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a field-level validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; callers re-validate after fixing it.
        let first = errors
            .field_errors()
            .into_iter()
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .or_else(|| errs.first().map(|e| e.code.to_string()))
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            });

        match first {
            Some((field, message)) => Self::InvalidField { field, message },
            None => Self::Validation(errors.to_string()),
        }
    }
}
