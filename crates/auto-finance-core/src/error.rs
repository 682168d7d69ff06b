use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AutoFinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AutoFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AutoFinanceError {
    fn from(e: serde_json::Error) -> Self {
        AutoFinanceError::SerializationError(e.to_string())
    }
}
