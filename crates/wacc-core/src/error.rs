use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaccError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Division undefined in {context}")]
    DivisionUndefined { context: String },

    #[error("Zero capital structure: total market value across all sources is zero, weights are undefined")]
    ZeroCapitalStructure,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WaccError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WaccError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn division(context: impl Into<String>) -> Self {
        WaccError::DivisionUndefined {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for WaccError {
    fn from(e: serde_json::Error) -> Self {
        WaccError::SerializationError(e.to_string())
    }
}
