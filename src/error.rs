//! Error types for scenario construction, loading and export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Invalid parameter: {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScenarioError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScenarioError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
