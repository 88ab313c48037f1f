use thiserror::Error;

use crate::models::domain::ParseEnumError;
use crate::services::StoreError;

/// Failures surfaced by the matching engine and the analytics aggregator
///
/// "No results" is never an error: an empty match list or a zero-valued
/// statistics field is a successful outcome.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed search request, rejected before the engine runs
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record store query failed or timed out
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<ParseEnumError> for CoreError {
    fn from(err: ParseEnumError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl CoreError {
    /// HTTP status class the API layer maps this error to
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::Validation(_) => 400,
            CoreError::StoreUnavailable(_) => 503,
        }
    }

    /// Short machine-readable error label
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_failed",
            CoreError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}
