use thiserror::Error;

/// Error type shared by every store operation.
///
/// The store layer has exactly one effective failure mode, "operation
/// failed", surfaced as a human-readable message. The variants exist so
/// callers can branch on the few cases that matter (missing records,
/// rejected input) without parsing strings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Preference storage error: {0}")]
    PreferenceError(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        StoreError::ValidationError(err.to_string())
    }
}
