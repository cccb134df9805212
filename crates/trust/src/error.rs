use thiserror::Error;

/// Errors that can occur during trust operations
#[derive(Error, Debug)]
pub enum TrustError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid badge: {0}")]
    InvalidBadge(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for TrustError {
    fn from(err: serde_json::Error) -> Self {
        TrustError::InternalError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for TrustError {
    fn from(err: validator::ValidationErrors) -> Self {
        TrustError::InvalidProfile(err.to_string())
    }
}
