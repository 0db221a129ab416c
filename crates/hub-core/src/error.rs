//! # Hub Error Types
//!
//! Typed error handling for the InventoHub backend.
//! All fallible operations return `Result<T, HubError>`.

use thiserror::Error;

/// Core error type for all backend operations
#[derive(Debug, Error)]
pub enum HubError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed document identifier in a path or body
    #[error("Invalid identifier: {value}")]
    InvalidId { value: String },

    /// Missing, malformed, or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated caller lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested document does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Checkout asked for more units than the product has left
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Document store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with a provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HubError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HubError::NetworkError(_) | HubError::ProviderError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            HubError::Configuration(_) => 500,
            HubError::InvalidRequest(_) => 400,
            HubError::InvalidId { .. } => 400,
            HubError::Unauthorized(_) => 401,
            HubError::Forbidden(_) => 403,
            HubError::NotFound { .. } => 404,
            HubError::InsufficientStock { .. } => 409,
            HubError::Store(_) => 500,
            HubError::ProviderError { .. } => 502,
            HubError::NetworkError(_) => 503,
            HubError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for backend operations
pub type HubResult<T> = Result<T, HubError>;
