//! Error types for the relay

use thiserror::Error;

/// Result type alias for the relay
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required configuration key is absent or empty
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    /// Azure AD authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Non-success responses from an upstream API
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Metrics could not be resolved for an instance
    #[error("Metrics unavailable: {0}")]
    MetricsUnavailable(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}
