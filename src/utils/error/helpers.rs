//! Helper functions for creating specific error types

use super::types::RelayError;

/// Helper functions for creating specific errors
impl RelayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn missing<S: Into<String>>(key: S) -> Self {
        Self::MissingSetting(key.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn api<S: Into<String>>(service: &'static str, status: u16, message: S) -> Self {
        Self::Api {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn metrics_unavailable<S: Into<String>>(message: S) -> Self {
        Self::MetricsUnavailable(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error came from Azure AD or a 401/403 response
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}
