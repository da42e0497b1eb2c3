//! Utility modules for the relay
//!
//! - **error**: error type and result alias
//! - **logging**: tracing subscriber setup and secret redaction

pub mod error;
pub mod logging;

pub use error::{RelayError, Result};
pub use logging::{LogFormat, init_logging};

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Turn a configured endpoint into a base URL without a trailing slash.
///
/// Bare host names get `https://` prepended.
pub fn normalize_base_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
