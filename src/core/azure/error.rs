//! Azure error handling
//!
//! Turns non-success Resource Manager responses into [`RelayError::Api`].

use crate::utils::error::{RelayError, Result};

/// Extract error message from an Azure response body
pub fn extract_azure_error_message(response: &serde_json::Value) -> String {
    if let Some(error) = response.get("error") {
        let message = error.get("message").and_then(|m| m.as_str());
        if let Some(code) = error.get("code").and_then(|c| c.as_str()) {
            return format!("{}: {}", code, message.unwrap_or("Unknown error"));
        }
        if let Some(msg) = message {
            return msg.to_string();
        }
    }

    // Fallback to generic message
    response.to_string()
}

/// Return the body of a successful response, or map the failure
pub async fn check_response(service: &'static str, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .map(|json| extract_azure_error_message(&json))
        .unwrap_or(body);

    Err(RelayError::api(service, status.as_u16(), message))
}
