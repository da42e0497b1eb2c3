//! Azure AD Authentication
//!
//! Client-credentials (service principal) tokens for Azure Resource Manager.
//! One [`AzureCredential`] is shared by every Azure caller in the process; it
//! caches the last token and refreshes it shortly before expiry or when the
//! configured service principal changes.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::{TokenErrorResponse, TokenResponse};
use crate::config::{AccountAccessConfig, AzureConfig};
use crate::utils::error::{RelayError, Result};

/// OAuth2 Token with expiration
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::minutes(5) // 5 min buffer
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    tenant_id: String,
    client_id: String,
    token: AccessToken,
}

impl CachedToken {
    fn usable_for(&self, account: &AccountAccessConfig) -> bool {
        self.tenant_id == account.tenant_id
            && self.client_id == account.client_id
            && !self.token.is_expired()
    }
}

/// Shared, lazily-initialized Resource Manager credential
#[derive(Debug, Clone)]
pub struct AzureCredential {
    authority_host: String,
    scope: String,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
    http_client: reqwest::Client,
}

impl AzureCredential {
    /// Create a credential for the configured authority and Resource Manager audience
    pub fn new(config: &AzureConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            authority_host: config.authority_host.trim_end_matches('/').to_string(),
            scope: config.token_scope(),
            token_cache: Arc::new(RwLock::new(None)),
            http_client,
        })
    }

    /// Get a valid bearer token for `account`
    pub async fn get_token(&self, account: &AccountAccessConfig) -> Result<String> {
        // Check cache first
        {
            let cache = self.token_cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.usable_for(account) {
                    return Ok(cached.token.token.clone());
                }
            }
        }

        let mut cache = self.token_cache.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(ref cached) = *cache {
            if cached.usable_for(account) {
                return Ok(cached.token.token.clone());
            }
        }

        let token = self.request_token(account).await?;
        let token_string = token.token.clone();
        *cache = Some(CachedToken {
            tenant_id: account.tenant_id.clone(),
            client_id: account.client_id.clone(),
            token,
        });

        Ok(token_string)
    }

    /// Drop the cached token so the next call logs in again
    pub async fn invalidate(&self) {
        let mut cache = self.token_cache.write().await;
        *cache = None;
    }

    /// Exchange the service-principal secret for a token
    async fn request_token(&self, account: &AccountAccessConfig) -> Result<AccessToken> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, account.tenant_id
        );
        debug!("Requesting Azure AD token for client {}", account.client_id);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", account.client_id.as_str()),
            ("client_secret", account.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| RelayError::auth(format!("Azure AD login request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(RelayError::auth(format!(
                "Azure AD rejected login ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::auth(format!("Malformed Azure AD token response: {}", e)))?;

        let expires_in = token_response.expires_in.seconds().ok_or_else(|| {
            RelayError::auth("Azure AD token response has an invalid expires_in")
        })?;

        info!("Azure AD token acquired, valid for {}s", expires_in);

        Ok(AccessToken {
            token: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }
}
