//! One wiremock server standing in for Azure AD, Resource Manager,
//! Azure Monitor and Dynatrace

use pg_dynatrace_relay::config::AzureConfig;
use pg_dynatrace_relay::core::publisher::CustomDevicePayload;
use pg_dynatrace_relay::{MapSource, RelayConfig};
use serde_json::Value;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures;

pub struct MockCloud {
    pub server: MockServer,
}

impl MockCloud {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Azure endpoints pointed at the mock, with short timeouts
    pub fn azure_config(&self) -> AzureConfig {
        AzureConfig {
            authority_host: self.uri(),
            resource_manager_endpoint: self.uri(),
            request_timeout_secs: 5,
            ..AzureConfig::default()
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        let mut config = RelayConfig {
            azure: self.azure_config(),
            ..RelayConfig::default()
        };
        config.dynatrace.request_timeout_secs = 5;
        config
    }

    /// Source whose Dynatrace endpoint is the mock
    pub fn source(&self) -> MapSource {
        fixtures::full_source(&self.uri())
    }

    /// Azure AD token endpoint, expected to be hit exactly `times` times
    pub async fn mount_token(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/oauth2/v2.0/token", fixtures::TENANT)))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains(format!("client_id={}", fixtures::CLIENT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::token_body()))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_token_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/oauth2/v2.0/token", fixtures::TENANT)))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided."
            })))
            .mount(&self.server)
            .await;
    }

    /// First page of the servers list
    pub async fn mount_servers(&self, page: Value) {
        Mock::given(method("GET"))
            .and(path(fixtures::servers_path()))
            .and(query_param("api-version", "2017-12-01"))
            .and(header(
                "Authorization",
                format!("Bearer {}", fixtures::ACCESS_TOKEN).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(&self.server)
            .await;
    }

    /// Servers list answering with `status` for every request
    pub async fn mount_servers_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(fixtures::servers_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "error": {
                    "code": "AuthenticationFailed",
                    "message": "Authentication failed."
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// A follow-up page served under its own path
    pub async fn mount_servers_page(&self, page_path: &str, page: Value) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_metrics(&self, instance: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(fixtures::metrics_path(instance)))
            .and(query_param("api-version", "2018-01-01"))
            .and(query_param(
                "metricnames",
                "active_connections,storage_used,cpu_percent",
            ))
            .and(query_param("aggregation", "Average"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_metrics_error(&self, instance: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(fixtures::metrics_path(instance)))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "code": "InternalServerError",
                "message": "metrics backend unavailable"
            })))
            .mount(&self.server)
            .await;
    }

    /// Dynatrace ingestion for every instance
    pub async fn mount_dynatrace(&self, status: u16) {
        Mock::given(method("POST"))
            .and(header(
                "Authorization",
                format!("Api-Token {}", fixtures::DYNATRACE_TOKEN).as_str(),
            ))
            .and(header("Content-Type", "application/json"))
            .and(wiremock::matchers::path_regex(format!(
                "^/e/{}/api/v1/entity/infrastructure/custom/[^/]+$",
                fixtures::ENVIRONMENT
            )))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Payloads posted to Dynatrace, keyed by instance name
    pub async fn dynatrace_posts(&self) -> Vec<(String, CustomDevicePayload)> {
        let prefix = fixtures::custom_device_path("");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().starts_with(&prefix))
            .map(|request| {
                let instance = request.url.path()[prefix.len()..].to_string();
                let payload = serde_json::from_slice(&request.body).unwrap();
                (instance, payload)
            })
            .collect()
    }

    pub async fn requests_to(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }
}
