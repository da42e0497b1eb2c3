//! Short-lived PostgreSQL connections

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;
use url::Url;

use crate::config::{DatabaseConfig, DbCredentials};
use crate::utils::error::{RelayError, Result};

/// Opens and releases the single connection used by one probe
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, credentials: &DbCredentials) -> Result<DatabaseConnection>;

    /// Close the connection; close failures are not probe failures
    async fn release(&self, connection: DatabaseConnection) {
        if let Err(e) = connection.close().await {
            debug!("Error closing probe connection: {}", e);
        }
    }
}

/// Connects over TLS with a server-side statement timeout
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    config: DatabaseConfig,
}

impl PostgresConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Build the connection URL; user info is percent-encoded
    pub fn connection_url(&self, credentials: &DbCredentials) -> Result<String> {
        let invalid = |what: &str| {
            RelayError::config(format!(
                "Invalid {} for host {}",
                what, credentials.hostname
            ))
        };

        let mut url = Url::parse("postgres://localhost")
            .map_err(|e| RelayError::config(format!("Invalid base URL: {}", e)))?;
        url.set_host(Some(&credentials.hostname))
            .map_err(|_| invalid("hostname"))?;
        url.set_port(Some(self.config.port))
            .map_err(|_| invalid("port"))?;
        url.set_username(&credentials.username)
            .map_err(|_| invalid("username"))?;
        url.set_password(Some(&credentials.password))
            .map_err(|_| invalid("password"))?;
        url.set_path(&self.config.name);
        url.query_pairs_mut()
            .append_pair("sslmode", "require")
            .append_pair(
                "options",
                &format!("-c statement_timeout={}", self.config.statement_timeout_ms),
            );

        Ok(url.to_string())
    }
}

#[async_trait]
impl DatabaseConnector for PostgresConnector {
    async fn connect(&self, credentials: &DbCredentials) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(self.connection_url(credentials)?);
        opt.max_connections(1)
            .min_connections(0)
            .connect_timeout(self.config.connect_timeout())
            .acquire_timeout(self.config.connect_timeout())
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(RelayError::Database)
    }
}
