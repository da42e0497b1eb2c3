//! Availability probing
//!
//! Asks each server whether it is in recovery. A primary answers `false`
//! and is reported available; a standby, or any failure along the way,
//! is reported unavailable.

pub mod connector;

pub use connector::{DatabaseConnector, PostgresConnector};

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{CredentialLookup, DatabaseConfig, DbCredentials, SharedSource};
use crate::core::traits::AvailabilityProbe;
use crate::core::types::Availability;
use crate::utils::error::{RelayError, Result};

pub const RECOVERY_QUERY: &str = "SELECT pg_is_in_recovery()";
const RECOVERY_COLUMN: &str = "pg_is_in_recovery";

/// Slack on top of the server-side statement timeout
const QUERY_GRACE: Duration = Duration::from_secs(2);

/// Probes a server with a single scoped connection
pub struct PostgresProber<C = PostgresConnector> {
    source: SharedSource,
    connector: C,
    query_timeout: Duration,
    connect_timeout: Duration,
}

impl PostgresProber<PostgresConnector> {
    pub fn new(source: SharedSource, config: &DatabaseConfig) -> Self {
        Self::with_connector(source, PostgresConnector::new(config.clone()), config)
    }
}

impl<C: DatabaseConnector> PostgresProber<C> {
    pub fn with_connector(source: SharedSource, connector: C, config: &DatabaseConfig) -> Self {
        Self {
            source,
            connector,
            query_timeout: Duration::from_millis(config.statement_timeout_ms) + QUERY_GRACE,
            connect_timeout: config.connect_timeout() + QUERY_GRACE,
        }
    }

    /// Connect, ask, release. The connection is released on every path
    /// that managed to open one.
    pub async fn check(&self, credentials: &DbCredentials) -> Result<Availability> {
        let connection = tokio::time::timeout(
            self.connect_timeout,
            self.connector.connect(credentials),
        )
        .await
        .map_err(|_| RelayError::timeout(format!("connecting to {}", credentials.hostname)))??;

        let outcome = self.query_recovery(&connection).await;
        self.connector.release(connection).await;
        outcome
    }

    async fn query_recovery(&self, connection: &DatabaseConnection) -> Result<Availability> {
        let statement = Statement::from_string(DbBackend::Postgres, RECOVERY_QUERY);
        let row = tokio::time::timeout(self.query_timeout, connection.query_one(statement))
            .await
            .map_err(|_| RelayError::timeout("pg_is_in_recovery query"))??;

        match row {
            Some(row) => {
                let in_recovery: bool = row.try_get("", RECOVERY_COLUMN)?;
                debug!("pg_is_in_recovery = {}", in_recovery);
                Ok(Availability::from_recovery(in_recovery))
            }
            None => Ok(Availability::Undetermined),
        }
    }
}

#[async_trait]
impl<C: DatabaseConnector> AvailabilityProbe for PostgresProber<C> {
    async fn probe(&self, instance_name: &str) -> Availability {
        let credentials = match DbCredentials::lookup(self.source.as_ref(), instance_name) {
            CredentialLookup::Found(credentials) => credentials,
            CredentialLookup::Missing => {
                warn!(
                    "Database credentials for {} are missing ({} not set)",
                    instance_name,
                    DbCredentials::config_key(instance_name)
                );
                return Availability::Unavailable;
            }
            CredentialLookup::Malformed(reason) => {
                warn!(
                    "Database credentials for {} are not valid JSON: {}",
                    instance_name, reason
                );
                return Availability::Unavailable;
            }
            CredentialLookup::Incomplete(missing) => {
                warn!(
                    "Database credentials for {} are incomplete, missing: {}",
                    instance_name,
                    missing.join(", ")
                );
                return Availability::Unavailable;
            }
        };

        match self.check(&credentials).await {
            Ok(availability) => {
                info!("Availability of {} is {}", instance_name, availability);
                availability
            }
            Err(e) => {
                warn!("Connection error while probing {}: {}", instance_name, e);
                Availability::Unavailable
            }
        }
    }
}
