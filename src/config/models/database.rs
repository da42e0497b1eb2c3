//! Database probe settings and per-instance credentials

use super::*;
use crate::config::ConfigSource;
use crate::utils::logging::redact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Suffix appended to an instance name to find its credentials blob
pub const DB_CREDS_SUFFIX: &str = "_db_creds";

/// Connection settings shared by every availability probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server port
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database to connect to
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Statement timeout in milliseconds
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            port: default_db_port(),
            name: default_db_name(),
            statement_timeout_ms: default_statement_timeout_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Login for one PostgreSQL server
#[derive(Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub username: String,
    pub hostname: String,
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("hostname", &self.hostname)
            .field("password", &redact(Some(&self.password)))
            .finish()
    }
}

/// Blob as stored in configuration; every field may be absent
#[derive(Debug, Default, Deserialize)]
struct RawDbCredentials {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Outcome of looking up an instance's credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialLookup {
    /// No `{instance}_db_creds` entry
    Missing,
    /// Entry is not a JSON object
    Malformed(String),
    /// Entry lacks at least one field; the names of the missing ones
    Incomplete(Vec<&'static str>),
    /// All three fields present
    Found(DbCredentials),
}

impl DbCredentials {
    /// Configuration key holding the credentials of `instance_name`
    pub fn config_key(instance_name: &str) -> String {
        format!("{}{}", instance_name, DB_CREDS_SUFFIX)
    }

    /// Look up and parse the credentials of an instance
    pub fn lookup(source: &dyn ConfigSource, instance_name: &str) -> CredentialLookup {
        match source.get(&Self::config_key(instance_name)) {
            Some(blob) => Self::parse(&blob),
            None => CredentialLookup::Missing,
        }
    }

    /// Parse a credentials blob. Empty strings count as absent.
    pub fn parse(blob: &str) -> CredentialLookup {
        let raw: RawDbCredentials = match serde_json::from_str(blob) {
            Ok(raw) => raw,
            Err(e) => return CredentialLookup::Malformed(e.to_string()),
        };

        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let (username, hostname, password) = (
            present(raw.username),
            present(raw.hostname),
            present(raw.password),
        );

        match (username, hostname, password) {
            (Some(username), Some(hostname), Some(password)) => {
                CredentialLookup::Found(DbCredentials {
                    username,
                    hostname,
                    password,
                })
            }
            (username, hostname, password) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push("username");
                }
                if hostname.is_none() {
                    missing.push("hostname");
                }
                if password.is_none() {
                    missing.push("password");
                }
                CredentialLookup::Incomplete(missing)
            }
        }
    }
}
