//! Key/value configuration sources
//!
//! Secrets and per-instance settings are looked up on every use instead of
//! being captured at startup, so rotated values are picked up on the next tick.

use std::collections::HashMap;
use std::sync::Arc;

/// A read-only source of string settings
pub trait ConfigSource: Send + Sync {
    /// Look up a key. Empty values are reported as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a key, failing with a `MissingSetting` error when absent
    fn require(&self, key: &str) -> crate::utils::error::Result<String> {
        self.get(key)
            .ok_or_else(|| crate::utils::error::RelayError::missing(key))
    }
}

/// Shared handle to a configuration source
pub type SharedSource = Arc<dyn ConfigSource>;

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory source, used for tests and fixed deployments
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
