//! Service-principal account access settings

use crate::config::ConfigSource;
use crate::utils::error::Result;
use crate::utils::logging::redact;
use std::fmt;

pub const CLIENT_ID_KEY: &str = "clientId";
pub const CLIENT_SECRET_KEY: &str = "clientSecret";
pub const TENANT_ID_KEY: &str = "tenantId";
pub const SUBSCRIPTION_ID_KEY: &str = "subscriptionId";
pub const RESOURCE_GROUP_KEY: &str = "resourceGroupName";

/// Identity and scope used for every Azure call.
///
/// Resolved fresh from the source on each use; never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountAccessConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl AccountAccessConfig {
    /// Read all five settings, failing on the first absent one
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self> {
        Ok(Self {
            client_id: source.require(CLIENT_ID_KEY)?,
            client_secret: source.require(CLIENT_SECRET_KEY)?,
            tenant_id: source.require(TENANT_ID_KEY)?,
            subscription_id: source.require(SUBSCRIPTION_ID_KEY)?,
            resource_group_name: source.require(RESOURCE_GROUP_KEY)?,
        })
    }

    /// Fully-qualified resource path of a PostgreSQL server
    pub fn server_resource_id(&self, instance_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.DBforPostgreSQL/servers/{}",
            self.subscription_id, self.resource_group_name, instance_name
        )
    }
}

// The secret must never reach a log line through `{:?}`.
impl fmt::Debug for AccountAccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountAccessConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(Some(&self.client_secret)))
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .field("resource_group_name", &self.resource_group_name)
            .finish()
    }
}
