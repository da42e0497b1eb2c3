//! Azure integration
//!
//! Azure AD client-credentials login, PostgreSQL server discovery through
//! Resource Manager and metric queries against Azure Monitor.

pub mod auth;
pub mod error;
pub mod monitor;
pub mod resources;
pub mod types;

pub use auth::{AccessToken, AzureCredential};
pub use monitor::AzureMetricsFetcher;
pub use resources::{AzureInstanceDiscoverer, is_monitoring_enabled};
