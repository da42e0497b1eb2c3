//! Core functionality for the relay
//!
//! This module contains the pipeline stages and the loop that drives them.

pub mod azure; // Azure AD, Resource Manager and Monitor clients
pub mod probe; // PostgreSQL availability probe
pub mod publisher; // Dynatrace custom-device publisher
pub mod relay;
pub mod scheduler;
pub mod traits;
pub mod types;
