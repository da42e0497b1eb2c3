//! Error handling for the relay
//!
//! This module defines the error type shared by every stage of the pipeline.

pub mod helpers;
pub mod types;

pub use types::{RelayError, Result};
