//! Integration tests for pg-dynatrace-relay
//!
//! These tests drive the real HTTP clients against a local mock of every
//! remote service. Only the PostgreSQL probe is replaced by a stub.

pub mod metrics_tests;
pub mod relay_tests;
