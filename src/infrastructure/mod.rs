//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: YAML configuration and roster fixtures

pub mod config;
