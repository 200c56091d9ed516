//! Infrastructure layer
//!
//! This module handles configuration and external integrations:
//! - CLI argument processing
//! - Layered configuration
//! - JSON fixture fetcher
//! - Device identity resolution

pub mod cli;
pub mod config;
pub mod device_id;
pub mod fixture;
