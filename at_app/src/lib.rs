//! # at_app
//!
//! Shared process utilities for the trading binaries

pub mod cli;
pub mod config_loader;
pub mod shutdown_handler;
pub mod tracing_setup;
