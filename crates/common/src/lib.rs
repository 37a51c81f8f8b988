//! Shared configuration for the gkeep workspace.

pub mod config;
pub mod constants;
pub mod platform;

pub use config::{Config, ConfigError};
