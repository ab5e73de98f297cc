//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Sampling parameter out of range: {0}")]
    InvalidSampling(&'static str),

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("Description load attempts must be at least 1")]
    InvalidRetryPolicy,

    #[error("Session sweep interval must be at least 1 second")]
    InvalidSweepInterval,

    #[error("Value must not be empty: {0}")]
    EmptyValue(&'static str),
}
