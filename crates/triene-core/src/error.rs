//! Error types for the Triene system

use thiserror::Error;

/// Main error type for all Triene operations
#[derive(Error, Debug)]
pub enum TrieneError {
    /// The requested action is missing precondition state; nothing was changed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The messaging integration is not connected; the whole batch is blocked
    #[error("Integration not connected: {0}")]
    Connectivity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<triene_types::TypeError> for TrieneError {
    fn from(e: triene_types::TypeError) -> Self {
        TrieneError::Validation(e.to_string())
    }
}

impl From<config::ConfigError> for TrieneError {
    fn from(e: config::ConfigError) -> Self {
        TrieneError::Config(e.to_string())
    }
}

/// Result type for Triene operations
pub type Result<T> = std::result::Result<T, TrieneError>;
