//! Core error types for caloriecoach-core.
//!
//! Only [`ValidationError`] and [`InvalidStateError`] are meant to reach a
//! user or caller in normal operation. Model and external-service errors are
//! recovered locally by the estimator and the coach.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerState;

/// Core error type for caloriecoach-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session or timer driven out of order
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Predictive model could not be used
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Coach API or speech backend failure
    #[error("External service error: {0}")]
    External(#[from] ExternalServiceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Field-level input validation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside the configured range
    #[error("'{field}' must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Required text field left empty
    #[error("'{field}' must not be empty")]
    Empty { field: String },

    /// Unparseable or otherwise invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::Empty { field }
            | ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// A state-machine command issued from a state that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {operation} while {state:?}")]
pub struct InvalidStateError {
    pub operation: &'static str,
    pub state: TimerState,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Predictive model errors. Never surfaced by the estimator.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No model loaded
    #[error("no predictive model loaded")]
    Unavailable,

    /// Model artifact could not be read
    #[error("failed to load model from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Feature vector does not match the model
    #[error("invalid features: {0}")]
    InvalidFeatures(String),

    /// Model produced an unusable value
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

/// Errors from optional external collaborators (coach API, speech).
#[derive(Error, Debug)]
pub enum ExternalServiceError {
    /// Service not configured (e.g. no API key)
    #[error("{service} is not configured")]
    NotConfigured { service: String },

    /// HTTP transport failure
    #[error("{service} request failed: {source}")]
    Http {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{service} returned HTTP {status}")]
    Status { service: String, status: u16 },

    /// Request did not finish in time
    #[error("{service} timed out after {timeout_secs}s")]
    Timeout { service: String, timeout_secs: u64 },

    /// Response did not contain usable content
    #[error("{service} returned an unusable response: {message}")]
    BadResponse { service: String, message: String },

    /// Speech queue is full or closed
    #[error("speech queue unavailable: {0}")]
    SpeechQueue(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
