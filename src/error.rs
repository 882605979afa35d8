//! Error types for Lead Assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Lead submission errors.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("Webhook rejected the lead with status {status}")]
    Rejected { status: u16 },
}

/// Reference-data lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Locality list fetch failed: {0}")]
    Fetch(String),

    #[error("Could not decode locality list: {0}")]
    Decode(String),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
