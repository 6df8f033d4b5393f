//! Error types

use thiserror::Error;

/// Main error type for the KPI reporter
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Process exit code for this error class
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Authentication(_) => 3,
            Error::Api(_) => 4,
            Error::Validation(_) => 1,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
