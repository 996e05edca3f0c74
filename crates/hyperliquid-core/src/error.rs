//! Error types for action encoding, hashing and signing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A value outside the closed set the encoder or struct hasher accepts.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A decimal could not be converted without exceeding the rounding tolerance.
    #[error("Precision loss converting {value}: {message}")]
    PrecisionLoss { value: String, message: String },

    #[error("Signing failed: {message}")]
    SigningFailure { message: String },

    #[error("Invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn precision_loss(value: impl ToString, message: impl Into<String>) -> Self {
        Error::PrecisionLoss {
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn signing(message: impl Into<String>) -> Self {
        Error::SigningFailure {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
