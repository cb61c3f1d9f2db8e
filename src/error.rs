use std::path::PathBuf;

use cmdtrack_crypto::CryptoError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sync::types::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid command: {0} required")]
    Validation(String),

    #[error("Encryption error: {0}")]
    Encryption(CryptoError),

    #[error("Decryption error: {0}")]
    Decryption(CryptoError),

    #[error("Encoding error: {0}")]
    Encoding(CryptoError),

    #[error("Failed to save after {attempts} attempts: {last_error}")]
    Delivery { attempts: u32, last_error: String },

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Cannot access {}: {source}", path.display())]
    LocalStorage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read history input: {0}")]
    Input(#[source] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Shown instead of the error text when a record is missing a field.
pub const MISSING_FIELDS_MESSAGE: &str = "Command, WorkingDir, and Hostname are all required";

impl Error {
    /// Text printed to the user when a command-line operation fails.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(_) => MISSING_FIELDS_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidBase64(_) => Error::Encoding(err),
            CryptoError::RngFailed(_) => Error::Encryption(err),
            _ => Error::Decryption(err),
        }
    }
}
