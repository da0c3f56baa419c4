//! Error types for key setup validation
//!
//! Two layers: [`FetchError`] covers a single failed page request against the
//! remote API and is always recovered from by the paging loop.
//! [`KeySetupError`] covers everything around the reconciliation core
//! (input parsing, configuration, artifact I/O) and is surfaced to the caller.

use thiserror::Error;

/// A failed page request
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Response carried a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body did not match the expected page shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Main error type for everything outside the paging loop
#[derive(Error, Debug)]
pub enum KeySetupError {
    /// Expected-schema input could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Client settings are missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    File(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl KeySetupError {
    /// Create a parse error for a 1-based input line
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        KeySetupError::Parse {
            line,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        KeySetupError::Config(msg.into())
    }

    /// Create a file error
    pub fn file(msg: impl Into<String>) -> Self {
        KeySetupError::File(msg.into())
    }
}

impl From<std::io::Error> for KeySetupError {
    fn from(err: std::io::Error) -> Self {
        KeySetupError::File(err.to_string())
    }
}

impl From<serde_json::Error> for KeySetupError {
    fn from(err: serde_json::Error) -> Self {
        KeySetupError::Serialization(format!("JSON error: {}", err))
    }
}

/// Result type alias for key setup operations
pub type Result<T> = std::result::Result<T, KeySetupError>;
