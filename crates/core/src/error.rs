//! Error types for extraction, reinsertion and configuration.
//!
//! Adapters never surface these for "nothing to do" conditions: a builder
//! that is not in use, a malformed store or a fragment that is no longer
//! present all degrade to an empty extraction or unchanged content. The
//! error type is used internally by decoders and externally by config
//! loading and the simplification boundary.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::{EasyLanguageError, Result};
//!
//! fn require_widgets(tree: &serde_json::Value) -> Result<()> {
//!     if tree.get("widgets").is_none() {
//!         return Err(EasyLanguageError::MissingKey("widgets".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the simplification core.
#[derive(Error, Debug)]
pub enum EasyLanguageError {
    /// JSON encoding or decoding of a builder store failed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A base64 wrapped store could not be decoded.
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A URL encoded or base64 wrapped store did not decode into UTF-8 text.
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// A decoded store lacks a top-level key the builder always writes.
    #[error("Missing expected key: {0}")]
    MissingKey(String),

    /// Registry or loader configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Builder-config directive files that fail to parse.
    ///
    /// The message carries the offending line number.
    #[error("Builder configuration error: {0}")]
    BuilderConfigError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external simplification provider failed for one fragment.
    #[error("Simplification failed: {0}")]
    Simplification(String),
}

/// Result type alias for EasyLanguageError.
pub type Result<T> = std::result::Result<T, EasyLanguageError>;
