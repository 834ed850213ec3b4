//! Storage engine errors.

use std::io;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors raised by a storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Damaged data detected while reading
    #[error("corruption in {uri} at offset {offset}: {reason}")]
    Corruption {
        /// URI of the cursor that hit the damage
        uri: String,
        /// Byte offset of the damaged frame
        offset: u64,
        /// What was wrong
        reason: String,
    },

    /// Directory or file is not in a format this engine understands
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// No object with this URI
    #[error("not found: {0}")]
    NotFound(String),

    /// URI scheme the engine does not serve
    #[error("unsupported URI: {0}")]
    InvalidUri(String),

    /// Key or value format string the engine cannot decode
    #[error("unsupported format '{format}': {reason}")]
    UnsupportedFormat {
        /// The format string as found in the table config
        format: String,
        /// What was wrong
        reason: String,
    },

    /// Malformed configuration string
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Write access was requested from a read-only engine
    #[error("read-only engine: {0}")]
    ReadOnly(String),
}

impl EngineError {
    /// Check if this error reports damaged data.
    pub fn is_corruption(&self) -> bool {
        matches!(self, EngineError::Corruption { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }

    pub(crate) fn corruption(uri: &str, offset: u64, reason: impl Into<String>) -> Self {
        EngineError::Corruption {
            uri: uri.to_string(),
            offset,
            reason: reason.into(),
        }
    }
}
