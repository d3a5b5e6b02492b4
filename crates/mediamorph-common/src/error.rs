//! Common error types used throughout mediamorph.
//!
//! This module provides the unified error taxonomy for the conversion
//! service: session lookup failures, format validation failures, backend
//! conversion failures, and persistence failures. Every variant is a
//! distinct, user-actionable outcome; nothing is swallowed.

/// Common error type for mediamorph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No live session matches the given token.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The format is not in the registry.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Both formats are known, but the pairing is disallowed.
    #[error("Invalid conversion: {from} to {to}")]
    InvalidConversion { from: String, to: String },

    /// The session's file has already been converted once.
    #[error("File already converted for session: {0}")]
    AlreadyConverted(String),

    /// The uploaded bytes could not be decoded as the claimed format.
    #[error("Corrupt input: {0}")]
    CorruptInput(String),

    /// A conversion backend failed (nonzero exit, timeout, codec error).
    #[error("Conversion failed: {tool}: {message}")]
    ConversionFailed { tool: String, message: String },

    /// A persistence operation failed; the enclosing transaction was rolled back.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new SessionNotFound error.
    pub fn session_not_found<S: Into<String>>(token: S) -> Self {
        Self::SessionNotFound(token.into())
    }

    /// Create a new UnsupportedFormat error.
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a new InvalidConversion error.
    pub fn invalid_conversion<A: Into<String>, B: Into<String>>(from: A, to: B) -> Self {
        Self::InvalidConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new AlreadyConverted error.
    pub fn already_converted<S: Into<String>>(session: S) -> Self {
        Self::AlreadyConverted(session.into())
    }

    /// Create a new CorruptInput error.
    pub fn corrupt_input<S: Into<String>>(msg: S) -> Self {
        Self::CorruptInput(msg.into())
    }

    /// Create a new ConversionFailed error.
    pub fn conversion_failed<T: Into<String>, M: Into<String>>(tool: T, message: M) -> Self {
        Self::ConversionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
