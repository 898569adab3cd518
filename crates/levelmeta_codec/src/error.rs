//! Error types for the codec crate.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a session record.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The byte sink rejected a write, or the byte source failed for a
    /// reason other than running out of data.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source ran out of data in the middle of a field.
    #[error("unexpected end of input while reading {field}")]
    UnexpectedEof {
        /// What was being read when the input ended.
        field: &'static str,
    },

    /// A varint is longer than ten bytes or does not fit in 64 bits.
    #[error("varint overflows a 64-bit integer")]
    VarintOverflow,

    /// A length prefix claims more bytes than the decoder accepts.
    #[error("length {claimed} exceeds maximum allowed {max_allowed}")]
    SizeLimitExceeded {
        /// Length announced by the prefix.
        claimed: u64,
        /// Configured maximum.
        max_allowed: u64,
    },

    /// The record uses a construct this format version refuses to interpret.
    #[error("unsupported database format: {message}")]
    UnsupportedFormat {
        /// Description of the unsupported construct.
        message: String,
    },
}

impl CodecError {
    /// Create an unexpected end-of-input error for `field`.
    pub fn unexpected_eof(field: &'static str) -> Self {
        Self::UnexpectedEof { field }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Returns true if the manifest must not be replayed by this reader.
    #[must_use]
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Returns true if the input ended inside a field.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::UnexpectedEof { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
