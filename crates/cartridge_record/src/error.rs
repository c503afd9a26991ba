//! Error types for record operations.

use thiserror::Error;

/// Errors that can occur while building or loading records.
#[derive(Debug, Error)]
pub enum Error {
    /// A JSON value that should have been an object was something else.
    #[error("expected a JSON object for a record, found {0}")]
    NotAnObject(&'static str),

    /// `original_price` holds a string that is not a finite number.
    #[error("invalid original_price {value:?}")]
    InvalidPrice {
        /// The raw string that failed to parse.
        value: String,
    },

    /// A record dump could not be parsed.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// One-based line number (1 for whole-document failures).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a parse error at the given line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, Error>;
