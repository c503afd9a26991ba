//! Error types for platforms client operations.

use thiserror::Error;

/// Errors that can occur while fetching platforms.
#[derive(Debug, Error)]
pub enum Error {
    /// The credential was empty.
    #[error("invalid API key")]
    InvalidApiKey,

    /// The request never produced a response. The URL is stripped so the
    /// credential in the query string cannot leak into messages.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("request failed with status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not JSON.
    #[error("undecodable response body: {0}")]
    InvalidBody(String),

    /// The API reported an error inside an otherwise successful response.
    #[error("API error {code}: {message}")]
    Api {
        /// The API's `status_code` (1 means OK).
        code: i64,
        /// The API's `error` text.
        message: String,
    },

    /// The body decoded but lacks the pagination fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a network error with the request URL removed.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }

    /// Returns true for failures of the remote call itself, as opposed to
    /// configuration mistakes or a response with the wrong shape.
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::HttpStatus { .. } | Self::InvalidBody(_) | Self::Api { .. }
        )
    }
}

/// Result type alias for platforms client operations.
pub type Result<T> = std::result::Result<T, Error>;
