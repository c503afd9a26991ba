//! Platforms API client.

use crate::error::{Error, Result};
use crate::platforms::Platforms;
use crate::query::QueryOptions;
use crate::transport::{HttpTransport, Transport};
use std::fmt;
use std::time::Duration;
use tracing::Span;

/// Public Giant Bomb API root.
pub const DEFAULT_BASE_URL: &str = "https://www.giantbomb.com/api";

const PLATFORMS_PATH: &str = "platforms/";

/// Configuration for the platforms client.
#[derive(Clone)]
pub struct ClientConfig {
    /// API key for authentication.
    pub api_key: String,
    /// API root; `platforms/` is appended to it.
    pub base_url: String,
    /// User agent sent with every request. The API refuses generic ones.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("cartridge/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the given API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Overrides the API root.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Client for the platforms collection.
///
/// Construction performs no network activity. Diagnostics go to the span
/// the client was built with, never to an ambient logger configured here.
pub struct Client<T = HttpTransport> {
    api_key: String,
    base_url: String,
    transport: T,
    span: Span,
}

impl Client {
    /// Creates a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            Duration::from_secs(config.timeout_seconds),
            &config.user_agent,
        )?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::InvalidApiKey);
        }

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url,
            transport,
            span: tracing::info_span!("cartridge_client"),
        })
    }

    /// Routes this client's diagnostics to `span`.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Starts a lazy fetch of the platforms collection.
    ///
    /// Nothing is requested until the returned sequence is first pulled,
    /// and each further page is requested only once the previous page has
    /// been fully consumed.
    pub fn fetch_platforms(&self, options: &QueryOptions) -> Platforms<'_, T> {
        let mut params = options.to_params();
        params.push(("api_key", self.api_key.clone()));
        params.push(("format", "json".to_string()));
        Platforms::new(self, self.platforms_url(), params)
    }

    /// Full URL of the platforms collection.
    pub fn platforms_url(&self) -> String {
        format!("{}/{PLATFORMS_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// The transport requests go through.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) const fn span(&self) -> &Span {
        &self.span
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejects_empty_api_key() {
        let config = ClientConfig::default();
        assert!(matches!(Client::new(config), Err(Error::InvalidApiKey)));
    }

    #[test]
    fn client_accepts_valid_config() {
        let config = ClientConfig::with_api_key("test-key");
        assert!(Client::new(config).is_ok());
    }

    #[test]
    fn platforms_url_tolerates_trailing_slash() {
        let config = ClientConfig::with_api_key("k").base_url("http://localhost:9/api/");
        let client = Client::new(config).unwrap();
        assert_eq!(client.platforms_url(), "http://localhost:9/api/platforms/");

        let client = Client::new(ClientConfig::with_api_key("k")).unwrap();
        assert_eq!(
            client.platforms_url(),
            "https://www.giantbomb.com/api/platforms/"
        );
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = ClientConfig::with_api_key("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));

        let client = Client::new(config).unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
