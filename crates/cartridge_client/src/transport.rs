//! HTTP transport seam.

use crate::error::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Performs one GET request and decodes the JSON body.
///
/// The client only ever needs this single operation from the network,
/// which keeps pagination testable against in-memory catalogs.
pub trait Transport {
    /// Sends a GET to `url` with the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns a transport-class [`Error`] if the request fails, the
    /// server answers with a non-success status, or the body is not JSON.
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(Error::network)?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        // The query string carries the credential; only the path is logged.
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(Error::network)?;

        let status = response.status();
        debug!("Received response with status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(Error::network)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{Client, ClientConfig};
    use crate::error::Error;
    use crate::query::QueryOptions;
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(total: u64, names: &[&str]) -> serde_json::Value {
        let results: Vec<_> = names
            .iter()
            .map(|name| json!({"name": name, "original_price": "99.00"}))
            .collect();
        json!({
            "error": "OK",
            "status_code": 1,
            "number_of_total_results": total,
            "number_of_page_results": names.len(),
            "results": results
        })
    }

    fn client_for(server: &MockServer) -> Client {
        let config =
            ClientConfig::with_api_key("secret-key").base_url(format!("{}/api", server.uri()));
        Client::new(config).unwrap()
    }

    #[tokio::test]
    async fn fetches_pages_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/platforms/"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(3, &["PC", "Amiga"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/platforms/"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(3, &["Saturn"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = QueryOptions::new()
            .field_list(["name", "original_price"])
            .filter("name", "PC")
            .filter("category", "console");
        let records = client.fetch_platforms(&options).collect_all().await.unwrap();

        let names: Vec<_> = records.iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, ["PC", "Amiga", "Saturn"]);
        assert_eq!(records[0].price(), Some(99.0));

        let requests = server.received_requests().await.unwrap();
        let first: HashMap<String, String> =
            requests[0].url.query_pairs().into_owned().collect();
        assert_eq!(first["api_key"], "secret-key");
        assert_eq!(first["format"], "json");
        assert_eq!(first["field_list"], "name,original_price");
        assert_eq!(first["filter"], "name:PC,category:console");
        assert!(!first.contains_key("sort"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut platforms = client.fetch_platforms(&QueryOptions::new());
        let err = platforms.next_record().await.unwrap().unwrap_err();

        assert!(matches!(&err, Error::HttpStatus { status: 502, body } if body == "bad gateway"));
        assert!(err.is_transport());
        assert!(platforms.next_record().await.is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .fetch_platforms(&QueryOptions::new())
            .collect_all()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidBody(_)));
    }

    #[tokio::test]
    async fn network_errors_do_not_leak_the_key() {
        // Nothing listens on the discard port.
        let client = Client::new(
            ClientConfig::with_api_key("secret-key").base_url("http://127.0.0.1:9/api"),
        )
        .unwrap();
        let err = client
            .fetch_platforms(&QueryOptions::new())
            .collect_all()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(!err.to_string().contains("secret-key"));
        assert!(!format!("{err:?}").contains("secret-key"));
    }
}
