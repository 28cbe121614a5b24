//! # HTTP Client Utilities
//!
//! Shared JSON-over-HTTP client for bank adapters.
//!
//! - Per-client request timeout
//! - JSON serialization/deserialization
//! - Mapping of transport failures and HTTP statuses onto [`BankError`]
//!
//! # Examples
//!
//! ```ignore
//! use offer_aggregator::infrastructure::banks::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.get("https://bank.example.com/applications/42").await?;
//! ```

use crate::infrastructure::banks::error::{BankError, BankResult};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest slice of an error response body kept in a [`BankError`].
pub const MAX_ERROR_BODY_CHARS: usize = 256;

/// Appends `segments` to `base_url` as percent-encoded path segments.
///
/// # Errors
///
/// Returns `BankError::InvalidRequest` if `base_url` is not an absolute
/// URL that can carry a path.
pub fn resource_url(base_url: &str, segments: &[&str]) -> BankResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| BankError::invalid_request(format!("Invalid base URL {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| BankError::invalid_request(format!("Base URL cannot carry a path: {base_url}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => body.get(..end).unwrap_or(body),
        None => body,
    }
}

/// HTTP client wrapper for bank adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> BankResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BankError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, a protocol error if
    /// the status is not 2xx or the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> BankResult<T> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a POST request with JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, a protocol error if
    /// the status is not 2xx or the body cannot be parsed.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> BankResult<T> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> BankResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| BankError::protocol(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, truncate_body(&error_body)))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> BankError {
        if error.is_timeout() {
            BankError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            BankError::connection(format!("Connection failed: {}", error))
        } else {
            BankError::connection(format!("HTTP request failed: {}", error))
        }
    }

    fn map_status_error(&self, status: StatusCode, body: &str) -> BankError {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                BankError::invalid_request(format!("Bad request: {}", body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                BankError::authentication(format!("Authentication failed: {}", body))
            }
            StatusCode::NOT_FOUND => BankError::protocol(format!("Resource not found: {}", body)),
            StatusCode::TOO_MANY_REQUESTS => BankError::rate_limited("Rate limit exceeded"),
            s if s.is_server_error() => {
                BankError::connection(format!("Server error ({}): {}", status, body))
            }
            _ => BankError::protocol(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        id: String,
    }

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    mod responses {
        use super::*;

        #[tokio::test]
        async fn get_decodes_json() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/things/1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
                .mount(&server)
                .await;

            let client = HttpClient::new(2000).unwrap();
            let echo: Echo = client.get(&format!("{}/things/1", server.uri())).await.unwrap();
            assert_eq!(echo, Echo { id: "1".into() });
        }

        #[tokio::test]
        async fn post_sends_json_body() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/things"))
                .and(header("content-type", "application/json"))
                .and(body_json(serde_json::json!({"name": "x"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "9"})))
                .mount(&server)
                .await;

            let client = HttpClient::new(2000).unwrap();
            let echo: Echo = client
                .post(&format!("{}/things", server.uri()), &serde_json::json!({"name": "x"}))
                .await
                .unwrap();
            assert_eq!(echo.id, "9");
        }

        #[tokio::test]
        async fn undecodable_body_is_protocol_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            let client = HttpClient::new(2000).unwrap();
            let err = client.get::<Echo>(&server.uri()).await.unwrap_err();
            assert!(matches!(err, BankError::Protocol { .. }));
        }
    }

    mod status_mapping {
        use super::*;

        async fn error_for(status: u16) -> BankError {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;
            HttpClient::new(2000)
                .unwrap()
                .get::<Echo>(&server.uri())
                .await
                .unwrap_err()
        }

        #[tokio::test]
        async fn client_errors_are_protocol_class() {
            assert!(matches!(error_for(400).await, BankError::InvalidRequest { .. }));
            assert!(matches!(error_for(401).await, BankError::Authentication { .. }));
            assert!(matches!(error_for(404).await, BankError::Protocol { .. }));
            assert!(matches!(error_for(429).await, BankError::RateLimited { .. }));
        }

        #[tokio::test]
        async fn server_errors_are_connection_errors() {
            let err = error_for(503).await;
            assert!(err.is_transport());
            assert!(err.to_string().contains("nope"));
        }
    }

    mod urls {
        use super::*;

        #[test]
        fn segments_are_percent_encoded() {
            let url = resource_url("http://bank.local/api", &["applications", "a#b?c/d"]).unwrap();
            assert_eq!(url, "http://bank.local/api/applications/a%23b%3Fc%2Fd");
        }

        #[test]
        fn bare_host_gets_single_slash() {
            let url = resource_url("http://bank.local", &["applications"]).unwrap();
            assert_eq!(url, "http://bank.local/applications");
        }

        #[test]
        fn relative_base_rejected() {
            let err = resource_url("bank.local", &["applications"]).unwrap_err();
            assert!(matches!(err, BankError::InvalidRequest { .. }));
        }
    }

    #[tokio::test]
    async fn long_error_body_is_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("é".repeat(10_000)))
            .mount(&server)
            .await;

        let err = HttpClient::new(2000)
            .unwrap()
            .get::<Echo>(&server.uri())
            .await
            .unwrap_err();
        let message = err.to_string();

        assert!(message.contains(&"é".repeat(MAX_ERROR_BODY_CHARS)));
        assert!(!message.contains(&"é".repeat(MAX_ERROR_BODY_CHARS + 1)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "1"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(50).unwrap();
        let err = client.get::<Echo>(&server.uri()).await.unwrap_err();
        assert!(matches!(err, BankError::Timeout { timeout_ms: Some(50), .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_error() {
        let client = HttpClient::new(1000).unwrap();
        let err = client
            .get::<Echo>("http://127.0.0.1:9/unreachable")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
