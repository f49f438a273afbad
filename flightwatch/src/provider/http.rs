//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use super::types::ProviderError;

/// Default request timeout for provider calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request with custom headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Slice of (header_name, header_value) tuples
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP POST request with JSON body.
    fn post_json(
        &self,
        url: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default 10 second timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flightwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::unreachable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status.as_u16(), url));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| map_request_error(&e, url))
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, ProviderError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| map_request_error(&e, url))?;
        Self::read_body(response, url).await
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string())
            .send()
            .await
            .map_err(|e| map_request_error(&e, url))?;

        Self::read_body(response, url).await
    }
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn error_for_status(status: u16, url: &str) -> ProviderError {
    let detail = format!("HTTP {} from {}", status, url);
    match status {
        429 => ProviderError::rate_limited(detail),
        404 => ProviderError::not_found(detail),
        500..=599 => ProviderError::unreachable(detail),
        _ => ProviderError::invalid(detail),
    }
}

fn map_request_error(e: &reqwest::Error, url: &str) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request to {} timed out", url))
    } else if e.is_decode() || e.is_body() {
        ProviderError::invalid(format!("Failed to read response from {}: {}", url, e))
    } else {
        ProviderError::unreachable(format!("Request to {} failed: {}", url, e))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;
    use parking_lot::Mutex;

    /// Mock HTTP client for testing
    pub struct MockAsyncHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        pub requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockAsyncHttpClient {
        pub fn with_body(body: &str) -> Self {
            Self {
                response: Ok(body.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_error(error: ProviderError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn last_url(&self) -> Option<String> {
            self.requests.lock().last().map(|(url, _)| url.clone())
        }

        pub fn last_header(&self, name: &str) -> Option<String> {
            self.requests.lock().last().and_then(|(_, headers)| {
                headers
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
            })
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get_with_headers(
            &self,
            url: &str,
            headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
            ));
            self.response.clone()
        }

        async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests
                .lock()
                .push((url.to_string(), vec![("body".to_string(), json_body.to_string())]));
            self.response.clone()
        }
    }

    #[test]
    fn test_error_for_status_mapping() {
        assert_eq!(error_for_status(429, "u").kind, ProviderErrorKind::RateLimited);
        assert_eq!(error_for_status(404, "u").kind, ProviderErrorKind::NotFound);
        assert_eq!(error_for_status(503, "u").kind, ProviderErrorKind::Unreachable);
        assert_eq!(error_for_status(401, "u").kind, ProviderErrorKind::Invalid);
    }

    #[tokio::test]
    async fn test_mock_client_records_request() {
        let mock = MockAsyncHttpClient::with_body("{}");

        let result = mock
            .get_with_headers("http://example.com", &[("x-apikey", "secret")])
            .await;

        assert_eq!(result.unwrap(), b"{}".to_vec());
        assert_eq!(mock.last_url().as_deref(), Some("http://example.com"));
        assert_eq!(mock.last_header("x-apikey").as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockAsyncHttpClient::with_error(ProviderError::timeout("slow"));

        let result = mock.get_with_headers("http://example.com", &[]).await;
        assert_eq!(result.unwrap_err().kind, ProviderErrorKind::Timeout);
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(AsyncReqwestClient::with_timeout(Duration::from_secs(1)).is_ok());
    }
}
