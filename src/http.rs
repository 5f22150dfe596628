//! HTTP client abstraction for talking to the brand provider and asset hosts.
//!
//! This module defines the `HttpClient` trait to abstract request execution,
//! enabling testability with mock implementations.

use crate::error::{LogoFetcherError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A read request against the provider or an asset host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Fully-qualified URL
    pub url: String,
    /// Value for the `Accept` header, if any
    pub accept: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accept: None,
        }
    }

    /// Ask for a JSON body (`Accept: application/json`).
    pub fn accept_json(mut self) -> Self {
        self.accept = Some("application/json".to_string());
        self
    }
}

/// Response from an HTTP request.
///
/// The body is buffered as raw bytes since asset downloads are binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| LogoFetcherError::Decode(format!("Malformed response body: {}", e)))
    }
}

/// Trait for executing HTTP requests.
///
/// This abstraction allows for different implementations (production vs. testing)
/// and keeps the lookup client testable without making real HTTP calls.
///
/// # Example
/// ```ignore
/// let client = ReqwestHttpClient::new();
/// let request = HttpRequest::get("https://api.brandfetch.io/v2/brands/acme.com").accept_json();
/// let response = client.execute(&request, "api-key", 5000).await?;
/// println!("Status: {}, {} bytes", response.status, response.body.len());
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync + Clone {
    /// Execute a GET request.
    ///
    /// # Arguments
    /// * `request` - URL and accepted content type
    /// * `api_key` - Sent as `Authorization: Bearer` when non-empty
    /// * `timeout_ms` - Request timeout in milliseconds
    ///
    /// # Errors
    /// Returns an error if the request fails due to network issues, times out,
    /// or the URL is invalid. Non-2xx statuses are returned as responses.
    async fn execute(
        &self,
        request: &HttpRequest,
        api_key: &str,
        timeout_ms: u64,
    ) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request, api_key), fields(url = %request.url))]
    async fn execute(
        &self,
        request: &HttpRequest,
        api_key: &str,
        timeout_ms: u64,
    ) -> Result<HttpResponse> {
        tracing::debug!(timeout_ms = timeout_ms, "Executing HTTP request");

        let mut req = self
            .client
            .get(&request.url)
            .timeout(Duration::from_millis(timeout_ms));

        if let Some(accept) = &request.accept {
            req = req.header(reqwest::header::ACCEPT, accept);
        }

        // Only add Authorization header if api_key is not empty
        if !api_key.is_empty() {
            req = req.bearer_auth(api_key);
            tracing::trace!("Added Authorization header");
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %request.url, error = %e, "HTTP request failed");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            status = status,
            response_len = body.len(),
            "HTTP request completed"
        );

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// Mock HTTP client for testing.
///
/// Responses are keyed by URL and served in FIFO order, so a URL requested
/// twice (duplicate company names) can be scripted with two answers.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.add_json("https://api.example.com/search/Acme", 200, json!([{"domain": "acme.com"}]));
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<MockResponse>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    in_flight: Arc<AtomicUsize>,
}

/// A mock response that can optionally wait for a trigger before completing.
enum MockResponse {
    Immediate(Result<HttpResponse>),
    Triggered {
        response: Result<HttpResponse>,
        trigger: oneshot::Receiver<()>,
    },
}

/// Record of a call made to the mock HTTP client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub url: String,
    pub accept: Option<String>,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a predetermined response for a URL.
    pub fn add_response(&self, url: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(url.to_string())
            .or_default()
            .push(MockResponse::Immediate(response));
    }

    /// Queue a JSON response with the given status.
    pub fn add_json(&self, url: &str, status: u16, body: serde_json::Value) {
        self.add_response(
            url,
            Ok(HttpResponse {
                status,
                body: body.to_string().into_bytes(),
            }),
        );
    }

    /// Queue a raw-bytes 200 response (asset downloads).
    pub fn add_bytes(&self, url: &str, body: Vec<u8>) {
        self.add_response(url, Ok(HttpResponse { status: 200, body }));
    }

    /// Queue a response that will wait for a manual trigger before completing.
    ///
    /// Returns a sender that when triggered (by sending `()` or dropping) will
    /// cause the request to complete with the given response.
    pub fn add_response_with_trigger(
        &self,
        url: &str,
        response: Result<HttpResponse>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .lock()
            .entry(url.to_string())
            .or_default()
            .push(MockResponse::Triggered {
                response,
                trigger: rx,
            });
        tx
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made to a given URL.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.url == url).count()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Get the number of requests currently in-flight (executing).
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(
        &self,
        request: &HttpRequest,
        api_key: &str,
        timeout_ms: u64,
    ) -> Result<HttpResponse> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        // Guard to ensure we decrement even if cancelled/panicked
        let _guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
        };

        self.calls.lock().push(MockCall {
            url: request.url.clone(),
            accept: request.accept.clone(),
            api_key: api_key.to_string(),
            timeout_ms,
        });

        let mock_response = {
            let mut responses = self.responses.lock();
            responses
                .get_mut(&request.url)
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };

        match mock_response {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Triggered { response, trigger }) => {
                // Proceed whether the trigger fired or was dropped
                let _ = trigger.await;
                response
            }
            None => Err(LogoFetcherError::Transport(format!(
                "No mock response configured for {}",
                request.url
            ))),
        }
    }
}

/// Guard that decrements the in-flight counter when dropped.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_basic() {
        let mock = MockHttpClient::new();
        mock.add_json(
            "https://api.example.com/search/acme",
            200,
            serde_json::json!([{ "domain": "acme.com" }]),
        );

        let request = HttpRequest::get("https://api.example.com/search/acme").accept_json();
        let response = mock.execute(&request, "", 5000).await.unwrap();
        assert!(response.is_success());
        let hits: serde_json::Value = response.json().unwrap();
        assert_eq!(hits[0]["domain"], "acme.com");

        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].accept.as_deref(), Some("application/json"));
        assert_eq!(calls[0].api_key, "");
        assert_eq!(calls[0].timeout_ms, 5000);
    }

    #[tokio::test]
    async fn test_mock_client_fifo_responses() {
        let mock = MockHttpClient::new();
        mock.add_bytes("https://cdn.example.com/logo.png", b"first".to_vec());
        mock.add_bytes("https://cdn.example.com/logo.png", b"second".to_vec());

        let request = HttpRequest::get("https://cdn.example.com/logo.png");
        let first = mock.execute(&request, "", 5000).await.unwrap();
        let second = mock.execute(&request, "", 5000).await.unwrap();
        assert_eq!(first.body, b"first");
        assert_eq!(second.body, b"second");
        assert_eq!(mock.calls_to("https://cdn.example.com/logo.png"), 2);
    }

    #[tokio::test]
    async fn test_mock_client_no_response() {
        let mock = MockHttpClient::new();
        let request = HttpRequest::get("https://api.example.com/unknown");
        let result = mock.execute(&request, "key", 5000).await;
        assert!(matches!(result, Err(LogoFetcherError::Transport(_))));
    }

    #[tokio::test]
    async fn test_mock_client_with_trigger() {
        let mock = MockHttpClient::new();
        let trigger = mock.add_response_with_trigger(
            "https://api.example.com/slow",
            Ok(HttpResponse {
                status: 200,
                body: b"triggered".to_vec(),
            }),
        );

        let mock_clone = mock.clone();
        let handle = tokio::spawn(async move {
            let request = HttpRequest::get("https://api.example.com/slow");
            mock_clone.execute(&request, "key", 5000).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());
        assert_eq!(mock.in_flight_count(), 1);

        trigger.send(()).unwrap();

        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.body, b"triggered");
        assert_eq!(mock.in_flight_count(), 0);
    }

    #[test]
    fn test_response_json_decode_error() {
        let response = HttpResponse {
            status: 200,
            body: b"<html>".to_vec(),
        };
        let parsed: Result<serde_json::Value> = response.json();
        assert!(matches!(parsed, Err(LogoFetcherError::Decode(_))));
    }
}
