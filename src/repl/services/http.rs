//! # HTTP Service
//!
//! Sends analysis requests to the remote service. One attempt per call, a fixed
//! time budget, JSON in and JSON out. Failures come back as a raw
//! [`TransportFailure`] for the classifier; this module never touches caller state.

use crate::config::REQUEST_TIMEOUT;
use crate::repl::models::{AnalysisRequest, RawResult, TransportFailure, TransportResult};
use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use std::future::Future;
use std::time::Duration;

/// Seam between the controller and whatever carries requests to the service
pub trait AnalysisTransport: Send + Sync {
    /// Dispatch one request. The returned future owns everything it needs,
    /// so the caller may keep mutating its own state while it is pending.
    fn send(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = TransportResult> + Send + 'static;
}

/// Transport backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    /// Create a service for `base_url` with the standard 10 second budget
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a service with a custom time budget
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        tracing::debug!("Creating HTTP client with timeout {:?}", timeout);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the service address and an endpoint path without doubling slashes
    pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, String> {
        let joined = format!(
            "{}/{}",
            base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| format!("invalid service address '{base_url}': {e}"))
    }

    async fn execute(client: Client, url: Url, body: Vec<u8>) -> TransportResult {
        let response = client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| failure_from_reqwest(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| body_failure(&e))?;

        if status.is_success() {
            Ok(decode_body(text))
        } else {
            Err(server_error(status, text))
        }
    }
}

impl AnalysisTransport for HttpService {
    fn send(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = TransportResult> + Send + 'static {
        let client = self.client.clone();
        let url = Self::endpoint_url(&self.base_url, request.endpoint_path());
        let body = serde_json::to_vec(request.fields());
        let mode = request.mode();

        async move {
            let url = url.map_err(|message| TransportFailure::SetupError { message })?;
            let body = body.map_err(|e| TransportFailure::SetupError {
                message: e.to_string(),
            })?;

            tracing::info!("Dispatching {} analysis to {}", mode, url);
            let result = Self::execute(client, url, body).await;
            match &result {
                Ok(_) => tracing::info!("{} analysis answered", mode),
                Err(failure) => tracing::warn!("{} analysis failed: {}", mode, failure.kind()),
            }
            result
        }
    }
}

/// A body that is not JSON is kept as a JSON string, like a browser client would
fn decode_body(text: String) -> RawResult {
    serde_json::from_str(&text).unwrap_or(RawResult::String(text))
}

fn server_error(status: StatusCode, text: String) -> TransportFailure {
    let body = if text.trim().is_empty() {
        None
    } else {
        Some(decode_body(text))
    };
    TransportFailure::ServerError {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        body,
    }
}

/// The service answered but its body could not be read
fn body_failure(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::SetupError {
            message: format!("response body could not be read: {error}"),
        }
    }
}

fn failure_from_reqwest(error: &reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_builder() {
        TransportFailure::SetupError {
            message: error.to_string(),
        }
    } else {
        tracing::debug!("No response from service: {error}");
        TransportFailure::NoResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_url_should_not_double_slashes() {
        let url = HttpService::endpoint_url("http://localhost:8000/", "/compare/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/compare/");

        let url = HttpService::endpoint_url("http://host/api", "/ai/summary/").unwrap();
        assert_eq!(url.as_str(), "http://host/api/ai/summary/");
    }

    #[test]
    fn endpoint_url_should_reject_garbage_address() {
        let err = HttpService::endpoint_url("not a url", "/indent/").unwrap_err();
        assert!(err.contains("not a url"));
    }

    #[test]
    fn decode_body_should_keep_non_json_as_string() {
        assert_eq!(decode_body("{\"a\":1}".to_string()), json!({"a": 1}));
        assert_eq!(
            decode_body("Internal oops".to_string()),
            json!("Internal oops")
        );
    }

    #[test]
    fn server_error_should_drop_blank_body() {
        let failure = server_error(StatusCode::INTERNAL_SERVER_ERROR, "  ".to_string());
        assert_eq!(
            failure,
            TransportFailure::ServerError {
                status: 500,
                status_text: "Internal Server Error".to_string(),
                body: None,
            }
        );
    }

    #[tokio::test]
    async fn send_should_surface_bad_address_as_setup_error() {
        let service = HttpService::new("::::").unwrap();
        let request = AnalysisRequest::build(crate::repl::models::Mode::Syntax, "x", "");
        let result = service.send(&request).await;
        assert!(matches!(result, Err(TransportFailure::SetupError { .. })));
    }
}
