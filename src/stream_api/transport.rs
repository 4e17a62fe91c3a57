//! HTTP transport seam and completion plumbing

use crate::stream_api::request::{Method, RequestDescriptor, SignedRequest};
use crate::stream_api::types::{ApiError, HttpResponse, StreamError};
use std::future::Future;
use std::pin::Pin;

/// Future returned by every dispatched request
///
/// Resolves to the response body on 2xx, to `StreamError::Api` otherwise.
pub type ResponseFuture =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, StreamError>> + Send + 'static>>;

/// Optional completion callback, invoked exactly once with `(error, response)`
/// regardless of status. The body is `response.body`.
pub type ResponseCallback =
    Box<dyn FnOnce(Option<&ApiError>, Option<&HttpResponse>) + Send + 'static>;

/// Sends a [`SignedRequest`] and returns the raw outcome
///
/// Non-2xx statuses are not errors at this level; only failures that produced no
/// response are.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: SignedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, ApiError>> + Send + '_>>;
}

/// Cross-cutting observation of every dispatch
///
/// Both hooks run inside the response future, so a future dropped before its
/// first poll is never observed. Each observed request gets exactly one
/// `on_response`.
pub trait RequestObserver: Send + Sync {
    /// Called on first poll, before the descriptor is enriched
    fn on_request(&self, _method: Method, _descriptor: &RequestDescriptor) {}

    /// Called once the transport completes, before the callback
    fn on_response(&self, _outcome: Result<&HttpResponse, &ApiError>) {}
}

/// [`Transport`] backed by `reqwest`
///
/// The underlying client has no cookie store, so requests carry only explicit headers.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: SignedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, ApiError>> + Send + '_>> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self
                .client
                .request(method, &request.url)
                .query(&request.query);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if request.json {
                builder = builder.header("Accept", "application/json");
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| {
                tracing::error!("Failed to send {} {}: {}", request.method, request.url, e);
                ApiError::from(e)
            })?;

            let status = response.status().as_u16();
            let text = response.text().await.map_err(|e| {
                tracing::error!("Failed to read response body: {}", e);
                ApiError::Parse(format!("Failed to read response: {}", e))
            })?;

            tracing::debug!(
                "Received response for {} {}: status={}",
                request.method,
                request.url,
                status
            );

            Ok(HttpResponse::new(status, decode_body(&text)))
        })
    }
}

fn decode_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

/// Turn a transport outcome into the future's result
pub(crate) fn settle(
    outcome: &Result<HttpResponse, ApiError>,
) -> Result<serde_json::Value, StreamError> {
    match outcome {
        Ok(response) if response.is_success() => Ok(response.body.clone()),
        Ok(response) => {
            tracing::warn!("Request failed: HTTP {} - {}", response.status, response.body);
            Err(StreamError::Api(ApiError::Http {
                response: response.clone(),
            }))
        }
        Err(e) => Err(StreamError::Api(e.clone())),
    }
}
