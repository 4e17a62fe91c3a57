use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stream SDK error type
///
/// Validation variants are returned synchronously by the call that detected the
/// misuse. `Api` is only ever produced once a dispatched request completes.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Malformed feed slug, user id or feed id
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// Client-side mode without a token for the feed
    #[error("Missing token, in client side mode please provide a feed secret")]
    MissingToken,
    /// Server-only operation attempted without an API secret
    #[error("Missing secret: {0}")]
    MissingSecret(String),
    /// Realtime subscription attempted without an application id
    #[error("Missing app id, which is needed to subscribe, use StreamClient::connect(key, secret, app_id)")]
    MissingAppId,
    /// Argument has the wrong shape (e.g. a single value where a list is required)
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),
    /// Redirect target is not an absolute URL
    #[error("Invalid URI: \"{0}\"")]
    InvalidTargetUrl(String),
    /// An API secret was supplied to a client running in an untrusted context
    #[error("You are publicly sharing your private key. Dont use the private key while in the browser.")]
    SecretInUntrustedContext,
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Token could not be minted
    #[error("Signing error: {0}")]
    Signing(String),
    /// Notification channel could not be set up
    #[error("Notification error: {0}")]
    Notification(String),
    /// API request failed (network, HTTP, or response parsing error)
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl From<jsonwebtoken::errors::Error> for StreamError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        StreamError::Signing(err.to_string())
    }
}

/// API-specific errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network error (connection, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response; the full response is kept so callers can inspect the body
    #[error("HTTP {} error: {}", .response.status, .response.body)]
    Http { response: HttpResponse },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Request building failed
    #[error("Request error: {0}")]
    Request(String),
}

impl ApiError {
    /// The response carried by an HTTP error, if any
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::Http { response } => Some(response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            ApiError::Network(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Response returned by a [`Transport`](crate::stream_api::transport::Transport)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded response body (JSON, or a JSON string holding the raw text)
    pub body: serde_json::Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Value of the `stream-auth-type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Compact JWT scoped token
    Jwt,
    /// Legacy HMAC-SHA1 feed token
    Simple,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Jwt => "jwt",
            AuthType::Simple => "simple",
        }
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
