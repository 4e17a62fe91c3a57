//! Request descriptors and their enrichment with authorization material

use crate::stream_api::signing;
use crate::stream_api::types::{AuthType, StreamError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Header carrying the auth type marker
pub const AUTH_TYPE_HEADER: &str = "stream-auth-type";
/// Header carrying the client identification string
pub const CLIENT_HEADER: &str = "X-Stream-Client";

/// HTTP method of a dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound call before authorization is attached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    /// Path relative to `{baseUrl}{version}/`
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    /// Per-call signature, wins over the client-wide default
    pub signature: Option<String>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// A fully authorized request, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub method: Method,
    pub url: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub auth_type: AuthType,
    /// Bodies are sent and read as JSON
    pub json: bool,
    /// Always false: no cookies or other ambient session state
    pub with_credentials: bool,
}

impl SignedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header("Authorization")
    }
}

/// Client-side inputs needed to enrich a descriptor
#[derive(Debug, Clone, Copy)]
pub struct Enricher<'a> {
    pub base_url: &'a str,
    pub version: &'a str,
    pub api_key: &'a str,
    pub group: &'a str,
    pub default_signature: Option<&'a str>,
}

impl Enricher<'_> {
    /// `{baseUrl}{version}/{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, self.version, path)
    }

    /// Attach endpoint, query credentials and authorization headers
    pub fn enrich(&self, method: Method, descriptor: RequestDescriptor) -> SignedRequest {
        let RequestDescriptor {
            path,
            mut query,
            body,
            signature,
        } = descriptor;

        query.insert("api_key".to_string(), self.api_key.to_string());
        query.insert("location".to_string(), self.group.to_string());

        let signature = signature
            .as_deref()
            .or(self.default_signature)
            .unwrap_or_default();
        let auth_type = signing::auth_type(signature);
        let authorization = match auth_type {
            AuthType::Jwt => signing::signature_token(signature),
            AuthType::Simple => signature,
        };

        let mut headers = BTreeMap::new();
        headers.insert(AUTH_TYPE_HEADER.to_string(), auth_type.as_str().to_string());
        headers.insert("Authorization".to_string(), authorization.to_string());
        headers.insert(CLIENT_HEADER.to_string(), user_agent());

        let url = self.url(&path);
        tracing::debug!(
            "Enriched {} request: url={}, auth_type={}, signature_length={}",
            method,
            url,
            auth_type,
            authorization.len()
        );

        SignedRequest {
            method,
            url,
            query,
            headers,
            body,
            auth_type,
            json: true,
            with_credentials: false,
        }
    }
}

/// Serialize a request body
pub(crate) fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, StreamError> {
    serde_json::to_value(value)
        .map_err(|e| StreamError::InvalidArgumentType(format!("Failed to serialize body: {}", e)))
}

/// Client identification: library name, runtime and version
pub fn user_agent() -> String {
    let runtime = if cfg!(target_arch = "wasm32") {
        "wasm"
    } else {
        "native"
    };
    format!(
        "stream-rust-client-{}-{}",
        runtime,
        env!("CARGO_PKG_VERSION")
    )
}
