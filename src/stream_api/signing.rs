//! Token minting and classification
//!
//! Two token formats are in use:
//! - **Legacy** tokens: HMAC-SHA1 over the feed subject, keyed by SHA1(secret),
//!   base64url encoded without padding. Unscoped, full access to one feed.
//! - **Scoped** tokens: HS256 compact JWTs carrying `{resource, action, feed_id?, user_id?}`.
//!
//! Both are deterministic for the same inputs unless an issued-at timestamp is requested.

use crate::stream_api::types::{AuthType, StreamError};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use once_cell::sync::Lazy;
use regex::Regex;
use ring::{digest, hmac};
use serde::{Deserialize, Serialize};

/// Wildcard resource or action
pub const WILDCARD: &str = "*";
/// Read-only action
pub const ACTION_READ: &str = "read";
/// Resource used for bulk activity updates
pub const RESOURCE_ACTIVITIES: &str = "activities";
/// Resource used for analytics redirect links
pub const RESOURCE_REDIRECT_AND_TRACK: &str = "redirect_and_track";

static JWS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\-_]+?\.[a-zA-Z0-9\-_]+?\.([a-zA-Z0-9\-_]+)?$")
        .expect("JWS pattern is valid")
});

/// Options for [`sign_scoped`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOptions {
    /// Feed the grant is bound to (`slug` + `userId`, or `*`)
    pub feed_id: Option<String>,
    /// User the grant is bound to
    pub user_id: Option<String>,
    /// Add an `iat` claim. When false the claim is omitted entirely.
    pub include_timestamp: bool,
}

impl ScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed_id(mut self, feed_id: impl Into<String>) -> Self {
        self.feed_id = Some(feed_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_timestamp(mut self, include_timestamp: bool) -> Self {
        self.include_timestamp = include_timestamp;
        self
    }
}

/// Claim set of a scoped token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeClaims {
    pub resource: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Compute the legacy token for a signing subject
///
/// digest = HMAC-SHA1(key = SHA1(secret), message = subject), base64url without padding.
pub fn sign_legacy(secret: &str, subject: &str) -> String {
    let hashed_secret = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, secret.as_bytes());
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, hashed_secret.as_ref());
    let tag = hmac::sign(&key, subject.as_bytes());
    URL_SAFE_NO_PAD.encode(tag.as_ref())
}

/// Mint a scoped HS256 token
///
/// Empty `feed_id`/`user_id` values are treated as absent.
pub fn sign_scoped(
    secret: &str,
    resource: &str,
    action: &str,
    options: &ScopeOptions,
) -> Result<String, StreamError> {
    let claims = ScopeClaims {
        resource: resource.to_string(),
        action: action.to_string(),
        feed_id: options.feed_id.clone().filter(|id| !id.is_empty()),
        user_id: options.user_id.clone().filter(|id| !id.is_empty()),
        iat: options
            .include_timestamp
            .then(|| chrono::Utc::now().timestamp()),
    };

    tracing::debug!(
        "Minting scoped token: resource={}, action={}, feed_id={:?}, user_id={:?}, iat={}",
        claims.resource,
        claims.action,
        claims.feed_id,
        claims.user_id,
        claims.iat.is_some()
    );

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Strip an optional `"label "` prefix from a signature
///
/// Only the substring after the last space is the actual token.
pub fn signature_token(signature: &str) -> &str {
    signature.rsplit(' ').next().unwrap_or(signature)
}

/// Whether a (possibly labeled) signature is a compact JWT
///
/// Requires the three-segment base64url shape and a first segment that decodes to a
/// JSON object. Never fails; malformed input is simply not a scoped token.
pub fn is_scoped_token(signature: &str) -> bool {
    let token = signature_token(signature);
    JWS_REGEX.is_match(token) && decode_header(token).is_some()
}

/// Auth type marker for a signature
pub fn auth_type(signature: &str) -> AuthType {
    if is_scoped_token(signature) {
        AuthType::Jwt
    } else {
        AuthType::Simple
    }
}

/// Decode the JWT header (first dot-segment) of a signature
///
/// Accepts padded and unpadded base64url. Returns `None` for anything that does not
/// decode to a JSON object.
pub fn decode_header(signature: &str) -> Option<serde_json::Value> {
    let encoded = signature.split('.').next()?;
    let bytes = decode_base64url(encoded)?;
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(header) if header.is_object() => Some(header),
        _ => None,
    }
}

fn decode_base64url(input: &str) -> Option<Vec<u8>> {
    let mut padded = input.replace('-', "+").replace('_', "/");
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    STANDARD.decode(padded.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "tfq2sdqpj9g446sbv653x3aqmgn33hsn8uzdc9jpskaw8mj6vsnhzswuwptuj9su";

    #[test]
    fn test_sign_legacy_known_vector() {
        assert_eq!(sign_legacy(SECRET, "flat1"), "UbbVK4LVON51gMXjuKViTDHxo9s");
    }

    #[test]
    fn test_sign_legacy_is_url_safe() {
        for subject in ["user1", "flat1", "aggregated42", "notification_x-y"] {
            let token = sign_legacy("some secret", subject);
            assert!(!token.contains('+'));
            assert!(!token.contains('/'));
            assert!(!token.starts_with('='));
            assert!(!token.ends_with('='));
        }
    }

    #[test]
    fn test_sign_scoped_omits_absent_claims() {
        let token = sign_scoped(SECRET, "*", "read", &ScopeOptions::new()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let claims: serde_json::Value =
            serde_json::from_slice(&decode_base64url(payload).unwrap()).unwrap();
        assert_eq!(claims, serde_json::json!({"resource": "*", "action": "read"}));
    }

    #[test]
    fn test_sign_scoped_with_timestamp_sets_iat() {
        let options = ScopeOptions::new().with_feed_id("user1").with_timestamp(true);
        let token = sign_scoped(SECRET, "*", "*", &options).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let claims: ScopeClaims =
            serde_json::from_slice(&decode_base64url(payload).unwrap()).unwrap();
        assert!(claims.iat.is_some());
        assert_eq!(claims.feed_id.as_deref(), Some("user1"));
    }

    #[test]
    fn test_signature_token_strips_label() {
        assert_eq!(signature_token("feedname abc.def.ghi"), "abc.def.ghi");
        assert_eq!(signature_token("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(signature_token("a b c"), "c");
    }

    #[test]
    fn test_decode_header_padded_and_unpadded() {
        // {"a":1}
        let unpadded = "eyJhIjoxfQ";
        let padded = "eyJhIjoxfQ==";
        assert_eq!(decode_header(unpadded).unwrap()["a"], 1);
        assert_eq!(decode_header(&format!("{}.x.y", padded)).unwrap()["a"], 1);
        assert_eq!(decode_header("eyJhbGciOiJIUzI1NiJ9").unwrap()["alg"], "HS256");
    }

    #[test]
    fn test_decode_header_rejects_garbage() {
        assert!(decode_header("").is_none());
        assert!(decode_header("a").is_none());
        assert!(decode_header("bm90IGpzb24.x.y").is_none());
        // "123" is valid JSON but not a header object
        assert!(decode_header("MTIz.x.y").is_none());
    }

    #[test]
    fn test_auth_type_classification() {
        let jwt = sign_scoped(SECRET, "*", "*", &ScopeOptions::new()).unwrap();
        assert_eq!(auth_type(&jwt), AuthType::Jwt);
        assert_eq!(auth_type(&sign_legacy(SECRET, "user1")), AuthType::Simple);
    }
}
