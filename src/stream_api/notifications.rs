//! Realtime notification plumbing
//!
//! The pub/sub wire client is pluggable through [`NotificationConnector`]. This module
//! owns the part that is specific to the feed service: a registry of per-channel grants
//! and an outgoing extension that authorizes subscription messages with them.

use crate::stream_api::types::StreamError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Handler for messages delivered on a channel
pub type MessageCallback = Box<dyn Fn(serde_json::Value) + Send + Sync>;

/// Handle for an active subscription
pub trait Subscription: Send + Sync {
    fn channel(&self) -> &str;
    fn cancel(&self);
}

/// Hook over messages exchanged with the pub/sub server
pub trait MessageExtension: Send + Sync {
    fn incoming(&self, message: serde_json::Value) -> serde_json::Value {
        message
    }

    fn outgoing(&self, message: serde_json::Value) -> serde_json::Value;
}

/// A connected pub/sub client
pub trait NotificationClient: Send + Sync {
    fn add_extension(&self, extension: Arc<dyn MessageExtension>);

    fn subscribe(
        &self,
        channel: &str,
        callback: Option<MessageCallback>,
    ) -> Result<Box<dyn Subscription>, StreamError>;
}

/// Creates [`NotificationClient`]s for an endpoint URL
pub trait NotificationConnector: Send + Sync {
    fn connect(&self, url: &str) -> Result<Arc<dyn NotificationClient>, StreamError>;
}

/// Credentials used to authorize one channel subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionGrant {
    pub user_id: String,
    pub token: String,
}

/// Channel path (`/site-...-feed-...`) to grant
///
/// Written when a feed subscribes and read by the outgoing extension, possibly from
/// another thread.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    grants: RwLock<HashMap<String, SubscriptionGrant>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the grant for a channel
    pub fn register(&self, channel: impl Into<String>, grant: SubscriptionGrant) {
        let channel = channel.into();
        tracing::debug!("Registering subscription grant for channel {}", channel);
        let mut grants = self.grants.write().unwrap_or_else(|e| e.into_inner());
        grants.insert(channel, grant);
    }

    pub fn get(&self, channel: &str) -> Option<SubscriptionGrant> {
        let grants = self.grants.read().unwrap_or_else(|e| e.into_inner());
        grants.get(channel).cloned()
    }

    pub fn len(&self) -> usize {
        self.grants.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outgoing extension adding `ext: {user_id, api_key, signature}` to messages whose
/// `subscription` field names a registered channel
#[derive(Debug, Clone)]
pub struct SubscriptionAuthorization {
    api_key: String,
    registry: Arc<SubscriptionRegistry>,
}

impl SubscriptionAuthorization {
    pub fn new(api_key: impl Into<String>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            api_key: api_key.into(),
            registry,
        }
    }
}

impl MessageExtension for SubscriptionAuthorization {
    fn outgoing(&self, mut message: serde_json::Value) -> serde_json::Value {
        let grant = message
            .get("subscription")
            .and_then(|s| s.as_str())
            .and_then(|channel| self.registry.get(channel));

        if let (Some(grant), Some(fields)) = (grant, message.as_object_mut()) {
            tracing::debug!("Authorizing subscription for user {}", grant.user_id);
            fields.insert(
                "ext".to_string(),
                serde_json::json!({
                    "user_id": grant.user_id,
                    "api_key": self.api_key,
                    "signature": grant.token,
                }),
            );
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_with_grant() -> Arc<SubscriptionRegistry> {
        let registry = Arc::new(SubscriptionRegistry::new());
        registry.register(
            "/site-1-feed-user1",
            SubscriptionGrant {
                user_id: "1".to_string(),
                token: "token".to_string(),
            },
        );
        registry
    }

    #[test]
    fn test_registry_replaces_grant() {
        let registry = registry_with_grant();
        registry.register(
            "/site-1-feed-user1",
            SubscriptionGrant {
                user_id: "1".to_string(),
                token: "newer".to_string(),
            },
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("/site-1-feed-user1").unwrap().token, "newer");
    }

    #[test]
    fn test_outgoing_adds_ext_for_registered_channel() {
        let extension = SubscriptionAuthorization::new("key", registry_with_grant());
        let message = extension.outgoing(json!({
            "channel": "/meta/subscribe",
            "subscription": "/site-1-feed-user1"
        }));
        assert_eq!(
            message["ext"],
            json!({"user_id": "1", "api_key": "key", "signature": "token"})
        );
    }

    #[test]
    fn test_outgoing_passes_through_unknown_channel() {
        let extension = SubscriptionAuthorization::new("key", registry_with_grant());
        let original = json!({"channel": "/meta/subscribe", "subscription": "/other"});
        assert_eq!(extension.outgoing(original.clone()), original);

        let handshake = json!({"channel": "/meta/handshake"});
        assert_eq!(extension.outgoing(handshake.clone()), handshake);
    }

    #[test]
    fn test_incoming_is_passthrough() {
        let extension = SubscriptionAuthorization::new("key", registry_with_grant());
        let message = json!({"data": [1, 2]});
        assert_eq!(extension.incoming(message.clone()), message);
    }
}
