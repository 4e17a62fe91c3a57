//! Stream SDK
//!
//! A Rust client library for the Stream activity feed API.
//!
//! This SDK provides:
//! - Legacy HMAC-SHA1 feed tokens and HS256 scoped JWT tokens
//! - Feed handles for adding, reading and removing activities and managing follows
//! - Cross-feed batch operations (add to many, follow many, update activities)
//! - Request enrichment with auth headers over a pluggable HTTP transport
//! - Realtime subscription authorization for an external pub/sub client
//!
//! # Example
//!
//! ```no_run
//! use stream_sdk::{Activity, BatchOperations, Follow, GetOptions, StreamClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamClient::connect("api-key", Some("api-secret"), Some("1234"))?;
//!
//! // Post to a feed, signed with its legacy token
//! let feed = client.feed("user", "1")?;
//! let activity = Activity::new("user:1", "tweet", "tweet:1").with_to(["global:all"]);
//! feed.add_activity(activity, None)?.await?;
//!
//! // Read it back
//! let page = feed.get(&GetOptions::new().with_limit(10), None)?.await?;
//! println!("{}", page);
//!
//! // Follow many feeds in one request
//! client
//!     .follow_many(&[Follow::new("flat:1", "user:1")], Some(20), None)?
//!     .await?;
//!
//! // Hand a read-only token to a browser
//! let token = client.get_read_only_token("user", "1")?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```

pub mod stream_api;
pub mod validation;

// Re-export commonly used types and functions
pub use stream_api::{
    batch::BatchOperations,
    client::{FeedOptions, StreamClient, StreamClientBuilder},
    config::{ClientOptions, Credentials},
    feed::Feed,
    notifications::{
        MessageCallback, MessageExtension, NotificationClient, NotificationConnector,
        Subscription, SubscriptionAuthorization, SubscriptionGrant, SubscriptionRegistry,
    },
    request::{Method, RequestDescriptor, SignedRequest},
    resources::{
        Activity, ActivityRef, Follow, FollowListOptions, FollowOptions, GetOptions, Mark,
        UnfollowOptions,
    },
    signing::{decode_header, is_scoped_token, sign_legacy, sign_scoped, ScopeClaims, ScopeOptions},
    transport::{RequestObserver, ReqwestTransport, ResponseCallback, ResponseFuture, Transport},
    types::{ApiError, AuthType, HttpResponse, StreamError},
};
pub use validation::{escape, parse_feed_id, validate_token, FeedId};
