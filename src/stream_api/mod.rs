/// Stream activity feed API integration module
///
/// This module provides the client, feed handles, token signing and request
/// enrichment used to talk to the feed service.
///
/// ## Authorization
///
/// 1. In server mode the client holds the API secret and mints feed tokens itself
/// 2. Feed handles carry a legacy HMAC token, or a scoped JWT when read-only
/// 3. Cross-feed batch calls are signed with scoped wildcard tokens
/// 4. In client mode every feed needs a token issued elsewhere
pub mod batch;
pub mod client;
pub mod config;
pub mod feed;
pub mod notifications;
pub mod request;
pub mod resources;
pub mod signing;
pub mod transport;
pub mod types;

pub use batch::BatchOperations;
pub use client::{FeedOptions, StreamClient, StreamClientBuilder};
pub use config::{ClientOptions, Credentials};
pub use feed::Feed;
pub use resources::*;
pub use types::{ApiError, AuthType, HttpResponse, StreamError};
