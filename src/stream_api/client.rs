use crate::stream_api::config::{ClientOptions, Credentials};
use crate::stream_api::feed::Feed;
use crate::stream_api::notifications::{
    NotificationClient, NotificationConnector, SubscriptionAuthorization, SubscriptionGrant,
    SubscriptionRegistry,
};
use crate::stream_api::request::{Enricher, Method, RequestDescriptor};
use crate::stream_api::resources::Activity;
use crate::stream_api::signing::{
    self, ScopeOptions, ACTION_READ, RESOURCE_REDIRECT_AND_TRACK, WILDCARD,
};
use crate::stream_api::transport::{
    settle, RequestObserver, ReqwestTransport, ResponseCallback, ResponseFuture, Transport,
};
use crate::stream_api::types::StreamError;
use crate::validation::{self, FeedId};
use once_cell::sync::OnceCell;
use secrecy::ExposeSecret;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Stream API client
///
/// Cheap to clone; clones share credentials, transport and the subscription registry.
#[derive(Clone)]
pub struct StreamClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    credentials: Credentials,
    options: ClientOptions,
    base_url: String,
    default_signature: Option<String>,
    transport: Arc<dyn Transport>,
    observers: Vec<Arc<dyn RequestObserver>>,
    subscriptions: Arc<SubscriptionRegistry>,
    notification_connector: Option<Arc<dyn NotificationConnector>>,
    notification_client: OnceCell<Arc<dyn NotificationClient>>,
}

impl fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamClient")
            .field("api_key", &self.inner.credentials.api_key)
            .field("app_id", &self.inner.credentials.app_id)
            .field("server_mode", &self.is_server_mode())
            .field("base_url", &self.inner.base_url)
            .finish()
    }
}

/// Per-feed options for [`StreamClient::feed_with_options`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedOptions {
    /// Externally issued token, used verbatim
    pub token: Option<String>,
    pub site_id: Option<String>,
    /// Mint a read-only scoped token instead of the legacy feed token
    pub read_only: bool,
}

impl FeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Builder for [`StreamClient`]
pub struct StreamClientBuilder {
    credentials: Credentials,
    options: ClientOptions,
    default_signature: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    observers: Vec<Arc<dyn RequestObserver>>,
    notification_connector: Option<Arc<dyn NotificationConnector>>,
}

impl StreamClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            options: ClientOptions::default(),
            default_signature: None,
            transport: None,
            observers: Vec::new(),
            notification_connector: None,
        }
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Signature used by requests that do not carry their own
    pub fn with_default_signature(mut self, signature: impl Into<String>) -> Self {
        self.default_signature = Some(signature.into());
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_notification_connector(mut self, connector: Arc<dyn NotificationConnector>) -> Self {
        self.notification_connector = Some(connector);
        self
    }

    /// Build the client
    ///
    /// Fails with `SecretInUntrustedContext` when a secret is combined with an
    /// untrusted execution context.
    pub fn build(self) -> Result<StreamClient, StreamError> {
        if self.options.untrusted_context && self.credentials.is_server_mode() {
            tracing::error!("Refusing to create a server-mode client in an untrusted context");
            return Err(StreamError::SecretInUntrustedContext);
        }

        let base_url = self.options.resolved_base_url();
        tracing::info!(
            "Creating Stream client: api_key={}, server_mode={}, base_url={}",
            self.credentials.api_key,
            self.credentials.is_server_mode(),
            base_url
        );

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        Ok(StreamClient {
            inner: Arc::new(ClientInner {
                credentials: self.credentials,
                options: self.options,
                base_url,
                default_signature: self.default_signature,
                transport,
                observers: self.observers,
                subscriptions: Arc::new(SubscriptionRegistry::new()),
                notification_connector: self.notification_connector,
                notification_client: OnceCell::new(),
            }),
        })
    }
}

impl StreamClient {
    pub fn builder(credentials: Credentials) -> StreamClientBuilder {
        StreamClientBuilder::new(credentials)
    }

    pub fn new(credentials: Credentials, options: ClientOptions) -> Result<Self, StreamError> {
        Self::builder(credentials).with_options(options).build()
    }

    /// Create a client from an API key, an optional secret and an optional app id
    pub fn connect(
        api_key: &str,
        api_secret: Option<&str>,
        app_id: Option<&str>,
    ) -> Result<Self, StreamError> {
        let mut credentials = Credentials::new(api_key);
        if let Some(secret) = api_secret {
            credentials = credentials.with_secret(secret);
        }
        if let Some(app_id) = app_id {
            credentials = credentials.with_app_id(app_id);
        }
        Self::new(credentials, ClientOptions::default())
    }

    /// Create a client from `STREAM_URL` plus the endpoint overrides read by
    /// [`ClientOptions::from_env`]
    pub fn connect_from_env() -> Result<Self, StreamError> {
        let connection_url = std::env::var("STREAM_URL").map_err(|_| {
            StreamError::Config("STREAM_URL environment variable is not set".to_string())
        })?;
        let (credentials, location) = Credentials::from_connection_url(&connection_url)?;

        let mut options = ClientOptions::from_env();
        if let Some(location) = location {
            options = options.with_location(location);
        }
        Self::new(credentials, options)
    }

    pub fn api_key(&self) -> &str {
        &self.inner.credentials.api_key
    }

    pub fn app_id(&self) -> Option<&str> {
        self.inner.credentials.app_id.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    pub fn is_server_mode(&self) -> bool {
        self.inner.credentials.is_server_mode()
    }

    pub(crate) fn secret(&self) -> Option<&str> {
        self.inner
            .credentials
            .api_secret
            .as_ref()
            .map(|secret| secret.expose_secret())
    }

    pub(crate) fn require_secret(&self, operation: &str) -> Result<&str, StreamError> {
        self.secret().ok_or_else(|| {
            StreamError::MissingSecret(format!("{} requires an API secret", operation))
        })
    }

    /// Mint a scoped token, adding `iat` when `expire_tokens` is set
    pub(crate) fn scoped_token(
        &self,
        operation: &str,
        resource: &str,
        action: &str,
        options: ScopeOptions,
    ) -> Result<String, StreamError> {
        let secret = self.require_secret(operation)?;
        let options = options.with_timestamp(self.inner.options.expire_tokens);
        signing::sign_scoped(secret, resource, action, &options)
    }

    fn feed_token(&self, operation: &str, id: &FeedId, action: &str) -> Result<String, StreamError> {
        self.scoped_token(
            operation,
            WILDCARD,
            action,
            ScopeOptions::new().with_feed_id(id.signing_subject()),
        )
    }

    /// Scoped read-only token for a feed
    pub fn get_read_only_token(&self, slug: &str, user_id: &str) -> Result<String, StreamError> {
        let id = FeedId::new(slug, user_id)?;
        self.feed_token("get_read_only_token", &id, ACTION_READ)
    }

    /// Scoped read-write token for a feed
    pub fn get_read_write_token(&self, slug: &str, user_id: &str) -> Result<String, StreamError> {
        let id = FeedId::new(slug, user_id)?;
        self.feed_token("get_read_write_token", &id, WILDCARD)
    }

    /// Feed handle authorized with the legacy token (server mode)
    ///
    /// # Arguments
    ///
    /// * `slug` - The feed group, e.g. `user` or `flat`
    /// * `user_id` - The feed owner within that group
    ///
    /// # Returns
    ///
    /// Returns `Err(StreamError::MissingToken)` when the client has no secret.
    /// Browser clients pass a token through [`StreamClient::feed_with_options`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stream_sdk::StreamClient;
    ///
    /// # fn example() -> Result<(), stream_sdk::StreamError> {
    /// let client = StreamClient::connect("api-key", Some("api-secret"), Some("1"))?;
    /// let feed = client.feed("user", "1")?;
    /// assert_eq!(feed.id(), "user:1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn feed(&self, slug: &str, user_id: &str) -> Result<Feed, StreamError> {
        self.feed_with_options(slug, user_id, FeedOptions::default())
    }

    /// Feed handle with an explicit token, site id or read-only grant
    ///
    /// An explicit token is used verbatim. Otherwise a server client signs one:
    /// a read-only scoped token when `read_only` is set, the legacy token when not.
    ///
    /// # Arguments
    ///
    /// * `slug` - The feed group, without a `:`
    /// * `user_id` - The feed owner within that group
    /// * `options` - Token, site id and read-only settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stream_sdk::{FeedOptions, StreamClient};
    ///
    /// # fn example() -> Result<(), stream_sdk::StreamError> {
    /// // Browser client with a token issued by the server
    /// let client = StreamClient::connect("api-key", None, Some("1"))?;
    /// let feed = client.feed_with_options(
    ///     "user",
    ///     "1",
    ///     FeedOptions::new().with_token("token-from-server"),
    /// )?;
    /// assert_eq!(feed.token(), "token-from-server");
    /// # Ok(())
    /// # }
    /// ```
    pub fn feed_with_options(
        &self,
        slug: &str,
        user_id: &str,
        options: FeedOptions,
    ) -> Result<Feed, StreamError> {
        if slug.is_empty() || user_id.is_empty() {
            return Err(StreamError::InvalidIdentifier(
                "Please provide a feed slug and user id, ie client.feed(\"user\", \"1\")"
                    .to_string(),
            ));
        }
        if slug.contains(validation::FEED_ID_SEPARATOR) {
            return Err(StreamError::InvalidIdentifier(format!(
                "Please initialize the feed using client.feed(\"user\", \"1\") not client.feed(\"{}\")",
                slug
            )));
        }
        let id = FeedId::new(slug, user_id)?;

        let token = match (options.token, self.secret()) {
            (Some(token), _) => token,
            (None, None) => return Err(StreamError::MissingToken),
            (None, Some(_)) if options.read_only => self.feed_token("feed", &id, ACTION_READ)?,
            (None, Some(secret)) => signing::sign_legacy(secret, &id.signing_subject()),
        };

        tracing::debug!("Created feed handle for {}", id);
        Ok(Feed::new(self.clone(), id, token, options.site_id))
    }

    /// Sign the `to` targets of one activity, see [`StreamClient::sign_activities`]
    pub fn sign_activity<'a>(&self, activity: &'a mut Activity) -> Result<&'a mut Activity, StreamError> {
        self.sign_activities(std::slice::from_mut(&mut *activity))?;
        Ok(activity)
    }

    /// Append the legacy token of each target feed to every `to` entry
    ///
    /// Does nothing without a secret. Entries that already carry a token are re-signed.
    /// Every target is validated before any entry is rewritten, so on error the
    /// activities are left untouched.
    ///
    /// # Arguments
    ///
    /// * `activities` - Activities whose `to` entries are `slug:user_id` feed ids
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stream_sdk::{Activity, StreamClient};
    ///
    /// # fn example() -> Result<(), stream_sdk::StreamError> {
    /// let client = StreamClient::connect("api-key", Some("api-secret"), None)?;
    /// let mut activities = vec![Activity::new("user:1", "tweet", "tweet:1").with_to(["user:2"])];
    /// client.sign_activities(&mut activities)?;
    /// assert!(activities[0].to[0].starts_with("user:2 "));
    /// # Ok(())
    /// # }
    /// ```
    pub fn sign_activities<'a>(
        &self,
        activities: &'a mut [Activity],
    ) -> Result<&'a mut [Activity], StreamError> {
        let Some(secret) = self.secret() else {
            return Ok(activities);
        };

        let signed = activities
            .iter()
            .map(|activity| {
                activity
                    .to
                    .iter()
                    .map(|target| {
                        let feed_id = target.split(' ').next().unwrap_or_default();
                        let id = validation::parse_feed_id(feed_id)?;
                        Ok(format!("{} {}", id, signing::sign_legacy(secret, &id.signing_subject())))
                    })
                    .collect::<Result<Vec<_>, StreamError>>()
            })
            .collect::<Result<Vec<_>, StreamError>>()?;

        for (activity, to) in activities.iter_mut().zip(signed) {
            activity.to = to;
        }
        Ok(activities)
    }

    /// Analytics URL that records `events` for `user_id` and redirects to `target_url`
    ///
    /// # Arguments
    ///
    /// * `target_url` - Absolute URL the user ends up on
    /// * `user_id` - User the redirect token is scoped to
    /// * `events` - Analytics events, serialized into the `events` query value
    ///
    /// # Returns
    ///
    /// Returns `Err(StreamError::InvalidTargetUrl(_))` for a relative or unparsable
    /// target, and `Err(StreamError::MissingSecret(_))` on a browser client.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use serde_json::json;
    /// use stream_sdk::StreamClient;
    ///
    /// # fn example() -> Result<(), stream_sdk::StreamError> {
    /// let client = StreamClient::connect("api-key", Some("api-secret"), Some("1"))?;
    /// let events = [json!({"content": "email:10", "label": "click"})];
    /// let url = client.create_redirect_url("http://google.com/", "tommaso", &events)?;
    /// println!("Redirect through {}", url);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_redirect_url(
        &self,
        target_url: &str,
        user_id: &str,
        events: &[serde_json::Value],
    ) -> Result<String, StreamError> {
        let parsed = url::Url::parse(target_url)
            .map_err(|_| StreamError::InvalidTargetUrl(target_url.to_string()))?;
        if !parsed.has_host() {
            return Err(StreamError::InvalidTargetUrl(target_url.to_string()));
        }

        let token = self.scoped_token(
            "create_redirect_url",
            RESOURCE_REDIRECT_AND_TRACK,
            WILDCARD,
            ScopeOptions::new().with_user_id(user_id),
        )?;
        let events = serde_json::to_string(events)
            .map_err(|e| StreamError::InvalidArgumentType(format!("Invalid events: {}", e)))?;

        let params = [
            ("auth_type", "jwt"),
            ("authorization", token.as_str()),
            ("url", target_url),
            ("api_key", self.api_key()),
            ("events", events.as_str()),
        ];
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!(
            "{}redirect/?{}",
            self.inner.options.resolved_analytics_url(),
            validation::escape(&query)
        ))
    }

    /// Registry of channels this client has authorized subscriptions for
    pub fn subscriptions(&self) -> &Arc<SubscriptionRegistry> {
        &self.inner.subscriptions
    }

    pub(crate) fn register_subscription(&self, channel: String, grant: SubscriptionGrant) {
        self.inner.subscriptions.register(channel, grant);
    }

    /// The shared pub/sub client, connected on first use
    pub fn notification_client(&self) -> Result<Arc<dyn NotificationClient>, StreamError> {
        self.inner
            .notification_client
            .get_or_try_init(|| {
                let connector = self.inner.notification_connector.as_ref().ok_or_else(|| {
                    StreamError::Notification("No notification connector configured".to_string())
                })?;
                let url = self.inner.options.resolved_notification_url();
                tracing::info!("Connecting notification client to {}", url);

                let client = connector.connect(&url)?;
                client.add_extension(Arc::new(SubscriptionAuthorization::new(
                    self.api_key(),
                    Arc::clone(&self.inner.subscriptions),
                )));
                Ok(client)
            })
            .map(Arc::clone)
    }

    pub fn enricher(&self) -> Enricher<'_> {
        self.inner.enricher()
    }

    /// Absolute URL for a path relative to the versioned API root
    pub fn enrich_url(&self, path: &str) -> String {
        self.enricher().url(path)
    }

    pub fn get(&self, descriptor: RequestDescriptor, callback: Option<ResponseCallback>) -> ResponseFuture {
        self.dispatch(Method::Get, descriptor, callback)
    }

    pub fn post(&self, descriptor: RequestDescriptor, callback: Option<ResponseCallback>) -> ResponseFuture {
        self.dispatch(Method::Post, descriptor, callback)
    }

    pub fn delete(&self, descriptor: RequestDescriptor, callback: Option<ResponseCallback>) -> ResponseFuture {
        self.dispatch(Method::Delete, descriptor, callback)
    }

    fn dispatch(
        &self,
        method: Method,
        descriptor: RequestDescriptor,
        callback: Option<ResponseCallback>,
    ) -> ResponseFuture {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            for observer in &inner.observers {
                observer.on_request(method, &descriptor);
            }
            let request = inner.enricher().enrich(method, descriptor);
            let outcome = inner.transport.send(request).await;
            for observer in &inner.observers {
                observer.on_response(outcome.as_ref());
            }

            let result = settle(&outcome);
            if let Some(callback) = callback {
                let error = match &result {
                    Err(StreamError::Api(e)) => Some(e),
                    _ => None,
                };
                let response = outcome.as_ref().ok();
                if panic::catch_unwind(AssertUnwindSafe(|| callback(error, response))).is_err() {
                    tracing::error!("Response callback panicked for {} request", method);
                }
            }
            result
        })
    }
}

impl ClientInner {
    fn enricher(&self) -> Enricher<'_> {
        Enricher {
            base_url: &self.base_url,
            version: &self.options.version,
            api_key: &self.credentials.api_key,
            group: &self.options.group,
            default_signature: self.default_signature.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_api::types::{ApiError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;

    const SECRET: &str = "tfq2sdqpj9g446sbv653x3aqmgn33hsn8uzdc9jpskaw8mj6vsnhzswuwptuj9su";

    struct OkTransport;

    impl Transport for OkTransport {
        fn send(
            &self,
            _request: crate::stream_api::request::SignedRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, ApiError>> + Send + '_>> {
            Box::pin(async { Ok(HttpResponse::new(200, serde_json::json!({}))) })
        }
    }

    fn server_client() -> StreamClient {
        StreamClient::builder(Credentials::new("ahj2ndz7gsan").with_secret(SECRET).with_app_id("1"))
            .with_transport(Arc::new(OkTransport))
            .build()
            .unwrap()
    }

    fn browser_client() -> StreamClient {
        StreamClient::builder(Credentials::new("ahj2ndz7gsan"))
            .with_transport(Arc::new(OkTransport))
            .build()
            .unwrap()
    }

    #[test]
    fn test_feed_uses_legacy_token_by_default() {
        let feed = server_client().feed("flat", "1").unwrap();
        assert_eq!(feed.token(), "UbbVK4LVON51gMXjuKViTDHxo9s");
        assert!(!signing::is_scoped_token(feed.token()));
    }

    #[test]
    fn test_feed_read_only_uses_scoped_token() {
        let client = server_client();
        let feed = client
            .feed_with_options("flat", "1", FeedOptions::new().with_read_only(true))
            .unwrap();
        assert!(signing::is_scoped_token(feed.token()));
        assert_eq!(feed.token(), client.get_read_only_token("flat", "1").unwrap());
    }

    #[test]
    fn test_feed_explicit_token_is_used_verbatim() {
        let feed = browser_client()
            .feed_with_options("user", "1", FeedOptions::new().with_token("abc"))
            .unwrap();
        assert_eq!(feed.token(), "abc");
    }

    #[test]
    fn test_feed_validation() {
        let client = server_client();
        assert!(matches!(
            client.feed("", "1"),
            Err(StreamError::InvalidIdentifier(_))
        ));
        match client.feed("user:1", "1") {
            Err(StreamError::InvalidIdentifier(message)) => {
                assert!(message.contains("client.feed(\"user\", \"1\")"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(client.feed("us#er", "1").is_err());
        assert!(client.feed("user", "1 2").is_err());
    }

    #[test]
    fn test_feed_client_mode_without_token() {
        assert!(matches!(
            browser_client().feed("user", "1"),
            Err(StreamError::MissingToken)
        ));
    }

    #[test]
    fn test_read_only_and_read_write_tokens() {
        let client = server_client();
        let read_only = client.get_read_only_token("user", "1").unwrap();
        let read_write = client.get_read_write_token("user", "1").unwrap();
        assert_ne!(read_only, read_write);
        assert_eq!(read_only, client.get_read_only_token("user", "1").unwrap());
        assert_eq!(read_write, client.get_read_write_token("user", "1").unwrap());
    }

    #[test]
    fn test_tokens_require_secret() {
        assert!(matches!(
            browser_client().get_read_only_token("user", "1"),
            Err(StreamError::MissingSecret(_))
        ));
    }

    #[test]
    fn test_sign_activities_without_secret_is_noop() {
        let mut activities = vec![Activity::new("user:1", "tweet", "1").with_to(["global:feed"])];
        let before = activities.clone();
        let client = browser_client();
        let signed = client.sign_activities(&mut activities).unwrap();
        assert_eq!(signed, before.as_slice());
    }

    #[test]
    fn test_sign_activities_appends_legacy_token() {
        let client = server_client();
        let mut activities = vec![Activity::new("user:1", "tweet", "1").with_to(["global:feed"])];
        client.sign_activities(&mut activities).unwrap();

        let parts: Vec<&str> = activities[0].to[0].split(' ').collect();
        assert_eq!(parts[0], "global:feed");
        assert_eq!(parts[1], client.feed("global", "feed").unwrap().token());

        // Signing again keeps a single token per target
        client.sign_activities(&mut activities).unwrap();
        assert_eq!(activities[0].to[0].split(' ').count(), 2);
    }

    #[test]
    fn test_sign_activities_rejects_bad_target() {
        let mut activities = vec![Activity::new("user:1", "tweet", "1").with_to(["global"])];
        assert!(matches!(
            server_client().sign_activities(&mut activities),
            Err(StreamError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_sign_activities_leaves_batch_untouched_on_error() {
        let mut activities = vec![
            Activity::new("user:1", "tweet", "1").with_to(["user:1"]),
            Activity::new("user:1", "tweet", "2").with_to(["bad"]),
        ];
        assert!(server_client().sign_activities(&mut activities).is_err());
        assert_eq!(activities[0].to, vec!["user:1".to_string()]);
        assert_eq!(activities[1].to, vec!["bad".to_string()]);
    }

    #[test]
    fn test_untrusted_context_rejects_secret() {
        let result = StreamClient::new(
            Credentials::new("key").with_secret("secret"),
            ClientOptions::new().with_untrusted_context(true),
        );
        assert!(matches!(result, Err(StreamError::SecretInUntrustedContext)));

        let result = StreamClient::new(
            Credentials::new("key"),
            ClientOptions::new().with_untrusted_context(true),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_redirect_url_rejects_relative_target() {
        let client = server_client();
        assert!(matches!(
            client.create_redirect_url("google.com", "tommaso", &[]),
            Err(StreamError::InvalidTargetUrl(_))
        ));
        assert!(matches!(
            browser_client().create_redirect_url("http://google.com/", "tommaso", &[]),
            Err(StreamError::MissingSecret(_))
        ));
    }

    #[test]
    fn test_enrich_url() {
        assert_eq!(
            server_client().enrich_url("feed/user/1/"),
            "https://api.getstream.io/api/v1.0/feed/user/1/"
        );
    }

    #[test]
    fn test_notification_client_requires_connector() {
        assert!(matches!(
            server_client().notification_client(),
            Err(StreamError::Notification(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let output = format!("{:?}", server_client());
        assert!(output.contains("ahj2ndz7gsan"));
        assert!(!output.contains(SECRET));
    }
}
