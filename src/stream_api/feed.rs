use crate::stream_api::client::StreamClient;
use crate::stream_api::notifications::{MessageCallback, Subscription, SubscriptionGrant};
use crate::stream_api::request::{json_body, RequestDescriptor};
use crate::stream_api::resources::{
    Activity, ActivityRef, FollowListOptions, FollowOptions, GetOptions, UnfollowOptions,
};
use crate::stream_api::transport::{ResponseCallback, ResponseFuture};
use crate::stream_api::types::StreamError;
use crate::validation::FeedId;

/// Handle for one feed, created by [`StreamClient::feed`]
///
/// Every request is authorized with the feed's token. Validation failures are
/// returned immediately; the returned future only carries transport outcomes.
#[derive(Debug, Clone)]
pub struct Feed {
    client: StreamClient,
    id: FeedId,
    token: String,
    site_id: Option<String>,
}

impl Feed {
    pub(crate) fn new(client: StreamClient, id: FeedId, token: String, site_id: Option<String>) -> Self {
        Self {
            client,
            id,
            token,
            site_id,
        }
    }

    pub fn client(&self) -> &StreamClient {
        &self.client
    }

    pub fn slug(&self) -> &str {
        self.id.slug()
    }

    pub fn user_id(&self) -> &str {
        self.id.user_id()
    }

    /// `slug:userId`
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    pub fn feed_id(&self) -> &FeedId {
        &self.id
    }

    /// `slug/userId`
    pub fn feed_url(&self) -> String {
        self.id.url_path()
    }

    /// `slugUserId`
    pub fn feed_together(&self) -> String {
        self.id.signing_subject()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Labeled token, `slugUserId token`
    ///
    /// Requests carry the bare [`Feed::token`]; this form is for callers that
    /// hand the feed's authorization to another component.
    pub fn signature(&self) -> String {
        format!("{} {}", self.feed_together(), self.token)
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    /// Realtime channel name, `site-{appId}-feed-{slugUserId}`
    pub fn notification_channel(&self) -> String {
        format!(
            "site-{}-feed-{}",
            self.client.app_id().unwrap_or_default(),
            self.feed_together()
        )
    }

    pub fn read_only_token(&self) -> Result<String, StreamError> {
        self.client.get_read_only_token(self.slug(), self.user_id())
    }

    pub fn read_write_token(&self) -> Result<String, StreamError> {
        self.client.get_read_write_token(self.slug(), self.user_id())
    }

    fn collection_path(&self) -> String {
        format!("feed/{}/", self.id.url_path())
    }

    fn descriptor(&self, path: String) -> RequestDescriptor {
        RequestDescriptor::new(path).with_signature(self.token.as_str())
    }

    /// Add one activity; `to` targets are signed in server mode
    pub fn add_activity(
        &self,
        activity: Activity,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let mut activity = activity;
        self.client.sign_activity(&mut activity)?;
        let body = json_body(&activity)?;

        tracing::debug!("Adding activity to feed {}", self.id);
        Ok(self
            .client
            .post(self.descriptor(self.collection_path()).with_body(body), callback))
    }

    pub fn add_activities(
        &self,
        activities: Vec<Activity>,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let mut activities = activities;
        self.client.sign_activities(&mut activities)?;
        let body = serde_json::json!({ "activities": json_body(&activities)? });

        tracing::debug!("Adding {} activities to feed {}", activities.len(), self.id);
        Ok(self
            .client
            .post(self.descriptor(self.collection_path()).with_body(body), callback))
    }

    /// Remove an activity by id, or by foreign id with [`ActivityRef::ForeignId`]
    pub fn remove_activity(
        &self,
        activity: impl Into<ActivityRef>,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let descriptor = match activity.into() {
            ActivityRef::Id(id) => self.descriptor(format!("{}{}/", self.collection_path(), id)),
            ActivityRef::ForeignId(foreign_id) => self
                .descriptor(format!("{}{}/", self.collection_path(), foreign_id))
                .with_query_param("foreign_id", "1"),
        };
        Ok(self.client.delete(descriptor, callback))
    }

    pub fn get(
        &self,
        options: &GetOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let descriptor = self
            .descriptor(self.collection_path())
            .with_query(options.to_query());
        Ok(self.client.get(descriptor, callback))
    }

    /// Follow `target_slug:target_user_id`
    pub fn follow(
        &self,
        target_slug: &str,
        target_user_id: &str,
        options: &FollowOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let target = FeedId::new(target_slug, target_user_id)?;
        let mut body = serde_json::json!({ "target": target.to_string() });
        if let Some(limit) = options.limit {
            body["activity_copy_limit"] = serde_json::json!(limit);
        }

        tracing::debug!("Feed {} following {}", self.id, target);
        let descriptor = self
            .descriptor(format!("{}following/", self.collection_path()))
            .with_body(body);
        Ok(self.client.post(descriptor, callback))
    }

    pub fn unfollow(
        &self,
        target_slug: &str,
        target_user_id: &str,
        options: &UnfollowOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let target = FeedId::new(target_slug, target_user_id)?;

        tracing::debug!("Feed {} unfollowing {}", self.id, target);
        let descriptor = self
            .descriptor(format!("{}following/{}/", self.collection_path(), target))
            .with_query(options.to_query());
        Ok(self.client.delete(descriptor, callback))
    }

    /// Feeds this feed follows
    pub fn following(
        &self,
        options: &FollowListOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let descriptor = self
            .descriptor(format!("{}following/", self.collection_path()))
            .with_query(options.to_query());
        Ok(self.client.get(descriptor, callback))
    }

    /// Feeds following this feed
    pub fn followers(
        &self,
        options: &FollowListOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let descriptor = self
            .descriptor(format!("{}followers/", self.collection_path()))
            .with_query(options.to_query());
        Ok(self.client.get(descriptor, callback))
    }

    /// Subscribe to realtime updates of this feed
    ///
    /// Requires an app id. The feed's token is registered for the channel so the
    /// subscription message is authorized on its way out.
    pub fn subscribe(
        &self,
        callback: Option<MessageCallback>,
    ) -> Result<Box<dyn Subscription>, StreamError> {
        match self.client.app_id() {
            Some(app_id) if !app_id.is_empty() && app_id != "0" => {}
            _ => return Err(StreamError::MissingAppId),
        }

        let channel = format!("/{}", self.notification_channel());
        self.client.register_subscription(
            channel.clone(),
            SubscriptionGrant {
                user_id: self.user_id().to_string(),
                token: self.token.clone(),
            },
        );

        let notifications = self.client.notification_client()?;
        tracing::info!("Subscribing to realtime channel {}", channel);
        notifications.subscribe(&channel, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_api::config::Credentials;
    use crate::stream_api::signing;
    use crate::stream_api::types::AuthType;

    fn client(app_id: Option<&str>) -> StreamClient {
        StreamClient::connect("key", Some("secret"), app_id).unwrap()
    }

    #[test]
    fn test_identity_accessors() {
        let feed = client(Some("42")).feed("user", "matthisk").unwrap();
        assert_eq!(feed.id(), "user:matthisk");
        assert_eq!(feed.feed_url(), "user/matthisk");
        assert_eq!(feed.feed_together(), "usermatthisk");
        assert_eq!(feed.notification_channel(), "site-42-feed-usermatthisk");
        assert_eq!(feed.site_id(), None);
    }

    #[test]
    fn test_signature_is_labeled_token() {
        let feed = client(None).feed("user", "matthisk").unwrap();
        assert_eq!(feed.signature(), format!("usermatthisk {}", feed.token()));
        assert_eq!(signing::signature_token(&feed.signature()), feed.token());
        assert_eq!(signing::auth_type(&feed.signature()), AuthType::Simple);

        let read_only = client(None)
            .feed_with_options(
                "user",
                "matthisk",
                crate::stream_api::client::FeedOptions::new().with_read_only(true),
            )
            .unwrap();
        assert!(read_only.signature().starts_with("usermatthisk "));
        assert_eq!(signing::auth_type(&read_only.signature()), AuthType::Jwt);
    }

    #[test]
    fn test_follow_validates_target() {
        let feed = client(None).feed("user", "1").unwrap();
        assert!(matches!(
            feed.follow("us#er", "2", &FollowOptions::default(), None),
            Err(StreamError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            feed.unfollow("user", "", &UnfollowOptions::default(), None),
            Err(StreamError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_subscribe_requires_app_id() {
        for app_id in [None, Some(""), Some("0")] {
            let feed = client(app_id).feed("user", "1").unwrap();
            assert!(matches!(feed.subscribe(None), Err(StreamError::MissingAppId)));
        }
    }

    #[test]
    fn test_subscribe_registers_grant_before_connecting() {
        let client = client(Some("1"));
        let feed = client.feed("user", "1").unwrap();
        // No connector configured, but the grant is already recorded
        assert!(matches!(
            feed.subscribe(None),
            Err(StreamError::Notification(_))
        ));
        let grant = client.subscriptions().get("/site-1-feed-user1").unwrap();
        assert_eq!(grant.user_id, "1");
        assert_eq!(grant.token, feed.token());
    }

    #[test]
    fn test_feed_tokens_need_secret() {
        let browser = StreamClient::new(Credentials::new("key"), Default::default()).unwrap();
        let feed = browser
            .feed_with_options(
                "user",
                "1",
                crate::stream_api::client::FeedOptions::new().with_token("t"),
            )
            .unwrap();
        assert!(feed.read_only_token().is_err());
        assert!(client(None)
            .feed("user", "1")
            .unwrap()
            .read_write_token()
            .is_ok());
    }
}
