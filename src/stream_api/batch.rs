//! Cross-feed operations authorized with scoped tokens
//!
//! These need the API secret and are exposed on [`StreamClient`] through the
//! [`BatchOperations`] trait.

use crate::stream_api::client::StreamClient;
use crate::stream_api::request::{json_body, RequestDescriptor};
use crate::stream_api::resources::{Activity, Follow};
use crate::stream_api::signing::{ScopeOptions, RESOURCE_ACTIVITIES, WILDCARD};
use crate::stream_api::transport::{ResponseCallback, ResponseFuture};
use crate::stream_api::types::StreamError;
use serde::Serialize;

const ADD_TO_MANY_PATH: &str = "feed/add_to_many/";
const FOLLOW_MANY_PATH: &str = "follow_many/";
const ACTIVITIES_PATH: &str = "activities/";

pub trait BatchOperations {
    /// POST a descriptor signed with a wildcard scoped token
    fn make_signed_request(
        &self,
        descriptor: RequestDescriptor,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError>;

    /// Replace activities by `foreign_id` + `time`
    ///
    /// `activities` must serialize to a JSON array.
    fn update_activities<T: Serialize + ?Sized>(
        &self,
        activities: &T,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError>;

    /// Add one activity to many feeds (`"slug:userId"`) in a single request
    fn add_to_many(
        &self,
        activity: &Activity,
        feed_ids: &[String],
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let body = serde_json::json!({
            "activity": json_body(activity)?,
            "feeds": feed_ids,
        });
        self.make_signed_request(RequestDescriptor::new(ADD_TO_MANY_PATH).with_body(body), callback)
    }

    /// Create many follow relationships in a single request
    fn follow_many(
        &self,
        follows: &[Follow],
        activity_copy_limit: Option<u32>,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let mut descriptor = RequestDescriptor::new(FOLLOW_MANY_PATH).with_body(json_body(follows)?);
        if let Some(limit) = activity_copy_limit {
            descriptor = descriptor.with_query_param("activity_copy_limit", limit.to_string());
        }
        self.make_signed_request(descriptor, callback)
    }

    fn update_activity(
        &self,
        activity: &Activity,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        self.update_activities(std::slice::from_ref(activity), callback)
    }
}

impl BatchOperations for StreamClient {
    fn make_signed_request(
        &self,
        descriptor: RequestDescriptor,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let token = self.scoped_token("make_signed_request", WILDCARD, WILDCARD, ScopeOptions::new())?;
        tracing::debug!("Signed batch request to {}", descriptor.path);
        Ok(self.post(descriptor.with_signature(token), callback))
    }

    fn update_activities<T: Serialize + ?Sized>(
        &self,
        activities: &T,
        callback: Option<ResponseCallback>,
    ) -> Result<ResponseFuture, StreamError> {
        let activities = json_body(activities)?;
        if !activities.is_array() {
            return Err(StreamError::InvalidArgumentType(
                "The activities argument should be an Array".to_string(),
            ));
        }

        let token = self.scoped_token(
            "update_activities",
            RESOURCE_ACTIVITIES,
            WILDCARD,
            ScopeOptions::new().with_feed_id(WILDCARD),
        )?;
        let descriptor = RequestDescriptor::new(ACTIVITIES_PATH)
            .with_body(serde_json::json!({ "activities": activities }))
            .with_signature(token);
        Ok(self.post(descriptor, callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn browser_client() -> StreamClient {
        StreamClient::connect("key", None, None).unwrap()
    }

    #[test]
    fn test_update_activities_requires_array() {
        let client = StreamClient::connect("key", Some("secret"), None).unwrap();
        let result = client.update_activities(&json!({"actor": "user:1"}), None);
        match result {
            Err(StreamError::InvalidArgumentType(message)) => {
                assert_eq!(message, "The activities argument should be an Array")
            }
            _ => panic!("expected InvalidArgumentType"),
        }
    }

    #[test]
    fn test_batch_requires_secret() {
        let client = browser_client();
        let activity = Activity::new("user:1", "tweet", "tweet:1");
        assert!(matches!(
            client.add_to_many(&activity, &["user:2".to_string()], None),
            Err(StreamError::MissingSecret(_))
        ));
        assert!(matches!(
            client.follow_many(&[Follow::new("flat:1", "user:1")], None, None),
            Err(StreamError::MissingSecret(_))
        ));
        assert!(matches!(
            client.update_activity(&activity, None),
            Err(StreamError::MissingSecret(_))
        ));
        assert!(matches!(
            client.make_signed_request(RequestDescriptor::new("x/"), None),
            Err(StreamError::MissingSecret(_))
        ));
    }
}
