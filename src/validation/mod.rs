//! Feed identifier validation and URL escaping helpers
//!
//! Slugs and user ids share one character class: ASCII letters, digits, `_` and `-`.
//! A feed id is `slug:userId`.

use crate::stream_api::types::StreamError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Separator between slug and user id in a feed id
pub const FEED_ID_SEPARATOR: char = ':';

static VALID_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern is valid"));

/// Validate a single slug or user id
pub fn validate_token(candidate: &str) -> Result<&str, StreamError> {
    if VALID_TOKEN.is_match(candidate) {
        Ok(candidate)
    } else {
        Err(StreamError::InvalidIdentifier(format!(
            "Invalid feedSlug or userId, please use letters, numbers or _ got: {}",
            candidate
        )))
    }
}

/// A validated `(slug, userId)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId {
    slug: String,
    user_id: String,
}

impl FeedId {
    /// Validate both components independently
    pub fn new(slug: &str, user_id: &str) -> Result<Self, StreamError> {
        Ok(Self {
            slug: validate_token(slug)?.to_string(),
            user_id: validate_token(user_id)?.to_string(),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `slug/userId`
    pub fn url_path(&self) -> String {
        format!("{}/{}", self.slug, self.user_id)
    }

    /// `slugUserId`, the subject tokens are minted for
    pub fn signing_subject(&self) -> String {
        format!("{}{}", self.slug, self.user_id)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.slug, FEED_ID_SEPARATOR, self.user_id)
    }
}

impl std::str::FromStr for FeedId {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_feed_id(s)
    }
}

/// Parse `slug:userId`
pub fn parse_feed_id(feed_id: &str) -> Result<FeedId, StreamError> {
    let parts: Vec<&str> = feed_id.split(FEED_ID_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(StreamError::InvalidIdentifier(format!(
            "Invalid feedId, expected something like user:1 got {}",
            feed_id
        )));
    }
    FeedId::new(parts[0], parts[1])
}

/// Force the characters generic encoders leave alone (`!'()*`) into percent form
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '!' | '\'' | '(' | ')' | '*' => escaped.push_str(&format!("%{:X}", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_id_valid() {
        let feed_id = parse_feed_id("user:1").unwrap();
        assert_eq!(feed_id.slug(), "user");
        assert_eq!(feed_id.user_id(), "1");
        assert_eq!(feed_id.to_string(), "user:1");
        assert_eq!(feed_id.url_path(), "user/1");
        assert_eq!(feed_id.signing_subject(), "user1");
    }

    #[test]
    fn test_parse_feed_id_requires_separator() {
        assert!(matches!(
            parse_feed_id("user1"),
            Err(StreamError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            parse_feed_id("user:1:2"),
            Err(StreamError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_feed_id_rejects_bad_characters() {
        assert!(parse_feed_id("us#er:1").is_err());
        assert!(parse_feed_id("user:").is_err());
        assert!(parse_feed_id(":1").is_err());
        assert!(parse_feed_id("user:ü").is_err());
    }

    #[test]
    fn test_validate_token() {
        assert_eq!(validate_token("Flat_1-a").unwrap(), "Flat_1-a");
        assert!(validate_token("").is_err());
        assert!(validate_token("a b").is_err());
        assert!(validate_token("###henk").is_err());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello!'()*x"), "hello%21%27%28%29%2Ax");
        assert_eq!(escape("plain"), "plain");
    }
}
