use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An activity as sent to the API
///
/// Unknown fields are carried in `extra` and flattened into the JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub actor: String,
    pub verb: String,
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Target feeds. Each entry is `"slug:userId"`, or `"slug:userId token"` once signed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Activity {
    pub fn new(
        actor: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            verb: verb.into(),
            object: object.into(),
            id: None,
            foreign_id: None,
            time: None,
            to: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_foreign_id(mut self, foreign_id: impl Into<String>) -> Self {
        self.foreign_id = Some(foreign_id.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A follow relationship for `follow_many`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    /// Following feed, `"slug:userId"`
    pub source: String,
    /// Followed feed, `"slug:userId"`
    pub target: String,
}

impl Follow {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowOptions {
    /// How many activities of the target feed are copied into this one
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnfollowOptions {
    /// Keep the activities that were copied while following
    pub keep_history: bool,
}

impl UnfollowOptions {
    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        if self.keep_history {
            query.insert("keep_history".to_string(), "1".to_string());
        }
        query
    }
}

/// Pagination and filtering for `following`/`followers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowListOptions {
    /// Only include these feeds (`"slug:userId"`)
    pub filter: Vec<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl FollowListOptions {
    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        if !self.filter.is_empty() {
            query.insert("filter".to_string(), self.filter.join(","));
        }
        if let Some(limit) = self.limit {
            query.insert("limit".to_string(), limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.insert("offset".to_string(), offset.to_string());
        }
        query
    }
}

/// Read/seen marker for notification feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    All,
    Ids(Vec<String>),
}

impl Mark {
    fn to_param(&self) -> String {
        match self {
            Mark::All => "true".to_string(),
            Mark::Ids(ids) => ids.join(","),
        }
    }
}

/// Options for reading a feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub id_gt: Option<String>,
    pub id_gte: Option<String>,
    pub id_lt: Option<String>,
    pub id_lte: Option<String>,
    pub ranking: Option<String>,
    pub mark_read: Option<Mark>,
    pub mark_seen: Option<Mark>,
    /// Passed through as-is
    pub extra: BTreeMap<String, String>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_id_lt(mut self, id: impl Into<String>) -> Self {
        self.id_lt = Some(id.into());
        self
    }

    pub fn with_ranking(mut self, ranking: impl Into<String>) -> Self {
        self.ranking = Some(ranking.into());
        self
    }

    pub fn with_mark_read(mut self, mark: Mark) -> Self {
        self.mark_read = Some(mark);
        self
    }

    pub fn with_mark_seen(mut self, mark: Mark) -> Self {
        self.mark_seen = Some(mark);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = self.extra.clone();
        let numbers = [("limit", self.limit), ("offset", self.offset)];
        for (key, value) in numbers {
            if let Some(value) = value {
                query.insert(key.to_string(), value.to_string());
            }
        }
        let strings = [
            ("id_gt", &self.id_gt),
            ("id_gte", &self.id_gte),
            ("id_lt", &self.id_lt),
            ("id_lte", &self.id_lte),
            ("ranking", &self.ranking),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                query.insert(key.to_string(), value.clone());
            }
        }
        if let Some(mark) = &self.mark_read {
            query.insert("mark_read".to_string(), mark.to_param());
        }
        if let Some(mark) = &self.mark_seen {
            query.insert("mark_seen".to_string(), mark.to_param());
        }
        query
    }
}

/// How an activity is identified on removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    Id(String),
    ForeignId(String),
}

impl From<&str> for ActivityRef {
    fn from(id: &str) -> Self {
        ActivityRef::Id(id.to_string())
    }
}

impl From<String> for ActivityRef {
    fn from(id: String) -> Self {
        ActivityRef::Id(id)
    }
}
