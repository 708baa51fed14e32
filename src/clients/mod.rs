pub mod error;
pub mod facebook;

pub use error::GraphError;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Owner of a page or profile, as returned by the user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
#[error("post record has no string `id`")]
pub struct MissingPostId;

/// A single post, kept as the object the Graph API sent. Accessors read typed
/// views off it; serializing writes every original key back, nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PostRecord {
    fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for PostRecord {
    type Error = MissingPostId;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get("id") {
            Some(Value::String(_)) => Ok(Self { fields }),
            _ => Err(MissingPostId),
        }
    }
}

impl From<PostRecord> for Map<String, Value> {
    fn from(post: PostRecord) -> Self {
        post.fields
    }
}

impl PostRecord {
    /// A post candidate from the `data` array; `None` unless it is an object
    /// with a string `id`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Self::try_from(fields).ok(),
            _ => None,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> &str {
        self.str_field("id").unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    pub fn created_time(&self) -> Option<&str> {
        self.str_field("created_time")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn avatar(&self) -> Option<&str> {
        self.str_field("avatar")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Inject the author's name and avatar URL.
    pub fn set_author(&mut self, name: impl Into<String>, avatar: impl Into<String>) {
        self.fields.insert("name".to_string(), Value::String(name.into()));
        self.fields
            .insert("avatar".to_string(), Value::String(avatar.into()));
    }

    /// `created_time` parsed from the Graph format (`2016-08-16T21:19:19+0000`).
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.created_time()?;
        DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }
}

/// The `/{handle}/posts` envelope. Elements stay untyped until one is picked.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsPage {
    pub data: Vec<Value>,
}

#[async_trait]
pub trait PostClient: Send + Sync {
    /// Resolve a public post URL into its post record.
    async fn resolve_post(&self, url: &str) -> Result<PostRecord, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_record_keeps_unknown_fields() {
        let json = r#"{"id":"1_2","message":"hi","created_time":"2016-08-15T21:54:10+0000","story":"shared a link"}"#;
        let post: PostRecord = serde_json::from_str(json).expect("valid post");
        assert_eq!(post.message(), Some("hi"));
        assert_eq!(post.fields().get("story"), Some(&json!("shared a link")));

        let back = serde_json::to_value(&post).expect("serializable");
        assert_eq!(back, serde_json::from_str::<Value>(json).expect("json"));
    }

    #[test]
    fn test_post_record_keeps_explicit_nulls() {
        let json = json!({"id": "6815841748_1", "message": null, "created_time": "2016"});
        let mut post = PostRecord::from_value(json.clone()).expect("has id");
        assert_eq!(post.message(), None);

        post.set_author("Barack Obama", "http://graph.facebook.com/barackobama/picture");
        let back = serde_json::to_value(&post).expect("serializable");
        assert_eq!(back["message"], Value::Null);
        assert!(back.as_object().expect("object").contains_key("message"));
        assert_eq!(back["created_time"], json["created_time"]);
        assert_eq!(back["name"], json!("Barack Obama"));
    }

    #[test]
    fn test_from_value_requires_string_id() {
        assert!(PostRecord::from_value(json!({"story": "x"})).is_none());
        assert!(PostRecord::from_value(json!({"id": 42})).is_none());
        assert!(PostRecord::from_value(json!("6815841748_1")).is_none());
        assert!(serde_json::from_str::<PostRecord>(r#"{"message":"m"}"#).is_err());

        let post = PostRecord::from_value(json!({"id": "1_2"})).expect("has id");
        assert_eq!(post.id(), "1_2");
    }

    #[test]
    fn test_created_at_parses_graph_format() {
        let post: PostRecord =
            serde_json::from_str(r#"{"id":"1","created_time":"2016-08-16T21:19:19+0000"}"#)
                .expect("valid post");
        let at = post.created_at().expect("parsable timestamp");
        assert_eq!(at.to_rfc3339(), "2016-08-16T21:19:19+00:00");
    }

    #[test]
    fn test_created_at_missing_or_garbage() {
        let post: PostRecord = serde_json::from_str(r#"{"id":"1"}"#).expect("valid post");
        assert_eq!(post.created_at(), None);

        let post: PostRecord =
            serde_json::from_str(r#"{"id":"1","created_time":"yesterday"}"#).expect("valid post");
        assert_eq!(post.created_at(), None);
    }

    #[test]
    fn test_posts_page_requires_data() {
        assert!(serde_json::from_str::<PostsPage>(r#"{"paging":{}}"#).is_err());
        let page: PostsPage = serde_json::from_str(r#"{"data":[]}"#).expect("empty page");
        assert!(page.data.is_empty());
    }
}
