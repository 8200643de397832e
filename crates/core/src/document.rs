//! Read/write access to a stored page or post.
//!
//! The core never owns document storage. Adapters see a document only
//! through the [`Document`] trait: its id, its raw content and the
//! builder-specific metadata fields stored next to it. [`Post`] is an
//! in-memory implementation used by the CLI and the tests.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::{Document, Post};
//!
//! let mut post = Post::new(7, "[vc_column_text]Hello[/vc_column_text]")
//!     .with_meta("_wpb_vc_js_status", "true");
//! assert_eq!(post.raw_content(), "[vc_column_text]Hello[/vc_column_text]");
//! post.set_raw_content("changed".to_string());
//! assert_eq!(post.raw_content(), "changed");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accessor for one stored document.
///
/// Metadata values are arbitrary structured values: JSON text, base64
/// blobs or native arrays and objects, depending on the builder.
pub trait Document {
    /// Numeric identifier of the document.
    fn id(&self) -> u64;

    /// The canonical stored body.
    fn raw_content(&self) -> &str;

    /// A builder-specific metadata field, if stored.
    fn metadata(&self, key: &str) -> Option<&Value>;

    /// Replace the stored body.
    fn set_raw_content(&mut self, content: String);

    /// Store a metadata field.
    fn set_metadata(&mut self, key: &str, value: Value);

    /// Ask the host to rebuild cached output for `builder`.
    ///
    /// Only adapters whose builder caches a rendered form call this.
    fn trigger_rebuild(&mut self, _builder: &str) {}

    /// Metadata field as a string slice, when stored as a string.
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata(key).and_then(Value::as_str)
    }
}

/// In-memory document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
    /// Builders that asked for a rebuild while this post was processed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rebuilds: Vec<String>,
}

impl Post {
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self { id, content: content.into(), ..Default::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }

    /// Parses a post from its JSON representation.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Document for Post {
    fn id(&self) -> u64 {
        self.id
    }

    fn raw_content(&self) -> &str {
        &self.content
    }

    fn metadata(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    fn set_raw_content(&mut self, content: String) {
        self.content = content;
    }

    fn set_metadata(&mut self, key: &str, value: Value) {
        self.meta.insert(key.to_string(), value);
    }

    fn trigger_rebuild(&mut self, builder: &str) {
        self.rebuilds.push(builder.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_accessors() {
        let post = Post::new(1, "").with_meta("_elementor_edit_mode", "builder").with_meta("panels_data", json!({}));

        assert_eq!(post.metadata_str("_elementor_edit_mode"), Some("builder"));
        assert_eq!(post.metadata_str("panels_data"), None);
        assert!(post.metadata("panels_data").is_some());
        assert!(post.metadata("missing").is_none());
    }

    #[test]
    fn test_post_from_json() {
        let post = Post::from_json(r#"{"id": 12, "content": "Body", "meta": {"b": 1, "a": 2}}"#).unwrap();
        assert_eq!(post.id, 12);
        assert_eq!(post.raw_content(), "Body");
        let keys: Vec<&String> = post.meta.keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_trigger_rebuild_is_recorded() {
        let mut post = Post::new(1, "");
        post.trigger_rebuild("elementor");
        assert_eq!(post.rebuilds, vec!["elementor".to_string()]);
    }
}
