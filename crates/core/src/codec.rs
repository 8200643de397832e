//! Reversible encodings wrapped around serialized builder stores.
//!
//! Some builders do not store their tree as plain JSON text: Brizy wraps it
//! in base64, Visual Composer URL-encodes it. A [`Pipeline`] lists those
//! wrappers outermost first; reading applies them in order and then parses
//! JSON, writing serializes JSON and applies them in reverse.
//! [`Pipeline::reencode_tree`] keeps the bytes of values that did not
//! change, see [`crate::jsontext`].
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::codec::{Base64Codec, Pipeline, UrlCodec};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new().then(UrlCodec).then(Base64Codec);
//! let stored = pipeline.encode_tree(&json!({"a": "b c"})).unwrap();
//! assert_eq!(pipeline.decode_tree(&stored).unwrap(), json!({"a": "b c"}));
//! ```

use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde_json::Value;

use crate::{EasyLanguageError, Result, jsontext};

/// The characters JavaScript's `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One reversible text encoding step.
pub trait Codec: Send + Sync + fmt::Debug {
    fn decode(&self, input: &str) -> Result<String>;
    fn encode(&self, input: &str) -> String;
}

/// URI component encoding (`%XX` escapes, `%20` for space).
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlCodec;

impl Codec for UrlCodec {
    fn decode(&self, input: &str) -> Result<String> {
        percent_decode_str(input)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .map_err(|e| EasyLanguageError::InvalidEncoding(e.to_string()))
    }

    fn encode(&self, input: &str) -> String {
        utf8_percent_encode(input, URI_COMPONENT).to_string()
    }
}

/// Standard base64 with padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Codec for Base64Codec {
    fn decode(&self, input: &str) -> Result<String> {
        let bytes = general_purpose::STANDARD.decode(input.trim())?;
        String::from_utf8(bytes).map_err(|e| EasyLanguageError::InvalidEncoding(e.to_string()))
    }

    fn encode(&self, input: &str) -> String {
        general_purpose::STANDARD.encode(input)
    }
}

/// Ordered wrapper encodings around a JSON document.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    codecs: Vec<Arc<dyn Codec>>,
    required_keys: Vec<String>,
}

impl Pipeline {
    /// A pipeline for plain JSON text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next inner wrapper.
    pub fn then(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Require a top-level key in the decoded object.
    pub fn require(mut self, key: &str) -> Self {
        self.required_keys.push(key.to_string());
        self
    }

    /// Unwrap every encoding, leaving the JSON text.
    pub fn decode_text(&self, stored: &str) -> Result<String> {
        let mut text = stored.to_string();
        for codec in &self.codecs {
            text = codec.decode(&text)?;
        }
        Ok(text)
    }

    /// Unwrap every encoding and parse the JSON document.
    pub fn decode_tree(&self, stored: &str) -> Result<Value> {
        let tree: Value = serde_json::from_str(&self.decode_text(stored)?)?;
        self.validate(&tree)?;
        Ok(tree)
    }

    /// Check the required top-level keys of an already decoded tree.
    pub fn validate(&self, tree: &Value) -> Result<()> {
        match self.required_keys.iter().find(|key| tree.get(key.as_str()).is_none()) {
            Some(missing) => Err(EasyLanguageError::MissingKey(missing.clone())),
            None => Ok(()),
        }
    }

    /// Re-apply the encodings to JSON text, innermost first.
    pub fn encode_text(&self, text: &str) -> String {
        self.codecs.iter().rev().fold(text.to_string(), |text, codec| codec.encode(&text))
    }

    /// Serialize the tree and re-apply the encodings.
    pub fn encode_tree(&self, tree: &Value) -> Result<String> {
        Ok(self.encode_text(&serde_json::to_string(tree)?))
    }

    /// Serialize an edited tree against the JSON text it was decoded from.
    ///
    /// Unchanged values keep their original bytes and changed ones follow
    /// the original escaping style.
    pub fn reencode_tree(&self, tree: &Value, decoded: &str) -> Result<String> {
        Ok(self.encode_text(&jsontext::rewrite(decoded, tree)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_codec() {
        assert_eq!(UrlCodec.encode(r#"{"a":"b c/ä"}"#), "%7B%22a%22%3A%22b%20c%2F%C3%A4%22%7D");
        assert_eq!(UrlCodec.decode("%7B%22a%22%3A%22b%20c%2F%C3%A4%22%7D").unwrap(), r#"{"a":"b c/ä"}"#);
    }

    #[test]
    fn test_url_codec_leaves_uri_component_marks() {
        assert_eq!(UrlCodec.encode("it's (fine)!*~"), "it's%20(fine)!*~");
        assert_eq!(UrlCodec.encode("a+b&c=d#e"), "a%2Bb%26c%3Dd%23e");
    }

    #[test]
    fn test_reencode_keeps_untouched_bytes() {
        let pipeline = Pipeline::new().then(UrlCodec);
        let decoded = r#"{"elements":{"a":{"text":"Old","link":"http:\/\/x.de\/","alt":"Kinder\u00e4"}}}"#;
        let stored = UrlCodec.encode(decoded);

        let mut tree = pipeline.decode_tree(&stored).unwrap();
        tree["elements"]["a"]["text"] = json!("Neu");

        let rewritten = pipeline.reencode_tree(&tree, &pipeline.decode_text(&stored).unwrap()).unwrap();
        assert_eq!(rewritten, UrlCodec.encode(&decoded.replace("Old", "Neu")));
    }

    #[test]
    fn test_url_codec_rejects_invalid_utf8() {
        assert!(matches!(UrlCodec.decode("%FF%FE"), Err(EasyLanguageError::InvalidEncoding(_))));
    }

    #[test]
    fn test_base64_codec() {
        assert_eq!(Base64Codec.encode("{}"), "e30=");
        assert_eq!(Base64Codec.decode("e30=").unwrap(), "{}");
        assert!(matches!(Base64Codec.decode("not base64!"), Err(EasyLanguageError::Base64(_))));
    }

    #[test]
    fn test_plain_json_pipeline() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.decode_tree(r#"[{"id":"a"}]"#).unwrap(), json!([{"id": "a"}]));
        assert!(matches!(pipeline.decode_tree("[{"), Err(EasyLanguageError::Json(_))));
    }

    #[test]
    fn test_required_keys() {
        let pipeline = Pipeline::new().require("elements");
        assert!(pipeline.decode_tree(r#"{"elements":{}}"#).is_ok());
        assert!(matches!(pipeline.decode_tree(r#"{"other":1}"#), Err(EasyLanguageError::MissingKey(_))));
    }

    #[test]
    fn test_chained_encodings_are_applied_in_reverse_on_write() {
        let pipeline = Pipeline::new().then(UrlCodec).then(Base64Codec);
        let tree = json!({"text": "Grüße + mehr"});

        let stored = pipeline.encode_tree(&tree).unwrap();
        let base64 = UrlCodec.decode(&stored).unwrap();
        let json_text = Base64Codec.decode(&base64).unwrap();

        assert_eq!(serde_json::from_str::<Value>(&json_text).unwrap(), tree);
        assert_eq!(pipeline.decode_tree(&stored).unwrap(), tree);
    }
}
