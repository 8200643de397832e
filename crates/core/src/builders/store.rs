//! Metadata stores holding a builder's widget tree.
//!
//! A store is a metadata key plus the encodings needed to reach the tree:
//! the value is decoded with the store's pipeline when it is stored as a
//! string and used as-is when stored natively. Some builders keep a second,
//! encoded tree inside a field of the first one; [`TreeStore::nested`]
//! describes that inner layer. Writing re-applies exactly the encodings
//! that were found on read, and JSON text layers are rewritten against
//! their original text so untouched values keep their bytes.

use serde_json::Value;
use tracing::{debug, trace};

use crate::codec::Pipeline;
use crate::document::Document;
use crate::fragment::Fragment;
use crate::tree::{self, FieldPath, TreeSchema};
use crate::{EasyLanguageError, Result};

/// Where and how a builder stores its tree.
#[derive(Debug, Clone)]
pub struct TreeStore {
    key: &'static str,
    pipeline: Pipeline,
    nested: Option<(FieldPath, Pipeline)>,
}

/// A decoded store, remembering the JSON text of encoded layers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTree {
    outer: Value,
    outer_text: Option<String>,
    inner: Option<(Value, Option<String>)>,
}

impl StoredTree {
    /// The widget tree.
    pub fn tree(&self) -> &Value {
        match &self.inner {
            Some((inner, _)) => inner,
            None => &self.outer,
        }
    }

    pub fn tree_mut(&mut self) -> &mut Value {
        match &mut self.inner {
            Some((inner, _)) => inner,
            None => &mut self.outer,
        }
    }

    /// The decoded metadata value around a nested tree.
    pub fn envelope_mut(&mut self) -> &mut Value {
        &mut self.outer
    }
}

impl TreeStore {
    /// A store holding JSON text or a native value under `key`.
    pub fn new(key: &'static str) -> Self {
        Self { key, pipeline: Pipeline::new(), nested: None }
    }

    /// Decode string values with `pipeline` instead of plain JSON.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// The tree lives at `path` inside the stored value, encoded with `pipeline`.
    pub fn nested(mut self, path: &str, pipeline: Pipeline) -> Self {
        self.nested = Some((FieldPath::parse(path), pipeline));
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and decode the store. `Ok(None)` when nothing is stored.
    pub fn load(&self, doc: &dyn Document) -> Result<Option<StoredTree>> {
        let Some(stored) = doc.metadata(self.key) else {
            return Ok(None);
        };
        if is_empty(stored) {
            return Ok(None);
        }

        let (outer, outer_text) = decode_layer(&self.pipeline, stored)?;
        let inner = match &self.nested {
            None => None,
            Some((path, pipeline)) => {
                let value = path.resolve(&outer).ok_or_else(|| EasyLanguageError::MissingKey(path.to_string()))?;
                Some(decode_layer(pipeline, value)?)
            }
        };

        Ok(Some(StoredTree { outer, outer_text, inner }))
    }

    /// Encode and write the store back to the document.
    pub fn save(&self, doc: &mut dyn Document, stored: StoredTree) -> Result<()> {
        let StoredTree { mut outer, outer_text, inner } = stored;

        if let (Some((path, pipeline)), Some((tree, text))) = (&self.nested, inner) {
            let value = encode_layer(pipeline, tree, text.as_deref())?;
            let slot = path.resolve_mut(&mut outer).ok_or_else(|| EasyLanguageError::MissingKey(path.to_string()))?;
            *slot = value;
        }

        let value = encode_layer(&self.pipeline, outer, outer_text.as_deref())?;
        doc.set_metadata(self.key, value);
        Ok(())
    }

    /// Flow text of the stored tree; empty when missing or malformed.
    pub fn fragments(&self, doc: &dyn Document, schema: &TreeSchema) -> Vec<Fragment> {
        match self.load(doc) {
            Ok(Some(stored)) => tree::collect_fragments(stored.tree(), schema),
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!(document = doc.id(), store = self.key, error = %e, "Unreadable builder store");
                Vec::new()
            }
        }
    }

    /// Replace whole-field matches in the stored tree and write it back.
    ///
    /// Returns whether the store was rewritten. Missing or malformed
    /// stores are left alone.
    pub fn replace(&self, doc: &mut dyn Document, schema: &TreeSchema, original: &str, simplified: &str) -> bool {
        self.update(doc, |stored| tree::replace_text(stored.tree_mut(), schema, original, simplified))
    }

    /// Load, let `edit` mutate the decoded store, and save if it reports a change.
    pub fn update(&self, doc: &mut dyn Document, edit: impl FnOnce(&mut StoredTree) -> bool) -> bool {
        let mut stored = match self.load(doc) {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(e) => {
                debug!(document = doc.id(), store = self.key, error = %e, "Unreadable builder store");
                return false;
            }
        };

        if !edit(&mut stored) {
            trace!(document = doc.id(), store = self.key, "No matching field");
            return false;
        }

        match self.save(doc, stored) {
            Ok(()) => true,
            Err(e) => {
                debug!(document = doc.id(), store = self.key, error = %e, "Could not encode builder store");
                false
            }
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn decode_layer(pipeline: &Pipeline, value: &Value) -> Result<(Value, Option<String>)> {
    match value {
        Value::String(stored) => {
            let text = pipeline.decode_text(stored)?;
            let tree: Value = serde_json::from_str(&text)?;
            pipeline.validate(&tree)?;
            Ok((tree, Some(text)))
        }
        native => {
            pipeline.validate(native)?;
            Ok((native.clone(), None))
        }
    }
}

fn encode_layer(pipeline: &Pipeline, value: Value, text: Option<&str>) -> Result<Value> {
    match text {
        Some(text) => Ok(Value::String(pipeline.reencode_tree(&value, text)?)),
        None => Ok(value),
    }
}
