//! Generic traversal of builder widget trees.
//!
//! Tree-based builders (Elementor, Beaver Builder, Bricks, Brizy and the
//! like) store layouts as nested arrays and objects with a duck-typed
//! discriminator field. Every JSON object in such a tree is treated as a
//! [`Node`]: its kind is the first configured discriminator path that
//! resolves to a string, its fields are its own keys, and its children are
//! the nested objects and arrays in stored order. One depth-first pre-order
//! walk serves extraction and reinsertion for every builder.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::tree::{FlowTextField, TreeSchema, WidgetTable, collect_fragments};
//! use serde_json::json;
//!
//! let mut widgets = WidgetTable::new();
//! widgets.add("heading", FlowTextField::text("heading"));
//! let schema = TreeSchema::new(&["type"], widgets);
//!
//! let tree = json!({"type": "module", "settings": {"type": "heading", "heading": "Welcome"}});
//! let fragments = collect_fragments(&tree, &schema);
//! assert_eq!(fragments[0].text, "Welcome");
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::fragment::{Fragment, FragmentList};

/// Path to a value below a node, written dotted (`settings.title`).
///
/// Numeric segments index into arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').filter(|s| !s.is_empty()).map(String::from).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        resolve_segments(&self.0, value)
    }

    pub fn resolve_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        resolve_segments_mut(&self.0, value)
    }

    fn resolve_in<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.0.split_first()?;
        resolve_segments(rest, object.get(first)?)
    }

    fn resolve_in_mut<'a>(&self, object: &'a mut Map<String, Value>) -> Option<&'a mut Value> {
        let (first, rest) = self.0.split_first()?;
        resolve_segments_mut(rest, object.get_mut(first)?)
    }
}

fn resolve_segments<'a>(segments: &[String], value: &'a Value) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    })
}

fn resolve_segments_mut<'a>(segments: &[String], value: &'a mut Value) -> Option<&'a mut Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?),
        _ => None,
    })
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A field of a widget that holds flow text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowTextField {
    pub path: FieldPath,
    pub is_html: bool,
}

impl FlowTextField {
    pub fn text(path: &str) -> Self {
        Self { path: FieldPath::parse(path), is_html: false }
    }

    pub fn html(path: &str) -> Self {
        Self { path: FieldPath::parse(path), is_html: true }
    }
}

/// Widget kind to flow-text fields, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetTable {
    entries: Vec<(String, Vec<FlowTextField>)>,
}

impl WidgetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to a widget kind, replacing a field with the same path.
    pub fn add(&mut self, kind: &str, field: FlowTextField) {
        let fields = match self.entries.iter().position(|(k, _)| k == kind) {
            Some(index) => &mut self.entries[index].1,
            None => {
                self.entries.push((kind.to_string(), Vec::new()));
                let last = self.entries.len() - 1;
                &mut self.entries[last].1
            }
        };

        if let Some(existing) = fields.iter_mut().find(|f| f.path == field.path) {
            *existing = field;
        } else {
            fields.push(field);
        }
    }

    /// Builder-style variant of [`WidgetTable::add`].
    pub fn with(mut self, kind: &str, field: FlowTextField) -> Self {
        self.add(kind, field);
        self
    }

    pub fn fields(&self, kind: &str) -> Option<&[FlowTextField]> {
        self.entries.iter().find(|(k, _)| k == kind).map(|(_, fields)| fields.as_slice())
    }

    /// Fields of `other` replace the field list of the same kind.
    pub fn merge(&mut self, other: &WidgetTable) {
        for (kind, fields) in &other.entries {
            match self.entries.iter_mut().find(|(k, _)| k == kind) {
                Some(entry) => entry.1 = fields.clone(),
                None => self.entries.push((kind.clone(), fields.clone())),
            }
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How to read a builder's tree: where the discriminator lives and which
/// widget kinds carry flow text.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSchema {
    discriminators: Vec<FieldPath>,
    widgets: WidgetTable,
}

impl TreeSchema {
    pub fn new(discriminators: &[&str], widgets: WidgetTable) -> Self {
        Self { discriminators: discriminators.iter().map(|d| FieldPath::parse(d)).collect(), widgets }
    }

    pub fn widgets(&self) -> &WidgetTable {
        &self.widgets
    }

    fn kind_of<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a str> {
        self.discriminators.iter().find_map(|path| path.resolve_in(object)?.as_str())
    }
}

/// One object in a builder tree, viewed as a tagged node.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub kind: Option<&'a str>,
    pub object: &'a Map<String, Value>,
}

impl<'a> Node<'a> {
    pub fn field(&self, path: &FieldPath) -> Option<&'a Value> {
        path.resolve_in(self.object)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Value> {
        self.object.values().filter(|v| v.is_object() || v.is_array())
    }
}

/// Visit every object in `value` once, depth-first, parents before children.
pub fn walk<'a>(value: &'a Value, schema: &TreeSchema, visit: &mut dyn FnMut(Node<'a>)) {
    match value {
        Value::Object(object) => {
            let node = Node { kind: schema.kind_of(object), object };
            visit(node);
            for child in node.children() {
                walk(child, schema, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, schema, visit);
            }
        }
        _ => {}
    }
}

/// Mutable counterpart of [`walk`]. The node's kind is resolved before the
/// visitor runs, so the visitor may rewrite any field.
pub fn walk_mut(
    value: &mut Value, schema: &TreeSchema, visit: &mut dyn FnMut(Option<&str>, &mut Map<String, Value>),
) {
    match value {
        Value::Object(object) => {
            let kind = schema.kind_of(object).map(String::from);
            visit(kind.as_deref(), object);
            for child in object.values_mut() {
                if child.is_object() || child.is_array() {
                    walk_mut(child, schema, visit);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_mut(item, schema, visit);
            }
        }
        _ => {}
    }
}

/// Collect the flow text of every configured widget, in traversal order.
pub fn collect_fragments(tree: &Value, schema: &TreeSchema) -> Vec<Fragment> {
    let mut fragments = FragmentList::new();

    walk(tree, schema, &mut |node| {
        let Some(fields) = node.kind.and_then(|kind| schema.widgets.fields(kind)) else {
            return;
        };
        for field in fields {
            if let Some(text) = node.field(&field.path).and_then(Value::as_str) {
                fragments.push(text, field.is_html);
            }
        }
    });

    fragments.into_vec()
}

/// Replace every configured field whose whole value equals `original`.
///
/// Returns whether any field changed.
pub fn replace_text(tree: &mut Value, schema: &TreeSchema, original: &str, simplified: &str) -> bool {
    let mut changed = false;

    walk_mut(tree, schema, &mut |kind, object| {
        let Some(fields) = kind.and_then(|kind| schema.widgets.fields(kind)) else {
            return;
        };
        for field in fields {
            if let Some(Value::String(text)) = field.path.resolve_in_mut(object)
                && *text == original
            {
                *text = simplified.to_string();
                changed = true;
            }
        }
    });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn heading_schema() -> TreeSchema {
        TreeSchema::new(&["type"], WidgetTable::new().with("heading", FlowTextField::text("heading")))
    }

    #[test]
    fn test_module_with_heading_settings() {
        let tree = json!({"type": "module", "settings": {"type": "heading", "heading": "Welcome"}});

        let fragments = collect_fragments(&tree, &heading_schema());
        assert_eq!(fragments, vec![Fragment { text: "Welcome".to_string(), is_html: false }]);
    }

    #[test]
    fn test_replace_keeps_discriminators() {
        let mut tree = json!({"type": "module", "settings": {"type": "heading", "heading": "Welcome"}});

        assert!(replace_text(&mut tree, &heading_schema(), "Welcome", "Willkommen"));
        assert_eq!(tree, json!({"type": "module", "settings": {"type": "heading", "heading": "Willkommen"}}));
    }

    #[test]
    fn test_whitespace_field_is_skipped() {
        let tree = json!({"type": "heading", "heading": "   "});
        assert!(collect_fragments(&tree, &heading_schema()).is_empty());
    }

    #[test]
    fn test_traversal_is_pre_order_and_complete() {
        let tree = json!([
            {"type": "heading", "heading": "First", "children": [
                {"type": "heading", "heading": "Second"},
                {"type": "row", "children": [{"type": "heading", "heading": "Third"}]}
            ]},
            {"type": "heading", "heading": "Fourth"}
        ]);

        let texts: Vec<String> = collect_fragments(&tree, &heading_schema()).into_iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["First", "Second", "Third", "Fourth"]);
    }

    #[test]
    fn test_duplicates_are_kept_and_all_replaced() {
        let mut tree = json!([{"type": "heading", "heading": "Same"}, {"type": "heading", "heading": "Same"}]);

        assert_eq!(collect_fragments(&tree, &heading_schema()).len(), 2);
        assert!(replace_text(&mut tree, &heading_schema(), "Same", "Gleich"));
        assert_eq!(tree[0]["heading"], "Gleich");
        assert_eq!(tree[1]["heading"], "Gleich");
    }

    #[test]
    fn test_replace_requires_whole_field_match() {
        let mut tree = json!({"type": "heading", "heading": "Welcome home"});

        assert!(!replace_text(&mut tree, &heading_schema(), "Welcome", "Hallo"));
        assert_eq!(tree["heading"], "Welcome home");
    }

    #[test]
    fn test_nested_discriminator_and_field_paths() {
        let schema = TreeSchema::new(
            &["panels_info.class"],
            WidgetTable::new().with("Headline", FlowTextField::text("headline.text")),
        );
        let tree = json!({"widgets": [{"headline": {"text": "Big news"}, "panels_info": {"class": "Headline"}}]});

        let fragments = collect_fragments(&tree, &schema);
        assert_eq!(fragments[0].text, "Big news");
    }

    #[test]
    fn test_unknown_kinds_are_ignored() {
        let tree = json!({"type": "spacer", "heading": "Not flow text"});
        assert!(collect_fragments(&tree, &heading_schema()).is_empty());
    }

    #[test]
    fn test_field_path_array_index() {
        let value = json!({"items": [{"text": "a"}, {"text": "b"}]});
        assert_eq!(FieldPath::parse("items.1.text").resolve(&value), Some(&json!("b")));
        assert_eq!(FieldPath::parse("items.x.text").resolve(&value), None);
    }

    #[test]
    fn test_widget_table_merge_replaces_kind() {
        let mut base = WidgetTable::new()
            .with("heading", FlowTextField::text("title"))
            .with("button", FlowTextField::text("text"));
        base.merge(&WidgetTable::new().with("heading", FlowTextField::html("title")));

        assert_eq!(base.fields("heading"), Some(&[FlowTextField::html("title")][..]));
        assert_eq!(base.kinds().count(), 2);
    }
}
