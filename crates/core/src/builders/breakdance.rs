//! Breakdance.
//!
//! `_breakdance_data` is a JSON object whose `tree_json_string` field holds
//! the element tree as a second, JSON-encoded document. Elements are
//! `{id, data: {type, properties}, children}` with namespaced type names
//! such as `EssentialElements\Heading`.

use super::{PageBuilder, TreeStore, meta_present, reinsert_tree, site_link};
use crate::builderconfig::BuilderConfig;
use crate::codec::Pipeline;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "breakdance/plugin.php";
const DATA_KEY: &str = "_breakdance_data";
const TREE_FIELD: &str = "tree_json_string";
const TEXT: &str = "data.properties.content.content.text";

/// Adapter for Breakdance's JSON-in-JSON element tree.
#[derive(Debug, Clone)]
pub struct Breakdance {
    schema: TreeSchema,
    store: TreeStore,
}

impl Breakdance {
    pub const ID: &'static str = "breakdance";

    pub fn new(config: BuilderConfig) -> Self {
        Self {
            schema: TreeSchema::new(&["data.type"], config.widgets),
            store: TreeStore::new(DATA_KEY).nested(TREE_FIELD, Pipeline::new()),
        }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("EssentialElements\\Heading", FlowTextField::text(TEXT))
                .with("EssentialElements\\Text", FlowTextField::html(TEXT))
                .with("EssentialElements\\RichText", FlowTextField::html(TEXT))
                .with("EssentialElements\\Button", FlowTextField::text(TEXT)),
        )
    }
}

impl Default for Breakdance {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Breakdance {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Breakdance"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_present(doc, DATA_KEY)
    }

    fn extract(&self, doc: &dyn Document) -> Vec<Fragment> {
        if !self.is_object_using_pagebuilder(doc) {
            return Vec::new();
        }
        self.store.fragments(doc, &self.schema)
    }

    fn reinsert(&self, doc: &mut dyn Document, original: &str, simplified: &str) -> String {
        if !self.is_object_using_pagebuilder(doc) {
            return doc.raw_content().to_string();
        }
        reinsert_tree(doc, Self::ID, std::slice::from_ref(&self.store), &self.schema, original, simplified, true)
    }

    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &[], &[("breakdance", "builder"), ("id", &id)])
    }
}
