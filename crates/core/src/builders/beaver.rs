//! Beaver Builder.
//!
//! Layouts are flat maps of nodes keyed by node id. Module nodes have
//! `type: "module"` and a `settings` object whose own `type` names the
//! module, so the settings object is the widget. The published layout and
//! the editor draft are stored separately and both are kept in sync.

use super::{PageBuilder, TreeStore, meta_truthy, reinsert_tree, site_link};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGINS: [&str; 2] = ["beaver-builder-lite-version/fl-builder.php", "bb-plugin/fl-builder.php"];
const ENABLED_KEY: &str = "_fl_builder_enabled";
const DATA_KEY: &str = "_fl_builder_data";
const DRAFT_KEY: &str = "_fl_builder_draft";

/// Adapter for Beaver Builder node maps.
#[derive(Debug, Clone)]
pub struct BeaverBuilder {
    schema: TreeSchema,
    stores: [TreeStore; 2],
}

impl BeaverBuilder {
    pub const ID: &'static str = "beaver-builder";

    pub fn new(config: BuilderConfig) -> Self {
        Self {
            schema: TreeSchema::new(&["type"], config.widgets),
            stores: [TreeStore::new(DATA_KEY), TreeStore::new(DRAFT_KEY)],
        }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("heading", FlowTextField::text("heading"))
                .with("rich-text", FlowTextField::html("text"))
                .with("html", FlowTextField::html("html"))
                .with("button", FlowTextField::text("text"))
                .with("callout", FlowTextField::text("title"))
                .with("callout", FlowTextField::html("text"))
                .with("cta", FlowTextField::text("title"))
                .with("cta", FlowTextField::html("text"))
                .with("cta", FlowTextField::text("btn_text"))
                .with("photo", FlowTextField::text("caption")),
        )
    }
}

impl Default for BeaverBuilder {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for BeaverBuilder {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Beaver Builder"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        PLUGINS.iter().any(|plugin| env.is_plugin_active(plugin))
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_truthy(doc, ENABLED_KEY)
    }

    /// Fragments come from the published layout only; the draft mirrors it.
    fn extract(&self, doc: &dyn Document) -> Vec<Fragment> {
        if !self.is_object_using_pagebuilder(doc) {
            return Vec::new();
        }
        self.stores[0].fragments(doc, &self.schema)
    }

    fn reinsert(&self, doc: &mut dyn Document, original: &str, simplified: &str) -> String {
        if !self.is_object_using_pagebuilder(doc) {
            return doc.raw_content().to_string();
        }
        reinsert_tree(doc, Self::ID, &self.stores, &self.schema, original, simplified, true)
    }

    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &[], &[("p", &id), ("fl_builder", "")])
    }
}
