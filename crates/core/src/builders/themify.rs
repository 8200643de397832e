//! Themify Builder.
//!
//! Builder data is JSON text: rows with `cols`, columns with `modules`,
//! each module a `{mod_name, mod_settings}` pair. Sub-rows nest the same
//! structure inside columns.

use super::{PageBuilder, TreeStore, meta_present, reinsert_tree};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "themify-builder/themify-builder.php";
const THEME: &str = "Themify Ultra";
const DATA_KEY: &str = "_themify_builder_settings_json";

/// Adapter for Themify Builder rows and modules.
#[derive(Debug, Clone)]
pub struct Themify {
    schema: TreeSchema,
    store: TreeStore,
}

impl Themify {
    pub const ID: &'static str = "themify";

    pub fn new(config: BuilderConfig) -> Self {
        Self { schema: TreeSchema::new(&["mod_name"], config.widgets), store: TreeStore::new(DATA_KEY) }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("text", FlowTextField::html("mod_settings.content_text"))
                .with("fancy-heading", FlowTextField::text("mod_settings.heading"))
                .with("fancy-heading", FlowTextField::text("mod_settings.sub_heading"))
                .with("feature", FlowTextField::text("mod_settings.title_feature"))
                .with("feature", FlowTextField::html("mod_settings.content_feature"))
                .with("callout", FlowTextField::text("mod_settings.heading_callout"))
                .with("callout", FlowTextField::html("mod_settings.text_callout"))
                .with("callout", FlowTextField::text("mod_settings.action_btn_text_callout")),
        )
    }
}

impl Default for Themify {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Themify {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Themify Builder"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN) || env.is_theme(THEME)
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
        reinsert_tree(doc, Self::ID, std::slice::from_ref(&self.store), &self.schema, original, simplified, false)
    }
}
