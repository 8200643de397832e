//! SiteOrigin Page Builder.
//!
//! `panels_data` holds `widgets`, `grids` and `grid_cells`. Widgets are
//! identified by the PHP class stored in `panels_info.class`.

use super::{PageBuilder, TreeStore, reinsert_tree};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "siteorigin-panels/siteorigin-panels.php";
const DATA_KEY: &str = "panels_data";

/// Adapter for SiteOrigin panels data.
#[derive(Debug, Clone)]
pub struct SiteOrigin {
    schema: TreeSchema,
    store: TreeStore,
}

impl SiteOrigin {
    pub const ID: &'static str = "siteorigin";

    pub fn new(config: BuilderConfig) -> Self {
        Self { schema: TreeSchema::new(&["panels_info.class"], config.widgets), store: TreeStore::new(DATA_KEY) }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("WP_Widget_Text", FlowTextField::text("title"))
                .with("WP_Widget_Text", FlowTextField::html("text"))
                .with("SiteOrigin_Widget_Editor_Widget", FlowTextField::text("title"))
                .with("SiteOrigin_Widget_Editor_Widget", FlowTextField::html("text"))
                .with("SiteOrigin_Widget_Headline_Widget", FlowTextField::text("headline.text"))
                .with("SiteOrigin_Widget_Headline_Widget", FlowTextField::text("sub_headline.text"))
                .with("SiteOrigin_Widget_Button_Widget", FlowTextField::text("text")),
        )
    }
}

impl Default for SiteOrigin {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for SiteOrigin {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "SiteOrigin Page Builder"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        doc.metadata(DATA_KEY).and_then(|data| data.get("widgets")).is_some()
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
