//! Elementor.
//!
//! The layout lives in `_elementor_data`, a JSON array of elements
//! (`elType` section/column/container/widget) with nested `elements`.
//! Widgets are told apart by `widgetType` and keep their text under
//! `settings`. The raw content only holds a rendered copy, and Elementor
//! regenerates its CSS and cached HTML after a save, hence the rebuild.

use super::{PageBuilder, TreeStore, meta_equals, reinsert_tree, site_link};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "elementor/elementor.php";
const EDIT_MODE_KEY: &str = "_elementor_edit_mode";
const DATA_KEY: &str = "_elementor_data";

/// Adapter for Elementor's JSON element tree.
#[derive(Debug, Clone)]
pub struct Elementor {
    schema: TreeSchema,
    store: TreeStore,
}

impl Elementor {
    pub const ID: &'static str = "elementor";

    pub fn new(config: BuilderConfig) -> Self {
        Self { schema: TreeSchema::new(&["widgetType"], config.widgets), store: TreeStore::new(DATA_KEY) }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("heading", FlowTextField::text("settings.title"))
                .with("text-editor", FlowTextField::html("settings.editor"))
                .with("button", FlowTextField::text("settings.text"))
                .with("icon-box", FlowTextField::text("settings.title_text"))
                .with("icon-box", FlowTextField::html("settings.description_text"))
                .with("image-box", FlowTextField::text("settings.title_text"))
                .with("image-box", FlowTextField::html("settings.description_text"))
                .with("call-to-action", FlowTextField::text("settings.title"))
                .with("call-to-action", FlowTextField::html("settings.description"))
                .with("call-to-action", FlowTextField::text("settings.button"))
                .with("testimonial", FlowTextField::html("settings.testimonial_content"))
                .with("alert", FlowTextField::text("settings.alert_title"))
                .with("alert", FlowTextField::html("settings.alert_description")),
        )
    }
}

impl Default for Elementor {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Elementor {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Elementor"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, EDIT_MODE_KEY, "builder")
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
        site_link(env, &["wp-admin", "post.php"], &[("post", &id), ("action", "elementor")])
    }
}
