//! Bricks theme.
//!
//! Page content is a flat array of elements linked by `parent`/`children`
//! ids; every element has a `name` and a `settings` object.

use super::{PageBuilder, TreeStore, meta_equals, reinsert_tree, site_link};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const THEME: &str = "Bricks";
const MODE_KEY: &str = "_bricks_editor_mode";
const CONTENT_KEY: &str = "_bricks_page_content_2";

/// Adapter for Bricks element arrays.
#[derive(Debug, Clone)]
pub struct Bricks {
    schema: TreeSchema,
    store: TreeStore,
}

impl Bricks {
    pub const ID: &'static str = "bricks";

    pub fn new(config: BuilderConfig) -> Self {
        Self { schema: TreeSchema::new(&["name"], config.widgets), store: TreeStore::new(CONTENT_KEY) }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("heading", FlowTextField::text("settings.text"))
                .with("text", FlowTextField::html("settings.text"))
                .with("text-basic", FlowTextField::text("settings.text"))
                .with("button", FlowTextField::text("settings.text"))
                .with("icon-box", FlowTextField::html("settings.content"))
                .with("alert", FlowTextField::html("settings.content")),
        )
    }
}

impl Default for Bricks {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Bricks {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Bricks"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_theme(THEME)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, MODE_KEY, "bricks")
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

    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &[], &[("p", &id), ("bricks", "run")])
    }

    fn hide_translate_menu_in_frontend(&self) -> bool {
        true
    }
}
