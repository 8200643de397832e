//! Brizy.
//!
//! The `brizy` metadata value wraps the editor state: `brizy-post` holds
//! the base64-encoded JSON tree in `editor_data` plus the compiled HTML.
//! After the tree changes the compiled HTML is stale, so `needs_compile`
//! is raised and a rebuild requested.

use serde_json::Value;
use tracing::debug;

use super::{PageBuilder, TreeStore, is_replacement, meta_present, replace_in_content, site_link};
use crate::builderconfig::BuilderConfig;
use crate::codec::{Base64Codec, Pipeline};
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{self, FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "brizy/brizy.php";
const UID_KEY: &str = "brizy_post_uid";
const DATA_KEY: &str = "brizy";
const POST_FIELD: &str = "brizy-post";

/// Adapter for Brizy's base64-wrapped editor data.
#[derive(Debug, Clone)]
pub struct Brizy {
    schema: TreeSchema,
    store: TreeStore,
}

impl Brizy {
    pub const ID: &'static str = "brizy";

    pub fn new(config: BuilderConfig) -> Self {
        Self {
            schema: TreeSchema::new(&["type"], config.widgets),
            store: TreeStore::new(DATA_KEY).nested("brizy-post.editor_data", Pipeline::new().then(Base64Codec)),
        }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("RichText", FlowTextField::html("value.text"))
                .with("Button", FlowTextField::text("value.text"))
                .with("Accordion", FlowTextField::text("value.labelText")),
        )
    }
}

impl Default for Brizy {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Brizy {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Brizy"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_present(doc, UID_KEY)
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
        if is_replacement(original, simplified) {
            let changed = self.store.update(doc, |stored| {
                if !tree::replace_text(stored.tree_mut(), &self.schema, original, simplified) {
                    return false;
                }
                if let Some(post) = stored.envelope_mut().get_mut(POST_FIELD).and_then(Value::as_object_mut) {
                    post.insert("needs_compile".to_string(), Value::Bool(true));
                }
                true
            });

            if changed {
                debug!(document = doc.id(), builder = Self::ID, "Requesting rebuild");
                doc.trigger_rebuild(Self::ID);
            }
        }

        replace_in_content(doc.raw_content(), original, simplified)
    }

    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &[], &[("p", &id), ("brizy-edit", "")])
    }
}
