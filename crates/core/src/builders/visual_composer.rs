//! Visual Composer Website Builder.
//!
//! `vcv-pageContent` is raw-URL-encoded JSON of the shape
//! `{"elements": {"<id>": {"tag": "textBlock", "output": "…"}}}`.

use super::{PageBuilder, TreeStore, meta_present, reinsert_tree, site_link};
use crate::builderconfig::BuilderConfig;
use crate::codec::{Pipeline, UrlCodec};
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::tree::{FlowTextField, TreeSchema, WidgetTable};

const PLUGIN: &str = "visualcomposer/plugin-wordpress.php";
const EDITOR_KEY: &str = "vcv-be-editor";
const CONTENT_KEY: &str = "vcv-pageContent";

/// Adapter for Visual Composer's URL-encoded element map.
#[derive(Debug, Clone)]
pub struct VisualComposer {
    schema: TreeSchema,
    store: TreeStore,
}

impl VisualComposer {
    pub const ID: &'static str = "visual-composer";

    pub fn new(config: BuilderConfig) -> Self {
        Self {
            schema: TreeSchema::new(&["tag"], config.widgets),
            store: TreeStore::new(CONTENT_KEY).with_pipeline(Pipeline::new().then(UrlCodec).require("elements")),
        }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_widgets(
            WidgetTable::new()
                .with("textBlock", FlowTextField::html("output"))
                .with("basicButton", FlowTextField::text("buttonText"))
                .with("outlineButton", FlowTextField::text("buttonText"))
                .with("featureDescription", FlowTextField::html("description")),
        )
    }
}

impl Default for VisualComposer {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for VisualComposer {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Visual Composer"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        matches!(doc.metadata_str(EDITOR_KEY), Some("fe" | "be")) || meta_present(doc, CONTENT_KEY)
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
        site_link(env, &["wp-admin", "post.php"], &[("post", &id), ("action", "edit"), ("vcv-action", "frontend")])
    }
}
