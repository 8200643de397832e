//! Avada theme and Fusion Builder.

use super::{PageBuilder, meta_equals, replace_in_content, shortcode_fragments};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::shortcode::ShortcodeRule;

const THEME: &str = "Avada";
const PLUGIN: &str = "fusion-builder/fusion-builder.php";
const STATUS_KEY: &str = "fusion_builder_status";

/// Adapter for Fusion Builder shortcode content.
#[derive(Debug, Clone)]
pub struct Avada {
    config: BuilderConfig,
}

impl Avada {
    pub const ID: &'static str = "avada";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_shortcodes(
            vec![
                ShortcodeRule::body("fusion_text"),
                ShortcodeRule::body("fusion_title"),
                ShortcodeRule::body("fusion_button"),
                ShortcodeRule::body("fusion_alert"),
                ShortcodeRule::attributes_and_body("fusion_content_box", &["title"]),
                ShortcodeRule::attributes_and_body("fusion_tagline_box", &["title", "description"]),
                ShortcodeRule::attributes_and_body("fusion_toggle", &["title"]),
                ShortcodeRule::attributes_and_body("fusion_tab", &["title"]),
            ],
            &["fusion_text", "fusion_title", "fusion_alert", "fusion_content_box", "fusion_tagline_box", "fusion_toggle", "fusion_tab"],
        )
    }
}

impl Default for Avada {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Avada {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Avada"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_theme(THEME) || env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, STATUS_KEY, "active")
    }

    fn extract(&self, doc: &dyn Document) -> Vec<Fragment> {
        if !self.is_object_using_pagebuilder(doc) {
            return Vec::new();
        }
        shortcode_fragments(doc.raw_content(), &self.config)
    }

    fn reinsert(&self, doc: &mut dyn Document, original: &str, simplified: &str) -> String {
        if !self.is_object_using_pagebuilder(doc) {
            return doc.raw_content().to_string();
        }
        replace_in_content(doc.raw_content(), original, simplified)
    }
}
