//! Enfold theme (Avia Layout Builder).
//!
//! Besides the raw content the builder keeps a copy of the shortcode
//! source in `_aviaLayoutBuilderCleanData`, which the editor loads in
//! preference to the content. Both are updated together.

use serde_json::Value;
use tracing::trace;

use super::{PageBuilder, is_replacement, meta_equals, replace_in_content, shortcode_fragments};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::shortcode::ShortcodeRule;

const THEME: &str = "Enfold";
const STATUS_KEY: &str = "_aviaLayoutBuilder_active";
const CLEAN_DATA_KEY: &str = "_aviaLayoutBuilderCleanData";

/// Adapter for Avia Layout Builder shortcode content.
#[derive(Debug, Clone)]
pub struct Enfold {
    config: BuilderConfig,
}

impl Enfold {
    pub const ID: &'static str = "enfold";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_shortcodes(
            vec![
                ShortcodeRule::body("av_textblock"),
                ShortcodeRule::attributes("av_heading", &["heading"]),
                ShortcodeRule::attributes("av_button", &["label"]),
                ShortcodeRule::attributes_and_body("av_toggle", &["title"]),
                ShortcodeRule::attributes_and_body("av_tab", &["title"]),
                ShortcodeRule::attributes_and_body("av_iconlist_item", &["title"]),
                ShortcodeRule::attributes_and_body("av_notification", &["title"]),
            ],
            &["av_textblock", "av_toggle", "av_tab", "av_iconlist_item", "av_notification"],
        )
    }
}

impl Default for Enfold {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Enfold {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Avia Layout Builder"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_theme(THEME)
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
        if is_replacement(original, simplified)
            && let Some(clean_data) = doc.metadata_str(CLEAN_DATA_KEY)
            && clean_data.contains(original)
        {
            let updated = clean_data.replace(original, simplified);
            doc.set_metadata(CLEAN_DATA_KEY, Value::String(updated));
            trace!(document = doc.id(), "Updated layout builder clean data");
        }

        replace_in_content(doc.raw_content(), original, simplified)
    }
}
