//! WPBakery Page Builder.
//!
//! Layouts are shortcode soup in the raw content, e.g.
//! `[vc_row][vc_column][vc_column_text]<p>Text</p>[/vc_column_text]…`.
//! Rich-text elements carry their text in the body; buttons, headings and
//! call-to-action boxes carry it in attributes.

use super::{PageBuilder, meta_equals, replace_in_content, shortcode_fragments, site_link};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::shortcode::ShortcodeRule;

pub(crate) const PLUGIN: &str = "js_composer/js_composer.php";
pub(crate) const STATUS_KEY: &str = "_wpb_vc_js_status";

/// Adapter for WPBakery shortcode content.
#[derive(Debug, Clone)]
pub struct WpBakery {
    config: BuilderConfig,
}

impl WpBakery {
    pub const ID: &'static str = "wpbakery";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Built-in flow-text table.
    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_shortcodes(default_rules(), &DEFAULT_HTML)
    }
}

pub(crate) const DEFAULT_HTML: [&str; 5] = ["vc_column_text", "vc_message", "vc_toggle", "vc_cta", "vc_tta_section"];

pub(crate) fn default_rules() -> Vec<ShortcodeRule> {
    vec![
        ShortcodeRule::body("vc_column_text"),
        ShortcodeRule::body("vc_message"),
        ShortcodeRule::attributes_and_body("vc_toggle", &["title"]),
        ShortcodeRule::attributes_and_body("vc_cta", &["h2", "h4"]),
        ShortcodeRule::attributes("vc_custom_heading", &["text"]),
        ShortcodeRule::attributes("vc_btn", &["title"]),
        ShortcodeRule::attributes("vc_tta_section", &["title"]),
        ShortcodeRule::attributes("vc_text_separator", &["title"]),
        ShortcodeRule::attributes("vc_single_image", &["title"]),
    ]
}

impl Default for WpBakery {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for WpBakery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "WPBakery"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, STATUS_KEY, "true")
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

    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &["wp-admin", "post.php"], &[("vc_action", "vc_inline"), ("post_id", &id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;
    use crate::environment::StaticEnvironment;
    use rstest::rstest;

    fn post(content: &str) -> Post {
        Post::new(3, content).with_meta(STATUS_KEY, "true")
    }

    #[test]
    fn test_body_shortcode_extract_and_reinsert() {
        let mut doc = post("[vc_column_text]Hello world[/vc_column_text]");
        let builder = WpBakery::default();

        let fragments = builder.extract(&doc);
        assert_eq!(fragments, vec![Fragment { text: "Hello world".to_string(), is_html: true }]);

        let content = builder.reinsert(&mut doc, "Hello world", "Hallo Welt");
        assert_eq!(content, "[vc_column_text]Hallo Welt[/vc_column_text]");
    }

    #[test]
    fn test_attribute_shortcode() {
        let doc = post(r#"[vc_btn title="Click me"]"#);
        let fragments = WpBakery::default().extract(&doc);
        assert_eq!(fragments, vec![Fragment { text: "Click me".to_string(), is_html: false }]);
    }

    #[test]
    fn test_whitespace_body_is_skipped() {
        let doc = post("[vc_column_text]   [/vc_column_text]");
        assert!(WpBakery::default().extract(&doc).is_empty());
    }

    #[test]
    fn test_attributes_then_body() {
        let doc = post(r#"[vc_cta h2="Offer" h4="Today only"]<p>Details</p>[/vc_cta]"#);
        let texts: Vec<String> = WpBakery::default().extract(&doc).into_iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["Offer", "Today only", "<p>Details</p>"]);
    }

    #[test]
    fn test_reinsert_missing_text_is_noop() {
        let mut doc = post("[vc_column_text]Hello[/vc_column_text]");
        let content = WpBakery::default().reinsert(&mut doc, "Gone", "Weg");
        assert_eq!(content, doc.content);
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let mut doc = post("[vc_column_text]Hello[/vc_column_text]");
        let builder = WpBakery::default();

        let first = builder.reinsert(&mut doc, "Hello", "Hallo");
        doc.content = first.clone();
        assert_eq!(builder.reinsert(&mut doc, "Hello", "Hallo"), first);
    }

    #[test]
    fn test_identical_text_in_two_shortcodes_is_replaced_everywhere() {
        let mut doc = post("[vc_column_text]Same[/vc_column_text][vc_message]Same[/vc_message]");
        let builder = WpBakery::default();

        assert_eq!(builder.extract(&doc).len(), 2);
        let content = builder.reinsert(&mut doc, "Same", "Gleich");
        assert_eq!(content, "[vc_column_text]Gleich[/vc_column_text][vc_message]Gleich[/vc_message]");
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(None, false)]
    fn test_document_detection(#[case] status: Option<&str>, #[case] expected: bool) {
        let mut doc = Post::new(1, "[vc_row][/vc_row]");
        if let Some(status) = status {
            doc = doc.with_meta(STATUS_KEY, status);
        }
        assert_eq!(WpBakery::default().is_object_using_pagebuilder(&doc), expected);
    }

    #[test]
    fn test_shortcodes_without_status_are_ignored() {
        let mut doc = Post::new(3, "[vc_column_text]<p>Hello</p>[/vc_column_text]");
        let builder = WpBakery::default();

        assert!(builder.extract(&doc).is_empty());
        assert_eq!(builder.reinsert(&mut doc, "<p>Hello</p>", "<p>Hallo</p>"), doc.content);
    }

    #[test]
    fn test_environment_detection() {
        let builder = WpBakery::default();
        assert!(builder.is_active(&StaticEnvironment::default().with_plugin(PLUGIN)));
        assert!(!builder.is_active(&StaticEnvironment::default()));
    }

    #[test]
    fn test_edit_link() {
        let link = WpBakery::default().edit_link(&post(""), &StaticEnvironment::default());
        assert_eq!(link, "http://localhost/wp-admin/post.php?vc_action=vc_inline&post_id=3");
    }
}
