//! Salient theme.
//!
//! Salient bundles its own copy of WPBakery, so posts use the `vc_*`
//! shortcodes plus the theme's `nectar_*` elements. Posts imported from
//! demo content often lack the WPBakery status flag, so a `[vc_row` in the
//! content counts as well.

use super::wpbakery::{self, STATUS_KEY};
use super::{PageBuilder, meta_equals, replace_in_content, shortcode_fragments};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::shortcode::ShortcodeRule;

const THEME: &str = "Salient";

/// Adapter for the Salient theme's page builder.
#[derive(Debug, Clone)]
pub struct Salient {
    config: BuilderConfig,
}

impl Salient {
    pub const ID: &'static str = "salient";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// WPBakery's table extended by the theme's elements.
    pub fn default_config() -> BuilderConfig {
        let mut rules = wpbakery::default_rules();
        rules.extend([
            ShortcodeRule::body("nectar_highlighted_text"),
            ShortcodeRule::body("split_line_heading"),
            ShortcodeRule::body("fancy-ul"),
            ShortcodeRule::attributes("nectar_cta", &["text"]),
            ShortcodeRule::attributes("nectar_btn", &["text"]),
            ShortcodeRule::attributes("nectar_icon_list_item", &["header", "text"]),
            ShortcodeRule::attributes_and_body("toggle", &["title"]),
            ShortcodeRule::attributes("tab", &["title"]),
        ]);

        let mut html = wpbakery::DEFAULT_HTML.to_vec();
        html.extend(["nectar_highlighted_text", "split_line_heading", "fancy-ul", "toggle"]);

        BuilderConfig::for_shortcodes(rules, &html)
    }
}

impl Default for Salient {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Salient {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Salient"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_theme(THEME)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, STATUS_KEY, "true") || doc.raw_content().contains("[vc_row")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;
    use crate::environment::StaticEnvironment;

    #[test]
    fn test_detection_by_content() {
        let builder = Salient::default();
        assert!(builder.is_object_using_pagebuilder(&Post::new(1, "[vc_row][vc_column][/vc_column][/vc_row]")));
        assert!(builder.is_object_using_pagebuilder(&Post::new(1, "").with_meta(STATUS_KEY, "true")));
        assert!(!builder.is_object_using_pagebuilder(&Post::new(1, "<p>Classic</p>")));
    }

    #[test]
    fn test_shortcodes_outside_a_row_are_ignored() {
        let mut doc = Post::new(1, r#"[nectar_btn text="Read more"]"#);
        let builder = Salient::default();

        assert!(builder.extract(&doc).is_empty());
        assert_eq!(builder.reinsert(&mut doc, "Read more", "Mehr lesen"), r#"[nectar_btn text="Read more"]"#);
    }

    #[test]
    fn test_child_theme_activates() {
        let env = StaticEnvironment::default().with_theme("Salient Child").with_parent_theme("Salient");
        assert!(Salient::default().is_active(&env));
    }

    #[test]
    fn test_theme_elements() {
        let doc = Post::new(
            1,
            r#"[vc_row][split_line_heading]<h2>Big <em>title</em></h2>[/split_line_heading][nectar_btn text="Read more"][/vc_row]"#,
        );
        let fragments = Salient::default().extract(&doc);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "<h2>Big <em>title</em></h2>");
        assert!(fragments[0].is_html);
        assert_eq!(fragments[1].text, "Read more");
        assert!(!fragments[1].is_html);
    }
}
