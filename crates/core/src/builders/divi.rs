//! Divi theme and Divi Builder plugin.
//!
//! Modules are `et_pb_*` shortcodes. Titles and button labels live in
//! attributes while most modules also carry rich text in their body.

use super::{PageBuilder, meta_equals, replace_in_content, shortcode_fragments, site_link};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;
use crate::shortcode::ShortcodeRule;

const THEME: &str = "Divi";
const PLUGIN: &str = "divi-builder/divi-builder.php";
const USE_BUILDER_KEY: &str = "_et_pb_use_builder";

/// Adapter for Divi shortcode content.
#[derive(Debug, Clone)]
pub struct Divi {
    config: BuilderConfig,
}

impl Divi {
    pub const ID: &'static str = "divi";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_shortcodes(
            vec![
                ShortcodeRule::body("et_pb_text"),
                ShortcodeRule::attributes_and_body("et_pb_blurb", &["title"]),
                ShortcodeRule::attributes_and_body("et_pb_toggle", &["title"]),
                ShortcodeRule::attributes_and_body("et_pb_accordion_item", &["title"]),
                ShortcodeRule::attributes_and_body("et_pb_tab", &["title"]),
                ShortcodeRule::attributes_and_body("et_pb_cta", &["title", "button_text"]),
                ShortcodeRule::attributes_and_body("et_pb_slide", &["heading", "button_text"]),
                ShortcodeRule::attributes_and_body("et_pb_testimonial", &["author", "job_title"]),
                ShortcodeRule::attributes("et_pb_button", &["button_text"]),
                ShortcodeRule::attributes("et_pb_fullwidth_header", &["title", "subhead"]),
            ],
            &[
                "et_pb_text",
                "et_pb_blurb",
                "et_pb_toggle",
                "et_pb_accordion_item",
                "et_pb_tab",
                "et_pb_cta",
                "et_pb_slide",
                "et_pb_testimonial",
            ],
        )
    }
}

impl Default for Divi {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for Divi {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Divi"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        env.is_theme(THEME) || env.is_plugin_active(PLUGIN)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        meta_equals(doc, USE_BUILDER_KEY, "on")
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

    /// Opens the visual builder on the front end.
    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &[], &[("p", &id), ("et_fb", "1")])
    }

    fn hide_translate_menu_in_frontend(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;
    use crate::environment::StaticEnvironment;
    use rstest::rstest;

    const CONTENT: &str = r#"[et_pb_section][et_pb_row][et_pb_column type="4_4"][et_pb_text]<p>Welcome to our site.</p>[/et_pb_text][et_pb_toggle title="Opening hours"]<p>Mon to Fri</p>[/et_pb_toggle][et_pb_button button_text="Contact" button_url="/contact"][/et_pb_column][/et_pb_row][/et_pb_section]"#;

    #[test]
    fn test_extract_modules() {
        let doc = Post::new(9, CONTENT).with_meta(USE_BUILDER_KEY, "on");
        let fragments = Divi::default().extract(&doc);

        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["<p>Welcome to our site.</p>", "Opening hours", "<p>Mon to Fri</p>", "Contact"]);
        assert!(!fragments[3].is_html);
    }

    #[test]
    fn test_reinsert_attribute_value() {
        let mut doc = Post::new(9, CONTENT).with_meta(USE_BUILDER_KEY, "on");
        let content = Divi::default().reinsert(&mut doc, "Opening hours", "Wann wir offen sind");

        assert!(content.contains(r#"[et_pb_toggle title="Wann wir offen sind"]"#));
        assert!(content.contains("<p>Mon to Fri</p>"));
    }

    #[rstest]
    #[case(StaticEnvironment::default().with_theme("Divi"), true)]
    #[case(StaticEnvironment::default().with_theme("Child").with_parent_theme("Divi"), true)]
    #[case(StaticEnvironment::default().with_plugin(PLUGIN), true)]
    #[case(StaticEnvironment::default().with_theme("Avada"), false)]
    fn test_environment_detection(#[case] env: StaticEnvironment, #[case] expected: bool) {
        assert_eq!(Divi::default().is_active(&env), expected);
    }

    #[test]
    fn test_edit_link_and_menu_hint() {
        let builder = Divi::default();
        let link = builder.edit_link(&Post::new(9, ""), &StaticEnvironment::default());

        assert_eq!(link, "http://localhost/?p=9&et_fb=1");
        assert!(builder.hide_translate_menu_in_frontend());
    }
}
