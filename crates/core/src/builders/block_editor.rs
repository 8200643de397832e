//! The host's block editor.
//!
//! Blocks are delimited by HTML comments in the raw content; the inner
//! HTML of text blocks is the flow text. The adapter is active unless the
//! Classic Editor plugin switches the block editor off.

use super::{PageBuilder, replace_in_content};
use crate::blocks::{self, BlockRule};
use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::Fragment;

const CLASSIC_EDITOR: &str = "classic-editor/classic-editor.php";
const BLOCK_MARKER: &str = "<!-- wp:";

/// Adapter for block-editor content.
#[derive(Debug, Clone)]
pub struct BlockEditor {
    config: BuilderConfig,
}

impl BlockEditor {
    pub const ID: &'static str = "block-editor";

    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> BuilderConfig {
        BuilderConfig::for_blocks(vec![
            BlockRule::html("core/paragraph"),
            BlockRule::html("core/heading"),
            BlockRule::html("core/list-item"),
            BlockRule::html("core/button"),
            BlockRule::html("core/verse"),
            BlockRule::html("core/pullquote"),
            BlockRule::html("core/details"),
        ])
    }
}

impl Default for BlockEditor {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl PageBuilder for BlockEditor {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Block Editor"
    }

    fn is_active(&self, env: &dyn Environment) -> bool {
        !env.is_plugin_active(CLASSIC_EDITOR)
    }

    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool {
        doc.raw_content().contains(BLOCK_MARKER)
    }

    fn extract(&self, doc: &dyn Document) -> Vec<Fragment> {
        if !self.is_object_using_pagebuilder(doc) {
            return Vec::new();
        }
        blocks::collect_fragments(doc.raw_content(), &self.config.blocks)
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

    const CONTENT: &str = "<!-- wp:heading -->\n<h2 class=\"wp-block-heading\">Contact</h2>\n<!-- /wp:heading -->\n\n<!-- wp:list -->\n<ul><!-- wp:list-item -->\n<li>Phone</li>\n<!-- /wp:list-item -->\n\n<!-- wp:list-item -->\n<li>Mail</li>\n<!-- /wp:list-item --></ul>\n<!-- /wp:list -->\n\n<!-- wp:image {\"id\":12} -->\n<figure class=\"wp-block-image\"><img src=\"a.jpg\" alt=\"\"/></figure>\n<!-- /wp:image -->";

    #[test]
    fn test_extract() {
        let doc = Post::new(100, CONTENT);
        let texts: Vec<String> = BlockEditor::default().extract(&doc).into_iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["<h2 class=\"wp-block-heading\">Contact</h2>", "<li>Phone</li>", "<li>Mail</li>"]);
    }

    #[test]
    fn test_reinsert_keeps_delimiters() {
        let mut doc = Post::new(100, CONTENT);
        let content = BlockEditor::default().reinsert(&mut doc, "<li>Phone</li>", "<li>Telefon</li>");

        assert!(content.contains("<!-- wp:list-item -->\n<li>Telefon</li>\n<!-- /wp:list-item -->"));
        assert_eq!(content.len(), CONTENT.len() + 2);
    }

    #[test]
    fn test_classic_editor_disables() {
        let builder = BlockEditor::default();
        assert!(builder.is_active(&StaticEnvironment::default()));
        assert!(!builder.is_active(&StaticEnvironment::default().with_plugin(CLASSIC_EDITOR)));
    }

    #[test]
    fn test_detection() {
        let builder = BlockEditor::default();
        assert!(builder.is_object_using_pagebuilder(&Post::new(1, CONTENT)));
        assert!(!builder.is_object_using_pagebuilder(&Post::new(1, "<p>Classic</p>")));
    }

    #[test]
    fn test_classic_content_is_left_alone() {
        let mut doc = Post::new(1, "<p>Classic</p>");
        let builder = BlockEditor::default();

        assert!(builder.extract(&doc).is_empty());
        assert_eq!(builder.reinsert(&mut doc, "<p>Classic</p>", "<p>Einfach</p>"), "<p>Classic</p>");
    }
}
