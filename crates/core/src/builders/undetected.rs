//! Generic fallback for documents no specific adapter claims.
//!
//! The whole rendered content is one HTML fragment. Writing it back
//! replaces the stored content wholesale, but only while the stored content
//! still renders to the extracted text.

use std::sync::Arc;

use tracing::trace;

use super::{PageBuilder, is_replacement};
use crate::document::Document;
use crate::environment::{ContentRenderer, DefaultRenderer, Environment};
use crate::fragment::{Fragment, FragmentList};

/// Fallback adapter over rendered content.
#[derive(Debug, Clone)]
pub struct Undetected {
    renderer: Arc<dyn ContentRenderer>,
}

impl Undetected {
    pub const ID: &'static str = "undetected";

    pub fn new(renderer: Arc<dyn ContentRenderer>) -> Self {
        Self { renderer }
    }
}

impl Default for Undetected {
    fn default() -> Self {
        Self::new(Arc::new(DefaultRenderer::default()))
    }
}

impl PageBuilder for Undetected {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Undetected"
    }

    fn is_active(&self, _env: &dyn Environment) -> bool {
        true
    }

    fn is_object_using_pagebuilder(&self, _doc: &dyn Document) -> bool {
        true
    }

    fn extract(&self, doc: &dyn Document) -> Vec<Fragment> {
        let mut fragments = FragmentList::new();
        fragments.push(&self.renderer.render(doc.raw_content()), true);
        fragments.into_vec()
    }

    fn reinsert(&self, doc: &mut dyn Document, original: &str, simplified: &str) -> String {
        let content = doc.raw_content();
        if is_replacement(original, simplified) && self.renderer.render(content) == original {
            return simplified.to_string();
        }

        trace!(document = doc.id(), "Rendered content no longer matches, leaving it unchanged");
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;

    #[derive(Debug)]
    struct Uppercase;

    impl ContentRenderer for Uppercase {
        fn render(&self, raw: &str) -> String {
            raw.to_uppercase()
        }
    }

    #[test]
    fn test_single_html_fragment_of_rendered_content() {
        let doc = Post::new(1, "[gallery ids=\"1,2\"]<p>Plain page</p>");
        let fragments = Undetected::default().extract(&doc);
        assert_eq!(fragments, vec![Fragment { text: "<p>Plain page</p>".to_string(), is_html: true }]);
    }

    #[test]
    fn test_empty_content_has_no_fragment() {
        assert!(Undetected::default().extract(&Post::new(1, "  ")).is_empty());
    }

    #[test]
    fn test_reinsert_replaces_whole_content() {
        let mut doc = Post::new(1, "<p>Plain page</p>");
        assert_eq!(Undetected::default().reinsert(&mut doc, "<p>Plain page</p>", "<p>Einfach</p>"), "<p>Einfach</p>");
    }

    #[test]
    fn test_reinsert_stale_text_is_noop() {
        let mut doc = Post::new(1, "<p>Edited meanwhile</p>");
        assert_eq!(Undetected::default().reinsert(&mut doc, "<p>Plain page</p>", "<p>Einfach</p>"), doc.content);
    }

    #[test]
    fn test_injected_renderer() {
        let builder = Undetected::new(Arc::new(Uppercase));
        let doc = Post::new(1, "hello");
        assert_eq!(builder.extract(&doc)[0].text, "HELLO");
    }
}
