//! The unit of flow text handed to a simplification provider.

use serde::{Deserialize, Serialize};

/// One extracted piece of flow text.
///
/// `text` is the exact substring found in the stored representation, so it
/// doubles as the fragment's identity when the simplified text is written
/// back. Fragments are created fresh on every extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text as stored, possibly containing inline markup when `is_html` is set.
    pub text: String,
    /// Whether the text must be treated as HTML.
    pub is_html: bool,
}

impl Fragment {
    /// Creates a fragment, returning `None` for empty or whitespace-only text.
    pub fn new(text: impl Into<String>, is_html: bool) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { text, is_html })
    }

    /// Plain-text view of the fragment, with markup stripped for HTML fragments.
    pub fn plain_text(&self) -> String {
        if self.is_html { strip_tags(&self.text) } else { self.text.clone() }
    }
}

/// Remove all markup from an HTML snippet, keeping text nodes.
pub fn strip_tags(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    fragment.root_element().text().collect::<String>()
}

/// Collects non-blank fragments into a list.
///
/// Shared by the adapters so the whitespace rule lives in one place.
#[derive(Debug, Default)]
pub struct FragmentList {
    fragments: Vec<Fragment>,
}

impl FragmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str, is_html: bool) {
        if let Some(fragment) = Fragment::new(text, is_html) {
            self.fragments.push(fragment);
        }
    }

    pub fn extend(&mut self, other: Vec<Fragment>) {
        self.fragments.extend(other);
    }

    pub fn into_vec(self) -> Vec<Fragment> {
        self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_rejected() {
        assert!(Fragment::new("", false).is_none());
        assert!(Fragment::new("   \n\t", true).is_none());
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let fragment = Fragment::new("  Hello  ", false).unwrap();
        assert_eq!(fragment.text, "  Hello  ");
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let fragment = Fragment::new("<p>Hello <strong>world</strong></p>", true).unwrap();
        assert_eq!(fragment.plain_text(), "Hello world");

        let plain = Fragment::new("a < b", false).unwrap();
        assert_eq!(plain.plain_text(), "a < b");
    }

    #[test]
    fn test_fragment_list_keeps_duplicates() {
        let mut list = FragmentList::new();
        list.push("Same", false);
        list.push(" ", false);
        list.push("Same", false);
        assert_eq!(list.into_vec().len(), 2);
    }
}
