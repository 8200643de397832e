//! Shortcode scanning and attribute parsing.
//!
//! Matches the host's shortcode grammar for a single tag name:
//!
//! - `[tag attrs]` and `[tag attrs /]` are self-contained
//! - `[tag attrs]body[/tag]` encloses everything up to the first `[/tag]`
//! - `[[tag]]` is an escaped literal and never matches
//! - the tag name must be followed by whitespace, `/` or `]`
//!
//! Attribute values and bodies are returned as slices of the source so
//! that a later plain substring replacement hits exactly the same text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::{EasyLanguageError, Result};

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"([^"]*)"(?:\s|$)|'([^']*)'(?:\s|$)|(\S+)(?:\s|$)"#,
    )
    .expect("valid regex")
});

/// Which parts of a shortcode carry flow text.
///
/// Without attributes the body is extracted. With attributes their values
/// are extracted instead, plus the body when `with_body` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeRule {
    pub name: String,
    pub attributes: Vec<String>,
    pub with_body: bool,
}

impl ShortcodeRule {
    pub fn body(name: &str) -> Self {
        Self { name: name.to_string(), attributes: Vec::new(), with_body: true }
    }

    pub fn attributes(name: &str, attributes: &[&str]) -> Self {
        Self { name: name.to_string(), attributes: attributes.iter().map(|a| a.to_string()).collect(), with_body: false }
    }

    pub fn attributes_and_body(name: &str, attributes: &[&str]) -> Self {
        Self { with_body: true, ..Self::attributes(name, attributes) }
    }

    /// Whether the body is extracted.
    pub fn extracts_body(&self) -> bool {
        self.with_body || self.attributes.is_empty()
    }
}

/// One occurrence of a shortcode in the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch<'a> {
    /// Raw attribute text between the tag name and the closing bracket.
    pub attributes: &'a str,
    /// Enclosed content, `None` for self-contained shortcodes.
    pub body: Option<&'a str>,
    /// Byte range of the whole shortcode in the scanned content.
    pub range: Range<usize>,
}

impl<'a> ShortcodeMatch<'a> {
    /// Value of a named attribute exactly as written in the source.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        parse_attributes(self.attributes)
            .into_iter()
            .find(|attr| attr.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|attr| attr.value)
    }
}

/// A parsed shortcode attribute. Positional values have no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: Option<String>,
    pub value: &'a str,
}

/// Find every occurrence of `tag` in `content`, in document order.
pub fn scan<'a>(content: &'a str, tag: &str) -> Result<Vec<ShortcodeMatch<'a>>> {
    let opening = Regex::new(&format!(r"\[(\[?){}(\s[^\]]*?)?(/)?\]", regex::escape(tag)))
        .map_err(|e| EasyLanguageError::ConfigError(format!("Invalid shortcode tag {}: {}", tag, e)))?;
    let closing = format!("[/{}]", tag);

    let mut matches = Vec::new();
    let mut position = 0;

    while let Some(caps) = opening.captures_at(content, position) {
        let Some(whole) = caps.get(0) else { break };
        let escaped_open = caps.get(1).is_some_and(|m| !m.is_empty());
        let attributes = caps.get(2).map_or("", |m| m.as_str());
        let self_closing = caps.get(3).is_some();

        let mut end = whole.end();
        let mut body = None;
        if !self_closing && let Some(offset) = content[end..].find(&closing) {
            body = Some(&content[end..end + offset]);
            end += offset + closing.len();
        }

        let escaped = escaped_open && content[end..].starts_with(']');
        if escaped {
            position = end + 1;
            continue;
        }

        // The opening bracket of `[[tag]` without a matching `]]` belongs to the text.
        let start = if escaped_open { whole.start() + 1 } else { whole.start() };
        matches.push(ShortcodeMatch { attributes, body, range: start..end });
        position = end;
    }

    Ok(matches)
}

/// Parse raw attribute text the way the host does.
///
/// Names are lower-cased; values are left untouched.
pub fn parse_attributes(text: &str) -> Vec<Attribute<'_>> {
    let mut attributes = Vec::new();

    for caps in ATTRIBUTE.captures_iter(text) {
        let named = [(1, 2), (3, 4), (5, 6)]
            .into_iter()
            .find_map(|(n, v)| Some((caps.get(n)?, caps.get(v)?)));

        if let Some((name, value)) = named {
            attributes.push(Attribute { name: Some(name.as_str().to_lowercase()), value: value.as_str() });
        } else if let Some(value) = caps.get(7).or_else(|| caps.get(8)).or_else(|| caps.get(9)) {
            attributes.push(Attribute { name: None, value: value.as_str() });
        }
    }

    attributes
}
