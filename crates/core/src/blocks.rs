//! Block-editor delimiter parsing.
//!
//! Block content is ordinary HTML with comment delimiters:
//! `<!-- wp:heading {"level":3} -->…<!-- /wp:heading -->`, or the void form
//! `<!-- wp:spacer /-->`. The parser turns those delimiters into a tree of
//! [`Block`]s whose `inner_html` is the exact source slice between the
//! opening and closing delimiter, so it can be matched again on write.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::fragment::{Fragment, FragmentList};

static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<!--\s+(?P<closer>/)?wp:(?P<namespace>[a-z][a-z0-9_-]*/)?(?P<name>[a-z][a-z0-9_-]*)\s+(?P<attrs>\{.*?\}\s+)?(?P<void>/)?-->",
    )
    .expect("valid regex")
});

/// A block whose inner HTML is flow text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    /// Fully qualified block name, e.g. `core/paragraph`.
    pub name: String,
    pub is_html: bool,
}

impl BlockRule {
    pub fn html(name: &str) -> Self {
        Self { name: name.to_string(), is_html: true }
    }

    pub fn text(name: &str) -> Self {
        Self { name: name.to_string(), is_html: false }
    }
}

/// One parsed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    /// Fully qualified name; the `core/` namespace is implied when omitted.
    pub name: String,
    /// Attribute object from the opening delimiter, `Null` when absent or invalid.
    pub attrs: Value,
    /// Source between the delimiters, including any inner block markup.
    pub inner_html: &'a str,
    pub inner_blocks: Vec<Block<'a>>,
    /// Byte range of the whole block, delimiters included.
    pub range: Range<usize>,
}

struct OpenBlock<'a> {
    name: String,
    attrs: Value,
    start: usize,
    content_start: usize,
    inner_blocks: Vec<Block<'a>>,
}

/// Parse the top-level blocks of `content`, in document order.
///
/// Text outside any delimiter is ignored. Blocks left open at the end of the
/// input are closed there; stray closers are skipped.
pub fn parse(content: &str) -> Vec<Block<'_>> {
    let mut roots = Vec::new();
    let mut stack: Vec<OpenBlock<'_>> = Vec::new();

    for caps in DELIMITER.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let namespace = caps.name("namespace").map_or("core/", |m| m.as_str());
        let name = format!("{}{}", namespace, caps.name("name").map_or("", |m| m.as_str()));

        if caps.name("closer").is_some() {
            let Some(position) = stack.iter().rposition(|open| open.name == name) else {
                continue;
            };
            while stack.len() > position + 1 {
                close_block(&mut stack, &mut roots, content, whole.start(), whole.start());
            }
            close_block(&mut stack, &mut roots, content, whole.start(), whole.end());
            continue;
        }

        let attrs = caps
            .name("attrs")
            .and_then(|m| serde_json::from_str(m.as_str().trim()).ok())
            .unwrap_or(Value::Null);

        if caps.name("void").is_some() {
            let block =
                Block { name, attrs, inner_html: "", inner_blocks: Vec::new(), range: whole.start()..whole.end() };
            push_block(&mut stack, &mut roots, block);
        } else {
            stack.push(OpenBlock {
                name,
                attrs,
                start: whole.start(),
                content_start: whole.end(),
                inner_blocks: Vec::new(),
            });
        }
    }

    while !stack.is_empty() {
        close_block(&mut stack, &mut roots, content, content.len(), content.len());
    }

    roots
}

fn close_block<'a>(
    stack: &mut Vec<OpenBlock<'a>>, roots: &mut Vec<Block<'a>>, content: &'a str, content_end: usize, end: usize,
) {
    let Some(open) = stack.pop() else { return };
    let block = Block {
        name: open.name,
        attrs: open.attrs,
        inner_html: &content[open.content_start..content_end],
        inner_blocks: open.inner_blocks,
        range: open.start..end,
    };
    push_block(stack, roots, block);
}

fn push_block<'a>(stack: &mut [OpenBlock<'a>], roots: &mut Vec<Block<'a>>, block: Block<'a>) {
    match stack.last_mut() {
        Some(parent) => parent.inner_blocks.push(block),
        None => roots.push(block),
    }
}

/// Visit every block once, parents before their inner blocks.
pub fn walk<'a>(blocks: &[Block<'a>], visit: &mut dyn FnMut(&Block<'a>)) {
    for block in blocks {
        visit(block);
        walk(&block.inner_blocks, visit);
    }
}

/// Collect the inner HTML of every configured leaf block.
///
/// A configured block that contains inner blocks is descended into instead,
/// so each piece of text is reported once. Surrounding whitespace is trimmed
/// from the fragment; the trimmed text is still an exact source substring.
pub fn collect_fragments(content: &str, rules: &[BlockRule]) -> Vec<Fragment> {
    let blocks = parse(content);
    let mut fragments = FragmentList::new();

    walk(&blocks, &mut |block| {
        if !block.inner_blocks.is_empty() {
            return;
        }
        if let Some(rule) = rules.iter().find(|rule| rule.name == block.name) {
            fragments.push(block.inner_html.trim(), rule.is_html);
        }
    });

    fragments.into_vec()
}
