use crate::blocks::BlockRule;
use crate::error::{EasyLanguageError, Result};
use crate::shortcode::ShortcodeRule;
use crate::tree::{FieldPath, FlowTextField, WidgetTable};

/// Represents a single builder-config directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Shortcode whose body and/or named attributes carry flow text
    Shortcode(ShortcodeRule),

    /// Whether a shortcode's fragments are HTML
    Html(String, bool),

    /// Field of a tree widget that carries flow text
    Widget(String, FlowTextField),

    /// Block whose inner HTML is flow text
    Block(BlockRule),
}

/// Flow-text tables for one page builder.
///
/// Only the tables relevant to the builder's format are consulted: shortcode
/// builders read `shortcodes` and `html_support`, tree builders read
/// `widgets`, the block editor reads `blocks`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderConfig {
    pub shortcodes: Vec<ShortcodeRule>,
    pub html_support: Vec<(String, bool)>,
    pub widgets: WidgetTable,
    pub blocks: Vec<BlockRule>,
}

impl BuilderConfig {
    /// Create a new empty builder config
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a shortcode builder; shortcodes listed in `html` carry HTML
    pub fn for_shortcodes(shortcodes: Vec<ShortcodeRule>, html: &[&str]) -> Self {
        let html_support = html.iter().map(|name| (name.to_string(), true)).collect();
        Self { shortcodes, html_support, ..Self::default() }
    }

    /// Config for a tree builder
    pub fn for_widgets(widgets: WidgetTable) -> Self {
        Self { widgets, ..Self::default() }
    }

    /// Config for the block editor
    pub fn for_blocks(blocks: Vec<BlockRule>) -> Self {
        Self { blocks, ..Self::default() }
    }

    /// Add a directive to this config
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::Shortcode(rule) => {
                if let Some(existing) = self.shortcodes.iter_mut().find(|r| r.name == rule.name) {
                    *existing = rule;
                } else {
                    self.shortcodes.push(rule);
                }
            }
            Directive::Html(name, is_html) => {
                if let Some(existing) = self.html_support.iter_mut().find(|(n, _)| *n == name) {
                    existing.1 = is_html;
                } else {
                    self.html_support.push((name, is_html));
                }
            }
            Directive::Widget(kind, field) => self.widgets.add(&kind, field),
            Directive::Block(rule) => {
                if let Some(existing) = self.blocks.iter_mut().find(|b| b.name == rule.name) {
                    *existing = rule;
                } else {
                    self.blocks.push(rule);
                }
            }
        }
    }

    /// Merge another config into this one
    ///
    /// Entries of `other` replace entries with the same name; new names are appended.
    pub fn merge(&mut self, other: &BuilderConfig) {
        for rule in &other.shortcodes {
            self.add_directive(Directive::Shortcode(rule.clone()));
        }
        for (name, is_html) in &other.html_support {
            self.add_directive(Directive::Html(name.clone(), *is_html));
        }
        self.widgets.merge(&other.widgets);
        for rule in &other.blocks {
            self.add_directive(Directive::Block(rule.clone()));
        }
    }

    /// Whether fragments of `shortcode` are HTML. Unlisted shortcodes are plain text.
    pub fn shortcode_is_html(&self, shortcode: &str) -> bool {
        self.html_support
            .iter()
            .find(|(name, _)| name == shortcode)
            .is_some_and(|(_, is_html)| *is_html)
    }

    /// Check if this config is effectively empty
    pub fn is_empty(&self) -> bool {
        self.shortcodes.is_empty() && self.html_support.is_empty() && self.widgets.is_empty() && self.blocks.is_empty()
    }
}

/// Parse a directive line from builder-config format
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(EasyLanguageError::BuilderConfigError("Empty or comment line".to_string()));
    }

    let Some((key, value)) = line.split_once(':') else {
        return Err(EasyLanguageError::BuilderConfigError(format!("Invalid directive format: {}", line)));
    };
    let parts: Vec<&str> = value.split('|').map(str::trim).collect();
    let name = parts[0];
    if name.is_empty() {
        return Err(EasyLanguageError::BuilderConfigError(format!("Missing name in: {}", line)));
    }

    match key.trim() {
        "shortcode" => {
            let attributes: Vec<String> = parts
                .get(1)
                .map(|list| list.split(',').map(str::trim).filter(|a| !a.is_empty()).map(String::from).collect())
                .unwrap_or_default();
            let with_body = match parts.get(2) {
                Some(&"body") => true,
                Some(other) => {
                    return Err(EasyLanguageError::BuilderConfigError(format!(
                        "Invalid shortcode mode: {}",
                        other
                    )));
                }
                None => attributes.is_empty(),
            };
            Ok(Directive::Shortcode(ShortcodeRule { name: name.to_string(), attributes, with_body }))
        }
        "html" => {
            let flag = parts
                .get(1)
                .ok_or_else(|| EasyLanguageError::BuilderConfigError(format!("Missing html flag: {}", value)))?;
            Ok(Directive::Html(name.to_string(), parse_boolean(flag)?))
        }
        "widget" => {
            let path = parts
                .get(1)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| EasyLanguageError::BuilderConfigError(format!("Missing field path: {}", value)))?;
            let is_html = parse_html_flag(parts.get(2))?;
            Ok(Directive::Widget(name.to_string(), FlowTextField { path: FieldPath::parse(path), is_html }))
        }
        "block" => {
            let is_html = parse_html_flag(parts.get(1))?;
            Ok(Directive::Block(BlockRule { name: name.to_string(), is_html }))
        }
        other => Err(EasyLanguageError::BuilderConfigError(format!("Unknown directive: {}", other))),
    }
}

/// Parse the optional trailing `html` / `text` marker
fn parse_html_flag(flag: Option<&&str>) -> Result<bool> {
    match flag {
        None | Some(&"text") => Ok(false),
        Some(&"html") => Ok(true),
        Some(other) => Err(EasyLanguageError::BuilderConfigError(format!("Invalid content kind: {}", other))),
    }
}

/// Parse a boolean value from builder-config format
fn parse_boolean(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(EasyLanguageError::BuilderConfigError(format!("Invalid boolean value: {}", value))),
    }
}
