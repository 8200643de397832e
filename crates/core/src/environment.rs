//! Host environment probes and the content-rendering pipeline.
//!
//! Builder detection depends on which plugins are active and which theme
//! (or parent theme) is in use. That state lives outside the core and can
//! change between requests, so adapters receive it through the
//! [`Environment`] trait on every call instead of caching it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{EasyLanguageError, Result};

/// Read-only view of the host installation.
pub trait Environment {
    /// Whether the plugin identified by its main file (`dir/file.php`) is active.
    fn is_plugin_active(&self, plugin: &str) -> bool;

    /// Name of the active theme.
    fn active_theme(&self) -> &str;

    /// Name of the active theme's parent, if it is a child theme.
    fn parent_theme(&self) -> Option<&str>;

    /// Base URL of the site, used for edit links.
    fn site_url(&self) -> &Url;

    /// Whether the active theme or its parent is named `name`.
    fn is_theme(&self, name: &str) -> bool {
        self.active_theme() == name || self.parent_theme() == Some(name)
    }
}

/// Environment described by plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticEnvironment {
    #[serde(default)]
    pub active_plugins: Vec<String>,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub parent_theme: Option<String>,
    #[serde(default = "default_site_url")]
    pub site_url: Url,
}

fn default_site_url() -> Url {
    Url::parse("http://localhost/").expect("static URL parses")
}

impl StaticEnvironment {
    pub fn new(site_url: Url) -> Self {
        Self { active_plugins: Vec::new(), theme: String::new(), parent_theme: None, site_url }
    }

    pub fn with_plugin(mut self, plugin: &str) -> Self {
        self.active_plugins.push(plugin.to_string());
        self
    }

    pub fn with_theme(mut self, theme: &str) -> Self {
        self.theme = theme.to_string();
        self
    }

    pub fn with_parent_theme(mut self, parent: &str) -> Self {
        self.parent_theme = Some(parent.to_string());
        self
    }
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self::new(default_site_url())
    }
}

impl Environment for StaticEnvironment {
    fn is_plugin_active(&self, plugin: &str) -> bool {
        self.active_plugins.iter().any(|p| p == plugin)
    }

    fn active_theme(&self) -> &str {
        &self.theme
    }

    fn parent_theme(&self) -> Option<&str> {
        self.parent_theme.as_deref()
    }

    fn site_url(&self) -> &Url {
        &self.site_url
    }
}

/// The host's content filter pipeline, turning stored content into final HTML.
pub trait ContentRenderer: Send + Sync + fmt::Debug {
    fn render(&self, raw: &str) -> String;
}

/// Shortcodes registered by the host core itself.
pub const CORE_SHORTCODES: &[&str] = &["audio", "caption", "embed", "gallery", "playlist", "video", "wp_caption"];

static CORE_SHORTCODE_TAGS: LazyLock<Option<Regex>> =
    LazyLock::new(|| shortcode_pattern(CORE_SHORTCODES).expect("valid regex"));

/// Opening, closing and self-closing tags of the given shortcodes.
fn shortcode_pattern<S: AsRef<str>>(tags: &[S]) -> std::result::Result<Option<Regex>, regex::Error> {
    if tags.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = tags.iter().map(|tag| regex::escape(tag.as_ref())).collect();
    Regex::new(&format!(r"\[/?(?:{})(?:\s[^\]]*)?/?\]", names.join("|"))).map(Some)
}

/// Approximates the host pipeline without a running host.
///
/// Drops HTML comments (which also removes block delimiters), drops the
/// brackets of registered shortcodes while keeping enclosed content, and
/// trims. Bracketed text that is not a registered shortcode stays.
#[derive(Debug, Clone)]
pub struct DefaultRenderer {
    shortcodes: Option<Regex>,
}

impl DefaultRenderer {
    /// A renderer treating exactly `tags` as registered shortcodes.
    pub fn with_shortcodes<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let shortcodes = shortcode_pattern(tags).map_err(|e| EasyLanguageError::ConfigError(e.to_string()))?;
        Ok(Self { shortcodes })
    }
}

impl Default for DefaultRenderer {
    /// Registers the core shortcodes only.
    fn default() -> Self {
        Self { shortcodes: CORE_SHORTCODE_TAGS.clone() }
    }
}

impl ContentRenderer for DefaultRenderer {
    fn render(&self, raw: &str) -> String {
        let without_comments = remove_comments(raw);
        match &self.shortcodes {
            Some(pattern) => pattern.replace_all(&without_comments, "").trim().to_string(),
            None => without_comments.trim().to_string(),
        }
    }
}

/// Remove HTML comments from a content fragment
fn remove_comments(html: &str) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            document_content_handlers: vec![lol_html::doc_comments!(|c| {
                c.remove();
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() || rewriter.end().is_err() {
        return html.to_string();
    }

    output
}
