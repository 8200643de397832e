//! Page-builder adapters.
//!
//! Every supported builder implements [`PageBuilder`]: it knows whether its
//! builder is installed, whether a given document was authored with it,
//! how to extract the document's flow text and how to write one simplified
//! fragment back. Adapters are stateless apart from their flow-text tables,
//! which are injected at construction as a [`BuilderConfig`].
//!
//! Four storage families are covered:
//!
//! - shortcode soup in the raw content (WPBakery, Salient, Divi, Avada, Enfold)
//! - widget trees stored natively or as JSON text in metadata (Elementor,
//!   Beaver Builder, Bricks, SiteOrigin, Themify)
//! - encoded blobs wrapping a tree (Breakdance, Brizy, Visual Composer)
//! - block-editor delimiters and the generic rendered-content fallback

use serde_json::Value;
use tracing::debug;

use crate::builderconfig::BuilderConfig;
use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::{Fragment, FragmentList};
use crate::shortcode;
use crate::tree::TreeSchema;

pub mod avada;
pub mod beaver;
pub mod block_editor;
pub mod breakdance;
pub mod bricks;
pub mod brizy;
pub mod divi;
pub mod elementor;
pub mod enfold;
pub mod salient;
pub mod siteorigin;
pub mod store;
pub mod themify;
pub mod undetected;
pub mod visual_composer;
pub mod wpbakery;

pub use avada::Avada;
pub use beaver::BeaverBuilder;
pub use block_editor::BlockEditor;
pub use breakdance::Breakdance;
pub use bricks::Bricks;
pub use brizy::Brizy;
pub use divi::Divi;
pub use elementor::Elementor;
pub use enfold::Enfold;
pub use salient::Salient;
pub use siteorigin::SiteOrigin;
pub use store::{StoredTree, TreeStore};
pub use themify::Themify;
pub use undetected::Undetected;
pub use visual_composer::VisualComposer;
pub use wpbakery::WpBakery;

/// Common contract of all page-builder adapters.
pub trait PageBuilder: Send + Sync {
    /// Stable machine identifier, also the builder-config file name.
    fn id(&self) -> &'static str;

    /// Human-readable builder name.
    fn name(&self) -> &'static str;

    /// Whether the builder is installed in the environment.
    fn is_active(&self, env: &dyn Environment) -> bool;

    /// Whether this particular document was authored with the builder.
    fn is_object_using_pagebuilder(&self, doc: &dyn Document) -> bool;

    /// Flow-text fragments of the document in stable document order.
    ///
    /// Never fails: documents not authored with the builder and missing or
    /// malformed stores yield an empty list.
    fn extract(&self, doc: &dyn Document) -> Vec<Fragment>;

    /// Write `simplified` where `original` was extracted from.
    ///
    /// Builder metadata is updated on `doc` directly; the returned string
    /// is the new raw content, which the caller persists. Documents not
    /// authored with the builder and text that is no longer present are
    /// left unchanged.
    fn reinsert(&self, doc: &mut dyn Document, original: &str, simplified: &str) -> String;

    /// Admin deep link for editing the document with this builder.
    fn edit_link(&self, doc: &dyn Document, env: &dyn Environment) -> String {
        let id = doc.id().to_string();
        site_link(env, &["wp-admin", "post.php"], &[("post", &id), ("action", "edit")])
    }

    /// Whether the front-end translate menu should be hidden while this builder is used.
    fn hide_translate_menu_in_frontend(&self) -> bool {
        false
    }
}

/// Build a link below the site URL.
pub(crate) fn site_link(env: &dyn Environment, segments: &[&str], query: &[(&str, &str)]) -> String {
    let mut url = env.site_url().clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url.to_string()
}

/// Replace every occurrence of `original` in `content`.
///
/// Blank or identical replacements leave the content untouched.
pub fn replace_in_content(content: &str, original: &str, simplified: &str) -> String {
    if !is_replacement(original, simplified) {
        return content.to_string();
    }
    content.replace(original, simplified)
}

/// Whether a reinsertion can change anything at all.
pub(crate) fn is_replacement(original: &str, simplified: &str) -> bool {
    !original.trim().is_empty() && original != simplified
}

/// Reinsertion shared by the tree builders.
///
/// Every store is updated before the raw content; `rebuild` asks the host
/// to refresh the builder's cached output once a store actually changed.
pub(crate) fn reinsert_tree(
    doc: &mut dyn Document, builder: &str, stores: &[TreeStore], schema: &TreeSchema, original: &str, simplified: &str,
    rebuild: bool,
) -> String {
    if is_replacement(original, simplified) {
        let mut changed = false;
        for store in stores {
            changed |= store.replace(doc, schema, original, simplified);
        }
        if changed && rebuild {
            debug!(document = doc.id(), builder, "Requesting rebuild");
            doc.trigger_rebuild(builder);
        }
    }

    replace_in_content(doc.raw_content(), original, simplified)
}

/// Flow text of the configured shortcodes, grouped by shortcode and then in
/// document order.
pub(crate) fn shortcode_fragments(content: &str, config: &BuilderConfig) -> Vec<Fragment> {
    let mut fragments = FragmentList::new();

    for rule in &config.shortcodes {
        let is_html = config.shortcode_is_html(&rule.name);
        let matches = match shortcode::scan(content, &rule.name) {
            Ok(matches) => matches,
            Err(e) => {
                debug!(shortcode = %rule.name, error = %e, "Skipping shortcode");
                continue;
            }
        };

        for found in matches {
            for attribute in &rule.attributes {
                if let Some(value) = found.attribute(attribute) {
                    fragments.push(value, is_html);
                }
            }
            if rule.extracts_body()
                && let Some(body) = found.body
            {
                fragments.push(body, is_html);
            }
        }
    }

    fragments.into_vec()
}

/// Stored flag equal to `expected`, as a string.
pub(crate) fn meta_equals(doc: &dyn Document, key: &str, expected: &str) -> bool {
    doc.metadata_str(key) == Some(expected)
}

/// Stored value that is set and not empty.
pub(crate) fn meta_present(doc: &dyn Document, key: &str) -> bool {
    match doc.metadata(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// Stored flag in any of the host's truthy spellings.
pub(crate) fn meta_truthy(doc: &dyn Document, key: &str) -> bool {
    match doc.metadata(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !matches!(s.trim(), "" | "0" | "false"),
        _ => false,
    }
}
