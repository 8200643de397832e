//! Boundary to the external simplification providers.
//!
//! The [`Orchestrator`] drives one pass over a document: select the
//! adapter, extract, hand each fragment to a [`Simplifier`], and write the
//! result back. Providers themselves (HTTP clients, quotas, credentials)
//! live outside this crate and plug in through the trait.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::{BuilderRegistry, Orchestrator, Post, ReplacementMap, SimplifyOptions, StaticEnvironment};
//!
//! let registry = BuilderRegistry::new();
//! let env = StaticEnvironment::default();
//! let mut post = Post::new(1, "<!-- wp:paragraph --><p>Hello</p><!-- /wp:paragraph -->");
//! let simplifier = ReplacementMap::new().with("<p>Hello</p>", "<p>Hallo</p>");
//!
//! let report = Orchestrator::new(&registry).simplify_document(&mut post, &env, &simplifier, &SimplifyOptions::default());
//! assert_eq!(report.changed, 1);
//! assert_eq!(post.content, "<!-- wp:paragraph --><p>Hallo</p><!-- /wp:paragraph -->");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, trace, warn};

use crate::document::Document;
use crate::environment::Environment;
use crate::fragment::strip_tags;
use crate::registry::BuilderRegistry;
use crate::{EasyLanguageError, Result};

/// An external simplification provider.
pub trait Simplifier {
    /// Simplify one fragment from `source_language` into `target_language`.
    fn simplify(&self, text: &str, is_html: bool, source_language: &str, target_language: &str) -> Result<String>;
}

/// Provider that returns every text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSimplifier;

impl Simplifier for NoopSimplifier {
    fn simplify(&self, text: &str, _is_html: bool, _source: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Provider backed by a fixed map of original to simplified text.
///
/// Texts without an entry are returned unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap {
    entries: Map<String, Value>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, original: &str, simplified: &str) -> Self {
        self.entries.insert(original.to_string(), Value::String(simplified.to_string()));
        self
    }

    /// Parses a JSON object of string values.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: Self = serde_json::from_str(json)?;
        if let Some((key, _)) = map.entries.iter().find(|(_, value)| !value.is_string()) {
            return Err(EasyLanguageError::ConfigError(format!("Replacement for {:?} is not a string", key)));
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Simplifier for ReplacementMap {
    fn simplify(&self, text: &str, _is_html: bool, _source: &str, _target: &str) -> Result<String> {
        Ok(self.entries.get(text).and_then(Value::as_str).unwrap_or(text).to_string())
    }
}

/// Options for one simplification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyOptions {
    /// Language of the stored text (default: `de_DE`).
    pub source_language: String,

    /// Reading level to produce (default: `de_EL`, Leichte Sprache).
    pub target_language: String,

    /// Fragments to skip, for passes split across several runs.
    pub offset: usize,

    /// Maximum number of fragments to process, unlimited when `None`.
    pub limit: Option<usize>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self { source_language: "de_DE".to_string(), target_language: "de_EL".to_string(), offset: 0, limit: None }
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplificationReport {
    /// Adapter that handled the document.
    pub builder: String,
    /// Fragments found in the document.
    pub total: usize,
    /// Fragments handed to the provider in this pass.
    pub processed: usize,
    /// Fragments whose simplified text differs from the original.
    pub changed: usize,
    /// Fragments the provider failed on.
    pub failed: usize,
    /// Fragments left for later passes.
    pub remaining: usize,
}

/// Runs simplification passes over documents.
#[derive(Clone, Copy)]
pub struct Orchestrator<'a> {
    registry: &'a BuilderRegistry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a BuilderRegistry) -> Self {
        Self { registry }
    }

    /// Simplify the fragments of `doc` selected by `options`.
    ///
    /// Provider failures are logged and counted; the remaining fragments
    /// are still processed. Plain-text fragments never receive markup from
    /// the provider. The adapter is selected again before every fragment;
    /// if another adapter has taken over the document, the pass stops and
    /// the rest of the batch is reported as remaining.
    pub fn simplify_document(
        &self, doc: &mut dyn Document, env: &dyn Environment, simplifier: &dyn Simplifier, options: &SimplifyOptions,
    ) -> SimplificationReport {
        let builder = self.registry.select(doc, env);
        let fragments = builder.extract(doc);

        let mut report =
            SimplificationReport { builder: builder.id().to_string(), total: fragments.len(), ..Default::default() };

        let batch = fragments.iter().skip(options.offset).take(options.limit.unwrap_or(usize::MAX));
        for fragment in batch {
            let current = self.registry.select(doc, env);
            if current.id() != builder.id() {
                warn!(
                    document = doc.id(),
                    builder = builder.id(),
                    selected = current.id(),
                    "Page builder changed during pass, stopping"
                );
                break;
            }
            report.processed += 1;

            let simplified = match simplifier.simplify(
                &fragment.text,
                fragment.is_html,
                &options.source_language,
                &options.target_language,
            ) {
                Ok(text) if fragment.is_html => text,
                Ok(text) => strip_tags(&text),
                Err(e) => {
                    warn!(document = doc.id(), builder = builder.id(), error = %e, "Simplification failed");
                    report.failed += 1;
                    continue;
                }
            };

            if simplified == fragment.text {
                trace!(document = doc.id(), "Fragment unchanged");
                continue;
            }

            let content = current.reinsert(doc, &fragment.text, &simplified);
            if content != doc.raw_content() {
                doc.set_raw_content(content);
            }
            report.changed += 1;
        }

        report.remaining = report.total.saturating_sub(options.offset + report.processed);
        info!(
            document = doc.id(),
            builder = %report.builder,
            processed = report.processed,
            changed = report.changed,
            failed = report.failed,
            remaining = report.remaining,
            "Simplification pass finished"
        );
        report
    }
}
