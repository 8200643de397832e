//! Flow-text extraction and reinsertion for page-builder content.
//!
//! Pages authored with visual page builders store their text inside
//! builder-specific formats: shortcodes in the content, JSON widget trees
//! in metadata, base64 or URL-encoded blobs, block-editor delimiters. This
//! crate finds the text that can be simplified into plain or easy
//! language, and writes the simplified version back to exactly the place
//! it came from.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::{BuilderRegistry, Post, StaticEnvironment};
//!
//! let registry = BuilderRegistry::new();
//! let env = StaticEnvironment::default().with_plugin("js_composer/js_composer.php");
//! let mut post = Post::new(1, "[vc_column_text]Hello world[/vc_column_text]")
//!     .with_meta("_wpb_vc_js_status", "true");
//!
//! let fragments = registry.extract(&post, &env);
//! assert_eq!(fragments[0].text, "Hello world");
//!
//! registry.reinsert(&mut post, &env, "Hello world", "Hallo Welt");
//! assert_eq!(post.content, "[vc_column_text]Hallo Welt[/vc_column_text]");
//! ```

pub mod blocks;
pub mod builderconfig;
pub mod builders;
pub mod codec;
pub mod document;
pub mod environment;
pub mod error;
pub mod fragment;
pub mod jsontext;
pub mod registry;
pub mod shortcode;
pub mod simplify;
pub mod tree;

#[cfg(feature = "config-files")]
pub use builderconfig::{ConfigLoader, ConfigLoaderBuilder};
pub use builderconfig::{BuilderConfig, ConfigParser, Directive};
pub use builders::{PageBuilder, replace_in_content};
pub use codec::{Base64Codec, Codec, Pipeline, UrlCodec};
pub use document::{Document, Post};
pub use environment::{CORE_SHORTCODES, ContentRenderer, DefaultRenderer, Environment, StaticEnvironment};
pub use error::{EasyLanguageError, Result};
pub use fragment::Fragment;
pub use registry::{BuilderRegistry, DEFAULT_PRIORITY, RegistryConfig, RegistryConfigBuilder};
pub use simplify::{NoopSimplifier, Orchestrator, ReplacementMap, SimplificationReport, Simplifier, SimplifyOptions};
