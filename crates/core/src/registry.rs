//! Adapter registry and dispatcher.
//!
//! The registry owns one adapter per supported builder in a fixed priority
//! order, plus the generic fallback. Selection walks the list and returns
//! the first adapter whose builder is installed and which claims the
//! document; nothing is cached, so every call sees the current plugin and
//! theme state.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::{BuilderRegistry, Post, StaticEnvironment};
//!
//! let registry = BuilderRegistry::new();
//! let env = StaticEnvironment::default().with_plugin("js_composer/js_composer.php");
//! let post = Post::new(1, "[vc_column_text]Hello[/vc_column_text]").with_meta("_wpb_vc_js_status", "true");
//!
//! assert_eq!(registry.select(&post, &env).id(), "wpbakery");
//! assert_eq!(registry.extract(&post, &env)[0].text, "Hello");
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::builderconfig::BuilderConfig;
#[cfg(feature = "config-files")]
use crate::builderconfig::ConfigLoader;
use crate::builders::{
    Avada, BeaverBuilder, BlockEditor, Breakdance, Bricks, Brizy, Divi, Elementor, Enfold, PageBuilder, Salient,
    SiteOrigin, Themify, Undetected, VisualComposer, WpBakery,
};
use crate::document::Document;
use crate::environment::{ContentRenderer, DefaultRenderer, Environment};
use crate::fragment::Fragment;
use crate::{EasyLanguageError, Result};

/// Default selection order. Builders that also leave shortcodes or block
/// markup in the content come before the formats they could be mistaken for.
pub const DEFAULT_PRIORITY: [&str; 14] = [
    Elementor::ID,
    Divi::ID,
    Avada::ID,
    Enfold::ID,
    WpBakery::ID,
    Salient::ID,
    BeaverBuilder::ID,
    Bricks::ID,
    Breakdance::ID,
    Brizy::ID,
    VisualComposer::ID,
    SiteOrigin::ID,
    Themify::ID,
    BlockEditor::ID,
];

/// Configuration for [`BuilderRegistry`].
///
/// # Example
///
/// ```rust
/// use easy_language_core::{BuilderRegistry, RegistryConfig};
///
/// let config = RegistryConfig::builder().priority(&["elementor", "block-editor"]).build();
/// let registry = BuilderRegistry::with_config(config).unwrap();
/// assert_eq!(registry.builders().count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Builder ids in selection order; unlisted builders are disabled.
    pub priority: Vec<String>,

    /// Whether builder-config files are consulted (default: false).
    pub load_config_files: bool,

    /// Directory searched for `<builder-id>.txt` after the standard one.
    pub config_dir: Option<PathBuf>,

    /// Flow-text tables replacing a builder's table entirely.
    pub overrides: Vec<(String, BuilderConfig)>,

    /// Rendering pipeline of the fallback adapter.
    pub renderer: Arc<dyn ContentRenderer>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY.iter().map(|id| id.to_string()).collect(),
            load_config_files: false,
            config_dir: None,
            overrides: Vec::new(),
            renderer: Arc::new(DefaultRenderer::default()),
        }
    }
}

impl RegistryConfig {
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::new()
    }
}

/// Builder for RegistryConfig.
#[derive(Debug)]
pub struct RegistryConfigBuilder {
    config: RegistryConfig,
}

impl RegistryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RegistryConfig::default() }
    }

    /// Sets the enabled builders and their order.
    pub fn priority(mut self, ids: &[&str]) -> Self {
        self.config.priority = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Sets whether builder-config files are loaded.
    pub fn load_config_files(mut self, value: bool) -> Self {
        self.config.load_config_files = value;
        self
    }

    /// Sets a custom builder-config directory and enables config files.
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.config_dir = Some(dir.into());
        self.config.load_config_files = true;
        self
    }

    /// Replaces the flow-text table of one builder.
    pub fn override_tables(mut self, id: &str, tables: BuilderConfig) -> Self {
        self.config.overrides.retain(|(existing, _)| existing != id);
        self.config.overrides.push((id.to_string(), tables));
        self
    }

    /// Sets the fallback adapter's renderer.
    pub fn renderer(mut self, renderer: Arc<dyn ContentRenderer>) -> Self {
        self.config.renderer = renderer;
        self
    }

    pub fn build(self) -> RegistryConfig {
        self.config
    }
}

impl Default for RegistryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered set of adapters with the fallback last.
pub struct BuilderRegistry {
    builders: Vec<Box<dyn PageBuilder>>,
    fallback: Undetected,
}

impl BuilderRegistry {
    /// All builders in default order with their built-in tables.
    pub fn new() -> Self {
        let builders = DEFAULT_PRIORITY.iter().filter_map(|id| create(id, default_tables(id)?)).collect();
        Self { builders, fallback: Undetected::default() }
    }

    /// Build a registry from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EasyLanguageError::ConfigError`] for unknown builder ids and
    /// [`EasyLanguageError::BuilderConfigError`] for unparsable config files.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        #[cfg(feature = "config-files")]
        let mut loader = config.load_config_files.then(|| ConfigLoader::for_custom_dir(config.config_dir.as_deref()));

        let mut builders = Vec::with_capacity(config.priority.len());
        for id in &config.priority {
            let mut tables = default_tables(id)
                .ok_or_else(|| EasyLanguageError::ConfigError(format!("Unknown page builder: {}", id)))?;

            #[cfg(feature = "config-files")]
            if let Some(loader) = loader.as_mut()
                && let Some(file_tables) = loader.load_for_builder(id)?
            {
                tables.merge(&file_tables);
            }

            if let Some((_, replacement)) = config.overrides.iter().find(|(target, _)| target == id) {
                tables = replacement.clone();
            }

            builders.extend(create(id, tables));
        }

        debug!(builders = builders.len(), "Builder registry ready");
        Ok(Self { builders, fallback: Undetected::new(config.renderer) })
    }

    /// The single adapter responsible for `doc` right now.
    pub fn select(&self, doc: &dyn Document, env: &dyn Environment) -> &dyn PageBuilder {
        let selected = self
            .builders
            .iter()
            .map(|builder| builder.as_ref())
            .find(|builder| builder.is_active(env) && builder.is_object_using_pagebuilder(doc))
            .unwrap_or(&self.fallback);

        debug!(document = doc.id(), builder = selected.id(), "Selected page builder");
        selected
    }

    /// Extract with the currently selected adapter.
    pub fn extract(&self, doc: &dyn Document, env: &dyn Environment) -> Vec<Fragment> {
        self.select(doc, env).extract(doc)
    }

    /// Reinsert with the currently selected adapter and store the new content.
    pub fn reinsert(&self, doc: &mut dyn Document, env: &dyn Environment, original: &str, simplified: &str) -> String {
        let content = self.select(doc, env).reinsert(doc, original, simplified);
        if content != doc.raw_content() {
            doc.set_raw_content(content.clone());
        }
        content
    }

    /// All adapters in selection order, fallback last.
    pub fn builders(&self) -> impl Iterator<Item = &dyn PageBuilder> {
        self.builders.iter().map(|builder| builder.as_ref()).chain(std::iter::once(&self.fallback as &dyn PageBuilder))
    }

    pub fn by_id(&self, id: &str) -> Option<&dyn PageBuilder> {
        self.builders().find(|builder| builder.id() == id)
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in tables of a builder, `None` for unknown ids.
pub fn default_tables(id: &str) -> Option<BuilderConfig> {
    let tables = match id {
        WpBakery::ID => WpBakery::default_config(),
        Salient::ID => Salient::default_config(),
        Divi::ID => Divi::default_config(),
        Avada::ID => Avada::default_config(),
        Enfold::ID => Enfold::default_config(),
        Elementor::ID => Elementor::default_config(),
        BeaverBuilder::ID => BeaverBuilder::default_config(),
        Bricks::ID => Bricks::default_config(),
        Breakdance::ID => Breakdance::default_config(),
        Brizy::ID => Brizy::default_config(),
        VisualComposer::ID => VisualComposer::default_config(),
        SiteOrigin::ID => SiteOrigin::default_config(),
        Themify::ID => Themify::default_config(),
        BlockEditor::ID => BlockEditor::default_config(),
        _ => return None,
    };
    Some(tables)
}

fn create(id: &str, tables: BuilderConfig) -> Option<Box<dyn PageBuilder>> {
    let builder: Box<dyn PageBuilder> = match id {
        WpBakery::ID => Box::new(WpBakery::new(tables)),
        Salient::ID => Box::new(Salient::new(tables)),
        Divi::ID => Box::new(Divi::new(tables)),
        Avada::ID => Box::new(Avada::new(tables)),
        Enfold::ID => Box::new(Enfold::new(tables)),
        Elementor::ID => Box::new(Elementor::new(tables)),
        BeaverBuilder::ID => Box::new(BeaverBuilder::new(tables)),
        Bricks::ID => Box::new(Bricks::new(tables)),
        Breakdance::ID => Box::new(Breakdance::new(tables)),
        Brizy::ID => Box::new(Brizy::new(tables)),
        VisualComposer::ID => Box::new(VisualComposer::new(tables)),
        SiteOrigin::ID => Box::new(SiteOrigin::new(tables)),
        Themify::ID => Box::new(Themify::new(tables)),
        BlockEditor::ID => Box::new(BlockEditor::new(tables)),
        _ => return None,
    };
    Some(builder)
}
