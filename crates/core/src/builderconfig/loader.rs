use crate::builderconfig::directives::BuilderConfig;
use crate::builderconfig::parser::ConfigParser;
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration loader for builder flow-text tables
///
/// Looks for `<builder-id>.txt` in the standard directory and then in the
/// custom directory; entries from the custom file win.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Custom config directory path
    custom_dir: Option<PathBuf>,
    /// Standard config directory path
    standard_dir: Option<PathBuf>,
    /// Parsed files by builder id, `None` when no file exists
    cache: HashMap<String, Option<BuilderConfig>>,
}

impl ConfigLoader {
    /// Create a new config loader without any directories
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None, cache: HashMap::new() }
    }

    /// Load the config file(s) for a builder, if any exist
    pub fn load_for_builder(&mut self, builder_id: &str) -> Result<Option<BuilderConfig>> {
        if let Some(cached) = self.cache.get(builder_id) {
            return Ok(cached.clone());
        }

        let mut merged: Option<BuilderConfig> = None;

        for file_path in self.find_config_files(builder_id) {
            let config = ConfigParser::parse_file(&file_path)?;
            tracing::debug!(builder = builder_id, path = %file_path.display(), "Loaded builder config");
            merged.get_or_insert_with(BuilderConfig::new).merge(&config);
        }

        self.cache.insert(builder_id.to_string(), merged.clone());
        Ok(merged)
    }

    /// Config files for a builder in merge order (standard first, custom last)
    fn find_config_files(&self, builder_id: &str) -> Vec<PathBuf> {
        let file_name = format!("{}.txt", builder_id);

        [&self.standard_dir, &self.custom_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(&file_name))
            .filter(|path| path.exists())
            .collect()
    }

    /// Clear the config cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Builder for ConfigLoader
#[derive(Debug)]
pub struct ConfigLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl ConfigLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Set custom config directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set standard config directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the ConfigLoader
    pub fn build(self) -> ConfigLoader {
        ConfigLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir, cache: HashMap::new() }
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::for_custom_dir(None)
    }
}

impl ConfigLoader {
    /// Loader over the standard directory and `custom_dir`
    ///
    /// Falls back to the user's config directory when no custom directory is given.
    pub fn for_custom_dir(custom_dir: Option<&Path>) -> Self {
        let mut builder = ConfigLoaderBuilder::new();

        if let Some(custom_dir) = custom_dir.map(Path::to_path_buf).or_else(Self::default_custom_dir) {
            builder = builder.custom_dir(custom_dir);
        }

        if let Some(standard_dir) = Self::default_standard_dir() {
            builder = builder.standard_dir(standard_dir);
        }

        builder.build()
    }

    /// Default custom config directory (~/.config/easy-language/builders)
    fn default_custom_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("easy-language").join("builders"))
    }

    /// Default standard config directory, relative to the working directory
    fn default_standard_dir() -> Option<PathBuf> {
        let std_dir = PathBuf::from("builder_configs");
        if std_dir.exists() { Some(std_dir) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::ShortcodeRule;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_none() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();

        assert!(loader.load_for_builder("divi").unwrap().is_none());
    }

    #[test]
    fn test_load_custom_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("divi.txt"), "shortcode: et_pb_code\nhtml: et_pb_code | yes\n").unwrap();

        let mut loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        let config = loader.load_for_builder("divi").unwrap().unwrap();

        assert_eq!(config.shortcodes, vec![ShortcodeRule::body("et_pb_code")]);
        assert!(config.shortcode_is_html("et_pb_code"));
    }

    #[test]
    fn test_custom_overrides_standard() {
        let standard = TempDir::new().unwrap();
        let custom = TempDir::new().unwrap();
        fs::write(standard.path().join("avada.txt"), "shortcode: fusion_text\nhtml: fusion_text | yes\n").unwrap();
        fs::write(custom.path().join("avada.txt"), "html: fusion_text | no\n").unwrap();

        let mut loader = ConfigLoaderBuilder::new().standard_dir(standard.path()).custom_dir(custom.path()).build();
        let config = loader.load_for_builder("avada").unwrap().unwrap();

        assert_eq!(config.shortcodes.len(), 1);
        assert!(!config.shortcode_is_html("fusion_text"));
    }

    #[test]
    fn test_cache_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bricks.txt");
        fs::write(&path, "widget: heading | settings.text\n").unwrap();

        let mut loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        assert!(loader.load_for_builder("bricks").unwrap().is_some());

        fs::remove_file(&path).unwrap();
        assert!(loader.load_for_builder("bricks").unwrap().is_some());

        loader.clear_cache();
        assert!(loader.load_for_builder("bricks").unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("themify.txt"), "not a directive\n").unwrap();

        let mut loader = ConfigLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        assert!(loader.load_for_builder("themify").is_err());
    }
}
