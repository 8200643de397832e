use crate::builderconfig::directives::{BuilderConfig, parse_directive};
use crate::error::{EasyLanguageError, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Builder-config file parser
#[derive(Debug)]
pub struct ConfigParser;

impl ConfigParser {
    /// Parse a single builder-config file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<BuilderConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EasyLanguageError::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Parse builder config from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<BuilderConfig> {
        let mut config = BuilderConfig::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line
                .map_err(|e| EasyLanguageError::BuilderConfigError(format!("Read error at line {}: {}", index + 1, e)))?;
            Self::apply_line(&mut config, &line, index + 1)?;
        }

        Ok(config)
    }

    /// Parse builder config from a string
    pub fn parse_string(content: &str) -> Result<BuilderConfig> {
        let mut config = BuilderConfig::new();

        for (index, line) in content.lines().enumerate() {
            Self::apply_line(&mut config, line, index + 1)?;
        }

        Ok(config)
    }

    fn apply_line(config: &mut BuilderConfig, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        match parse_directive(line) {
            Ok(directive) => {
                config.add_directive(directive);
                Ok(())
            }
            Err(e) => Err(EasyLanguageError::BuilderConfigError(format!(
                "Parse error at line {}: {}",
                line_number, e
            ))),
        }
    }
}
