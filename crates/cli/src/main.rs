use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use easy_language_core::{
    BuilderRegistry, CORE_SHORTCODES, DefaultRenderer, Orchestrator, Post, RegistryConfig, ReplacementMap,
    SimplifyOptions, StaticEnvironment,
};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Extract flow text from page-builder documents and write simplified text back
#[derive(Parser, Debug)]
#[command(name = "easy-language")]
#[command(author = "Easy Language contributors")]
#[command(version)]
#[command(about = "Extract and reinsert page-builder flow text", long_about = None)]
struct Args {
    /// Document JSON file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format for extracted fragments (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Active plugin, e.g. "elementor/elementor.php" (repeatable)
    #[arg(long = "plugin", value_name = "PLUGIN")]
    plugins: Vec<String>,

    /// Active theme name
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Parent of the active theme
    #[arg(long, value_name = "NAME")]
    parent_theme: Option<String>,

    /// Site URL used for edit links
    #[arg(long, value_name = "URL")]
    site_url: Option<Url>,

    /// Shortcode registered on the site besides the core ones (repeatable)
    #[arg(long = "shortcode", value_name = "TAG")]
    shortcodes: Vec<String>,

    /// Custom builder-config directory
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Replacement map (JSON object of original to simplified text) to apply
    #[arg(long, value_name = "FILE")]
    apply: Option<PathBuf>,

    /// Fragments to skip when applying
    #[arg(long, default_value = "0", value_name = "NUM")]
    offset: usize,

    /// Maximum number of fragments to apply
    #[arg(long, value_name = "NUM")]
    limit: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging: RUST_LOG wins, otherwise warn, or debug when verbose.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Split an input document into the post and its environment.
///
/// Accepts either a bare post or a bundle with `post` and `environment` keys.
fn parse_input(json: &str) -> anyhow::Result<(Post, StaticEnvironment)> {
    let mut value: Value = serde_json::from_str(json).context("Input is not valid JSON")?;

    let Some(post) = value.get_mut("post").map(Value::take) else {
        let post = serde_json::from_value(value).context("Input is not a valid post")?;
        return Ok((post, StaticEnvironment::default()));
    };

    let post = serde_json::from_value(post).context("Invalid post in input bundle")?;
    let env = match value.get_mut("environment").map(Value::take) {
        Some(env) => serde_json::from_value(env).context("Invalid environment in input bundle")?,
        None => StaticEnvironment::default(),
    };
    Ok((post, env))
}

fn apply_environment_flags(mut env: StaticEnvironment, args: &Args) -> StaticEnvironment {
    for plugin in &args.plugins {
        env = env.with_plugin(plugin);
    }
    if let Some(theme) = &args.theme {
        env = env.with_theme(theme);
    }
    if let Some(parent) = &args.parent_theme {
        env = env.with_parent_theme(parent);
    }
    if let Some(url) = &args.site_url {
        env.site_url = url.clone();
    }
    env
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let input = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
        buffer
    } else {
        if args.verbose {
            echo::print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if args.verbose {
        echo::print_field("Size", &echo::format_size(input.len()));
        eprintln!();
    }

    let (mut post, env) = parse_input(&input)?;
    let env = apply_environment_flags(env, &args);

    let mut config = RegistryConfig::builder();
    if let Some(dir) = &args.config_dir {
        if !dir.is_dir() {
            bail!("Config directory not found: {}", dir.display());
        }
        config = config.config_dir(dir);
    }
    if !args.shortcodes.is_empty() {
        let tags: Vec<&str> = CORE_SHORTCODES.iter().copied().chain(args.shortcodes.iter().map(String::as_str)).collect();
        let renderer = DefaultRenderer::with_shortcodes(&tags).context("Invalid shortcode tag")?;
        config = config.renderer(Arc::new(renderer));
    }
    let registry = BuilderRegistry::with_config(config.build()).context("Failed to load builder configuration")?;

    if args.verbose {
        echo::print_step(2, 3, "Selecting page builder");
    }
    let builder = registry.select(&post, &env);
    if args.verbose {
        echo::print_field("Builder", builder.name());
        echo::print_field("Edit link", &builder.edit_link(&post, &env));
        eprintln!();
    }

    let output = match &args.apply {
        Some(path) => {
            if args.verbose {
                echo::print_step(3, 3, &format!("Applying {}", path.display().bright_white()));
            }
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read replacement map: {}", path.display()))?;
            let simplifier = ReplacementMap::from_json(&json).context("Invalid replacement map")?;
            if simplifier.is_empty() {
                echo::print_warning("Replacement map is empty");
            }

            let options = SimplifyOptions { offset: args.offset, limit: args.limit, ..Default::default() };
            let report = Orchestrator::new(&registry).simplify_document(&mut post, &env, &simplifier, &options);
            if args.verbose {
                echo::print_report(&report);
            }

            let mut document = serde_json::to_string_pretty(&post).context("Failed to serialize document")?;
            document.push('\n');
            document
        }
        None => {
            if args.verbose {
                echo::print_step(3, 3, "Extracting flow text");
            }
            let fragments = builder.extract(&post);
            if fragments.is_empty() {
                echo::print_warning("No flow text found");
            }

            match args.format {
                OutputFormat::Text => echo::format_fragments(&fragments),
                OutputFormat::Json => {
                    let value = json!({
                        "document": post.id,
                        "builder": builder.id(),
                        "edit_link": builder.edit_link(&post, &env),
                        "fragments": fragments,
                    });
                    let mut json = serde_json::to_string_pretty(&value).context("Failed to serialize fragments")?;
                    json.push('\n');
                    json
                }
            }
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_bare_post() {
        let (post, env) = parse_input(r#"{"id": 7, "content": "<p>Hi</p>"}"#).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(env, StaticEnvironment::default());
    }

    #[test]
    fn test_parse_bundle() {
        let json = r#"{"environment": {"active_plugins": ["brizy/brizy.php"], "theme": "Astra", "site_url": "https://example.org/"}, "post": {"id": 9}}"#;
        let (post, env) = parse_input(json).unwrap();
        assert_eq!(post.id, 9);
        assert_eq!(env.active_plugins, vec!["brizy/brizy.php".to_string()]);
        assert_eq!(env.theme, "Astra");
    }

    #[test]
    fn test_parse_invalid_input() {
        assert!(parse_input("not json").is_err());
        assert!(parse_input(r#"{"post": {"content": "missing id"}}"#).is_err());
    }
}
