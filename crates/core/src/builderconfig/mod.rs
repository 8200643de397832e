pub mod directives;
#[cfg(feature = "config-files")]
pub mod loader;
pub mod parser;

pub use directives::{BuilderConfig, Directive, parse_directive};
#[cfg(feature = "config-files")]
pub use loader::{ConfigLoader, ConfigLoaderBuilder};
pub use parser::ConfigParser;
