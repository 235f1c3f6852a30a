pub mod cli;
pub mod sources_config;

pub use crate::config::cli::{Cli, Command, OutputFormat};
pub use crate::config::sources_config::SourcesConfig;
