pub mod config;
pub mod core;
pub mod domain;
pub mod sources;
pub mod utils;

pub use crate::config::SourcesConfig;
pub use crate::core::{Firehose, Query};
pub use crate::domain::model::{Item, Label, Record};
pub use crate::utils::error::{FirehoseError, Result};
