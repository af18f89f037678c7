pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{places::GooglePlacesClient, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::{etl::EnrichEngine, report::QualityReport};
pub use utils::error::{EnrichError, Result};
