pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpFetcher, LocalStorage};
pub use config::EtlConfig;
pub use core::{etl::EtlEngine, pipeline::UniversityPipeline};
pub use utils::error::{EtlError, Result};
