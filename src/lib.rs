#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::job_config::JobConfig;
pub use config::storage::LocalStorage;
pub use core::{engine::WordlistEngine, job_pipeline::JobPipeline};
pub use utils::error::{Result, WordlistError};
