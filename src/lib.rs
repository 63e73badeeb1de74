pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalStorage;

pub use core::archive::ArchiveBuilder;
pub use core::orchestrator::PackOrchestrator;
pub use core::resizer::StretchResizer;
pub use domain::model::{ImageSource, JobOutcome, JobRequest};
pub use utils::error::{PackError, Result};
