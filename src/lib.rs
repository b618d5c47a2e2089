pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{LinePrompt, ProcessRunner};
pub use config::{toolchain::Toolchain, FabConfig};
pub use crate::core::engine::FabEngine;
pub use domain::model::{RunOutcome, RunSummary};
pub use utils::error::{FabError, Result};
