pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{report::ReportFormat, report::ReportWriter, storage::LocalStorage};
pub use app::backends::{EagerBackend, ParallelBackend, SequentialBackend};
pub use config::{RunSettings, TomlConfig};
pub use core::{harness::ComparisonHarness, scenario::Scenario};
pub use utils::error::{HarnessError, Result};
