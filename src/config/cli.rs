use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "stream-compare")]
#[command(about = "Runs equivalent collection pipelines on several iterator backends and compares the results")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scenarios to run (comma separated), default all
    #[arg(long = "scenario", value_delimiter = ',')]
    pub scenarios: Vec<String>,

    /// Backends to compare (comma separated), default all
    #[arg(long = "backend", value_delimiter = ',')]
    pub backends: Vec<String>,

    /// Backends measured by the timing scenarios, default all selected backends
    #[arg(long = "timed-backend", value_delimiter = ',')]
    pub timed_backends: Vec<String>,

    /// Exclusive upper bound of the timing range
    #[arg(long)]
    pub timing_upper: Option<i32>,

    #[arg(long, help = "Skip the timing scenarios")]
    pub skip_timing: bool,

    /// Report format: text, json or csv
    #[arg(long)]
    pub format: Option<String>,

    /// Directory to write report.<ext> into instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory around timing runs")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
