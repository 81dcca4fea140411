#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::report::ReportFormat;
use crate::app::backends::{backend_by_name, BACKEND_NAMES};
use crate::core::fixtures::Fixtures;
use crate::core::harness::ComparisonHarness;
use crate::core::scenario::Scenario;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_list, validate_one_of, validate_path, validate_positive_number, Validate,
};

pub const DEFAULT_HARNESS_NAME: &str = "stream-compare";

/// Fully resolved run configuration: defaults, then TOML, then CLI flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub name: String,
    pub scenarios: Vec<Scenario>,
    pub backends: Vec<String>,
    pub timed_backends: Option<Vec<String>>,
    pub timing_upper: i32,
    pub fixtures: Fixtures,
    pub format: ReportFormat,
    pub output_path: Option<String>,
    pub monitor: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_HARNESS_NAME.to_string(),
            scenarios: Scenario::ALL.to_vec(),
            backends: BACKEND_NAMES.iter().map(|name| name.to_string()).collect(),
            timed_backends: None,
            timing_upper: i32::MAX,
            fixtures: Fixtures::default(),
            format: ReportFormat::Text,
            output_path: None,
            monitor: false,
        }
    }
}

impl RunSettings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;
        let mut settings = Self {
            name: config.harness.name.clone(),
            fixtures: config.fixtures(),
            monitor: config.monitoring_enabled(),
            ..Self::default()
        };

        if let Some(scenarios) = config.scenarios()? {
            settings.scenarios = scenarios;
        }
        if !config.timing_enabled() {
            settings.skip_timing();
        }
        if let Some(backends) = config.backends() {
            settings.backends = backends;
        }
        settings.timed_backends = config.timed_backends();
        if let Some(upper) = config.timing_upper() {
            settings.timing_upper = upper;
        }
        if let Some(format) = config.report_format()? {
            settings.format = format;
        }
        settings.output_path = config.output_path().map(str::to_string);

        Ok(settings)
    }

    /// 依序套用：預設值 → TOML → 命令列參數
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                Self::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => Self::default(),
        };

        if !cli.scenarios.is_empty() {
            settings.scenarios = cli
                .scenarios
                .iter()
                .map(|name| name.parse::<Scenario>())
                .collect::<Result<Vec<_>>>()?;
        }
        if cli.skip_timing {
            settings.skip_timing();
        }
        if !cli.backends.is_empty() {
            settings.backends = cli.backends.clone();
        }
        if !cli.timed_backends.is_empty() {
            settings.timed_backends = Some(cli.timed_backends.clone());
        }
        if let Some(upper) = cli.timing_upper {
            settings.timing_upper = upper;
        }
        if let Some(format) = &cli.format {
            settings.format = format.parse()?;
        }
        if let Some(output) = &cli.output {
            settings.output_path = Some(output.clone());
        }
        settings.monitor |= cli.monitor;

        settings.validate()?;
        Ok(settings)
    }

    pub fn skip_timing(&mut self) {
        self.scenarios.retain(|scenario| !scenario.is_timing());
    }

    pub fn build_harness(&self) -> Result<ComparisonHarness> {
        let backends = self
            .backends
            .iter()
            .map(|name| backend_by_name(name))
            .collect::<Result<Vec<_>>>()?;

        let mut harness = ComparisonHarness::new_with_monitoring(backends, self.monitor)
            .with_fixtures(self.fixtures.clone())
            .with_timing_upper(self.timing_upper);
        if let Some(timed) = &self.timed_backends {
            harness = harness.with_timed_backends(timed.clone());
        }
        Ok(harness)
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_list("backends", &self.backends)?;
        for backend in &self.backends {
            validate_one_of("backends", backend, &BACKEND_NAMES)?;
        }
        if let Some(timed) = &self.timed_backends {
            for backend in timed {
                validate_one_of("timed_backends", backend, &BACKEND_NAMES)?;
            }
        }
        validate_positive_number("timing_upper", i64::from(self.timing_upper), 1)?;
        if let Some(path) = &self.output_path {
            validate_path("output_path", path)?;
        }
        Ok(())
    }
}
