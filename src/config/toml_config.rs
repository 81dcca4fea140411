use crate::adapters::report::ReportFormat;
use crate::app::backends::BACKEND_NAMES;
use crate::core::fixtures::Fixtures;
use crate::core::scenario::Scenario;
use crate::core::Person;
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_one_of, validate_path, validate_positive_number,
    validate_single_characters, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub harness: HarnessSection,
    pub fixtures: Option<FixturesSection>,
    pub timing: Option<TimingSection>,
    pub report: Option<ReportSection>,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSection {
    pub name: String,
    pub description: Option<String>,
    pub scenarios: Option<Vec<String>>,
    pub backends: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturesSection {
    pub prices: Option<Vec<i32>>,
    pub price_threshold: Option<i32>,
    pub price_factor: Option<f64>,
    pub expected_price_sum: Option<f64>,
    pub people: Option<Vec<Person>>,
    pub symbols: Option<Vec<String>>,
    pub names: Option<Vec<String>>,
    pub reverse_names: Option<Vec<String>>,
    pub name_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSection {
    pub enabled: Option<bool>,
    pub upper_bound: Option<i32>,
    pub backends: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub format: Option<String>,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| HarnessError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TIMING_UPPER})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn scenarios(&self) -> Result<Option<Vec<Scenario>>> {
        self.harness
            .scenarios
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|name| name.parse::<Scenario>())
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()
    }

    pub fn backends(&self) -> Option<Vec<String>> {
        self.harness.backends.clone()
    }

    pub fn timing_enabled(&self) -> bool {
        self.timing
            .as_ref()
            .and_then(|t| t.enabled)
            .unwrap_or(true)
    }

    pub fn timing_upper(&self) -> Option<i32> {
        self.timing.as_ref().and_then(|t| t.upper_bound)
    }

    pub fn timed_backends(&self) -> Option<Vec<String>> {
        self.timing.as_ref().and_then(|t| t.backends.clone())
    }

    pub fn report_format(&self) -> Result<Option<ReportFormat>> {
        self.report
            .as_ref()
            .and_then(|r| r.format.as_deref())
            .map(str::parse::<ReportFormat>)
            .transpose()
    }

    pub fn output_path(&self) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.output_path.as_deref())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Default fixtures with the `[fixtures]` overrides applied.
    pub fn fixtures(&self) -> Fixtures {
        let mut fixtures = Fixtures::default();
        let Some(section) = &self.fixtures else {
            return fixtures;
        };

        // 改了輸入卻沒給期望值時，只做 backend 之間的比對
        let price_inputs_changed = section.prices.is_some()
            || section.price_threshold.is_some()
            || section.price_factor.is_some();
        if price_inputs_changed {
            fixtures.expected_price_sum = None;
        }
        if let Some(expected) = section.expected_price_sum {
            fixtures.expected_price_sum = Some(expected);
        }

        if let Some(prices) = &section.prices {
            fixtures.prices = prices.clone();
        }
        if let Some(threshold) = section.price_threshold {
            fixtures.price_threshold = threshold;
        }
        if let Some(factor) = section.price_factor {
            fixtures.price_factor = factor;
        }
        if let Some(people) = &section.people {
            fixtures.people = people.clone();
        }
        if let Some(symbols) = &section.symbols {
            fixtures.symbols = symbols.clone();
        }
        if let Some(names) = &section.names {
            fixtures.names = names.clone();
        }
        if let Some(names) = &section.reverse_names {
            fixtures.reverse_names = names.clone();
        }
        if let Some(length) = section.name_length {
            fixtures.name_length = length;
        }
        fixtures
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.harness.name.trim().is_empty() {
            return Err(HarnessError::MissingConfigError {
                field: "harness.name".to_string(),
            });
        }

        self.scenarios()?;

        if let Some(backends) = &self.harness.backends {
            validate_non_empty_list("harness.backends", backends)?;
            for backend in backends {
                validate_one_of("harness.backends", backend, &BACKEND_NAMES)?;
            }
        }

        if let Some(timing) = &self.timing {
            if let Some(upper) = timing.upper_bound {
                validate_positive_number("timing.upper_bound", i64::from(upper), 1)?;
            }
            if let Some(backends) = &timing.backends {
                for backend in backends {
                    validate_one_of("timing.backends", backend, &BACKEND_NAMES)?;
                }
            }
        }

        self.report_format()?;
        if let Some(path) = self.output_path() {
            validate_path("report.output_path", path)?;
        }

        if let Some(fixtures) = &self.fixtures {
            if let Some(symbols) = &fixtures.symbols {
                validate_single_characters("fixtures.symbols", symbols)?;
            }
            if let Some(length) = fixtures.name_length {
                validate_positive_number("fixtures.name_length", length as i64, 1)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[harness]
name = "basic"
scenarios = ["sum-filtered-scaled", "sort-ascending"]
backends = ["sequential", "parallel"]

[timing]
upper_bound = 1000
backends = ["sequential"]

[report]
format = "json"
output_path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.harness.name, "basic");
        assert_eq!(
            config.scenarios().unwrap().unwrap(),
            vec![Scenario::SumFilteredScaled, Scenario::SortAscending]
        );
        assert_eq!(config.timing_upper(), Some(1000));
        assert_eq!(config.report_format().unwrap(), Some(ReportFormat::Json));
        assert!(config.timing_enabled());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STREAM_COMPARE_TEST_UPPER", "4242");

        let toml_content = r#"
[harness]
name = "env"

[timing]
upper_bound = ${STREAM_COMPARE_TEST_UPPER}
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.timing_upper(), Some(4242));

        std::env::remove_var("STREAM_COMPARE_TEST_UPPER");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[harness]
name = "${STREAM_COMPARE_SURELY_UNSET_VAR}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.harness.name, "${STREAM_COMPARE_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let bad_backend = r#"
[harness]
name = "bad"
backends = ["gpu"]
"#;
        let config = TomlConfig::from_toml_str(bad_backend).unwrap();
        assert!(config.validate().is_err());

        let bad_scenario = r#"
[harness]
name = "bad"
scenarios = ["quicksort"]
"#;
        let config = TomlConfig::from_toml_str(bad_scenario).unwrap();
        assert!(matches!(
            config.validate(),
            Err(HarnessError::UnknownScenario { .. })
        ));

        let bad_upper = r#"
[harness]
name = "bad"

[timing]
upper_bound = 0
"#;
        let config = TomlConfig::from_toml_str(bad_upper).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fixture_overrides() {
        let toml_content = r#"
[harness]
name = "fixtures"

[fixtures]
prices = [100, 5]
symbols = ["x", "y", "x"]
people = [{ name = "Ann", age = 40 }, { name = "Bob", age = 30 }]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let fixtures = config.fixtures();

        assert_eq!(fixtures.prices, vec![100, 5]);
        assert_eq!(fixtures.expected_price_sum, None);
        assert_eq!(fixtures.symbols.len(), 3);
        assert_eq!(fixtures.people[1], Person::new("Bob", 30));
        assert_eq!(fixtures.names, crate::core::fixtures::names());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[harness]\nname = \"file-test\"\n\n[monitoring]\nenabled = true\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.harness.name, "file-test");
        assert!(config.monitoring_enabled());
    }
}
