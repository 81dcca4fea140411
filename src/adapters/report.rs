use crate::core::{Outcome, ScenarioReport, Storage};
use crate::utils::error::{HarnessError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub const NAMES: [&'static str; 3] = ["text", "json", "csv"];

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(HarnessError::InvalidConfigValueError {
                field: "report.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    harness: &'a str,
    generated_at: DateTime<Utc>,
    passed: usize,
    failed: usize,
    scenarios: &'a [ScenarioReport],
}

pub fn render(format: ReportFormat, harness: &str, reports: &[ScenarioReport]) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(reports)),
        ReportFormat::Json => render_json(harness, reports),
        ReportFormat::Csv => render_csv(reports),
    }
}

pub fn render_text(reports: &[ScenarioReport]) -> String {
    let mut lines = Vec::new();
    for report in reports {
        let marker = match report.outcome {
            Outcome::Agreed => "✅",
            Outcome::Timed => "⏱️",
            Outcome::Mismatch => "❌",
        };
        lines.push(format!("{} {}", marker, report.scenario));

        for result in &report.results {
            lines.push(format!("    {}: {}", result.backend, result.result));
        }
        for sample in &report.timings {
            lines.push(format!(
                "    {}: {} ms",
                sample.backend,
                sample.elapsed.as_millis()
            ));
        }
        for line in &report.trace {
            lines.push(format!("    {}", line));
        }
        if report.outcome == Outcome::Mismatch {
            if let Some(detail) = &report.detail {
                lines.push(format!("    mismatch: {}", detail));
            }
        }
    }
    lines.join("\n")
}

pub fn render_json(harness: &str, reports: &[ScenarioReport]) -> Result<String> {
    let failed = reports.iter().filter(|r| !r.is_success()).count();
    let document = ReportDocument {
        harness,
        generated_at: Utc::now(),
        passed: reports.len() - failed,
        failed,
        scenarios: reports,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// One row per (scenario, backend).
pub fn render_csv(reports: &[ScenarioReport]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["scenario", "outcome", "backend", "result", "elapsed_ms"])?;

    for report in reports {
        let outcome = outcome_name(report.outcome);
        for result in &report.results {
            writer.write_record([
                report.scenario.as_str(),
                outcome,
                result.backend.as_str(),
                result.result.as_str(),
                "",
            ])?;
        }
        for sample in &report.timings {
            let elapsed = sample.elapsed.as_millis().to_string();
            let value = sample.value.to_string();
            writer.write_record([
                report.scenario.as_str(),
                outcome,
                sample.backend.as_str(),
                value.as_str(),
                elapsed.as_str(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HarnessError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| HarnessError::ConfigValidationError {
        field: "report".to_string(),
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Agreed => "agreed",
        Outcome::Timed => "timed",
        Outcome::Mismatch => "mismatch",
    }
}

pub struct ReportWriter<S: Storage> {
    storage: S,
    format: ReportFormat,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, format: ReportFormat) -> Self {
        Self { storage, format }
    }

    /// 寫入 `report.<ext>`，回傳檔名
    pub fn write(&self, harness: &str, reports: &[ScenarioReport]) -> Result<String> {
        let file_name = format!("report.{}", self.format.extension());
        let content = render(self.format, harness, reports)?;

        tracing::debug!("Writing {} report ({} bytes)", self.format, content.len());
        self.storage.write_file(&file_name, content.as_bytes())?;
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BackendResult, TimingSample};
    use std::time::Duration;

    fn sample_reports() -> Vec<ScenarioReport> {
        vec![
            ScenarioReport {
                scenario: "sum-filtered-scaled".to_string(),
                outcome: Outcome::Agreed,
                results: vec![
                    BackendResult {
                        backend: "sequential".to_string(),
                        result: "67.5".to_string(),
                    },
                    BackendResult {
                        backend: "eager".to_string(),
                        result: "67.5".to_string(),
                    },
                ],
                detail: None,
                trace: Vec::new(),
                timings: Vec::new(),
            },
            ScenarioReport {
                scenario: "timed-range".to_string(),
                outcome: Outcome::Timed,
                results: Vec::new(),
                detail: Some("sequential: 12 ms".to_string()),
                trace: Vec::new(),
                timings: vec![TimingSample {
                    backend: "sequential".to_string(),
                    elapsed: Duration::from_millis(12),
                    value: 25,
                }],
            },
        ]
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::Csv.extension(), "csv");
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_reports());
        assert!(text.contains("✅ sum-filtered-scaled"));
        assert!(text.contains("    eager: 67.5"));
        assert!(text.contains("    sequential: 12 ms"));
    }

    #[test]
    fn test_render_csv_one_row_per_backend() {
        let csv_output = render_csv(&sample_reports()).unwrap();
        let lines: Vec<&str> = csv_output.lines().collect();
        assert_eq!(lines[0], "scenario,outcome,backend,result,elapsed_ms");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "timed-range,timed,sequential,25,12");
    }

    #[test]
    fn test_render_json_counts() {
        let json = render_json("unit", &sample_reports()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["harness"], "unit");
        assert_eq!(value["passed"], 2);
        assert_eq!(value["failed"], 0);
        assert_eq!(value["scenarios"][1]["timings"][0]["elapsed"], 12);
    }
}
