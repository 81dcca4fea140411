use anyhow::Result;
use stream_compare::core::Outcome;
use stream_compare::{LocalStorage, ReportFormat, ReportWriter, RunSettings, TomlConfig};
use tempfile::TempDir;

fn settings_for(dir: &str, format: &str) -> Result<RunSettings> {
    let normalized = dir.replace('\\', "/");
    let config_content = format!(
        r#"
[harness]
name = "report-test"
backends = ["sequential", "eager", "parallel"]

[timing]
upper_bound = 10000
backends = ["sequential", "parallel"]

[report]
format = "{}"
output_path = "{}"
"#,
        format, normalized
    );

    let config_path = format!("{}/harness.toml", normalized);
    std::fs::write(&config_path, config_content)?;
    let config = TomlConfig::from_file(&config_path)?;
    Ok(RunSettings::from_toml(&config)?)
}

#[test]
fn test_end_to_end_json_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = settings_for(temp_dir.path().to_str().unwrap(), "json")?;

    let mut harness = settings.build_harness()?;
    let reports = harness.run_all(&settings.scenarios)?;
    assert!(reports.iter().all(|r| r.is_success()));

    let output_path = settings.output_path.clone().unwrap();
    let writer = ReportWriter::new(LocalStorage::new(output_path.clone()), settings.format);
    let file_name = writer.write(&settings.name, &reports)?;
    assert_eq!(file_name, "report.json");

    let content = std::fs::read_to_string(std::path::Path::new(&output_path).join(&file_name))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(json["harness"], "report-test");
    assert_eq!(json["failed"], 0);
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 10);

    let timed = json["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["scenario"] == "timed-range")
        .unwrap();
    assert_eq!(timed["outcome"], "timed");
    assert_eq!(timed["timings"].as_array().unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_end_to_end_csv_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut settings = settings_for(temp_dir.path().to_str().unwrap(), "csv")?;
    settings.skip_timing();
    assert_eq!(settings.format, ReportFormat::Csv);

    let mut harness = settings.build_harness()?;
    let reports = harness.run_all(&settings.scenarios)?;
    assert!(reports.iter().all(|r| r.outcome == Outcome::Agreed));

    let storage = LocalStorage::new(settings.output_path.clone().unwrap());
    let writer = ReportWriter::new(storage.clone(), settings.format);
    let file_name = writer.write(&settings.name, &reports)?;

    let content = std::fs::read_to_string(storage.full_path(&file_name))?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;

    // 8 個非 timing 場景 × 3 個 backend
    assert_eq!(rows.len(), 8 * 3);
    assert!(rows
        .iter()
        .any(|row| &row[0] == "sum-filtered-scaled" && &row[3] == "67.5"));
    assert!(rows
        .iter()
        .any(|row| &row[0] == "min-of-empty" && &row[3] == "<absent>"));
    Ok(())
}
