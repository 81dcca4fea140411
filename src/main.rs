use clap::Parser;
use stream_compare::adapters::report;
use stream_compare::utils::error::HarnessError;
use stream_compare::utils::logger;
use stream_compare::{CliConfig, LocalStorage, ReportWriter, RunSettings};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting stream-compare");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config) {
        Ok(0) => {
            tracing::info!("✅ All scenarios passed");
        }
        Ok(failed) => {
            tracing::error!("❌ {} scenario(s) had mismatching backends", failed);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

/// Returns the number of scenarios whose backends disagreed.
fn run(config: &CliConfig) -> Result<usize, HarnessError> {
    let settings = RunSettings::resolve(config)?;
    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut harness = settings.build_harness()?;
    let reports = harness.run_all(&settings.scenarios)?;
    let failed = reports.iter().filter(|r| !r.is_success()).count();

    match &settings.output_path {
        Some(dir) => {
            let writer = ReportWriter::new(LocalStorage::new(dir.clone()), settings.format);
            let file_name = writer.write(&settings.name, &reports)?;
            tracing::info!("📁 Report saved to: {}/{}", dir, file_name);
        }
        None => {
            println!("{}", report::render(settings.format, &settings.name, &reports)?);
        }
    }

    Ok(failed)
}
