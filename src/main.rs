use anyhow::Context;
use clap::Parser;
use traffic_clean::core::io::{load_from, save_report};
use traffic_clean::utils::logger;
use traffic_clean::{
    run_pipeline_with, CleaningReport, CliConfig, EtlError, LocalStorage, TomlConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting traffic-clean");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    display_config_summary(&config, cli.dry_run);

    if cli.dry_run {
        perform_dry_run(&config);
        return Ok(());
    }

    let options = match config.to_options() {
        Ok(options) => options,
        Err(e) => fail(&e),
    };

    let report = match run_pipeline_with(config.input_path(), config.output_path(), &options) {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    if let Some(report_path) = config.report_path() {
        save_report(&LocalStorage::new(), &report, &report_path)
            .with_context(|| format!("writing run report to {}", report_path.display()))?;
        tracing::info!("📝 Report saved to: {}", report_path.display());
    }

    print_summary(&report);
    Ok(())
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Cleaning failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code().max(1));
}

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.name());
    println!("  Input: {}", config.input.path);
    println!("  Output: {}", config.output.path);
    println!(
        "  Columns: segment={}, time={}, target={}, id={}",
        config.columns.segment, config.columns.time, config.columns.target, config.columns.id
    );
    if let Some(report) = &config.output.report_path {
        println!("  Report: {}", report);
    }
    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");

    let delimiter = match config.to_options() {
        Ok(options) => options.input_delimiter,
        Err(e) => fail(&e),
    };
    let table = match load_from(&LocalStorage::new(), &config.input_path(), delimiter) {
        Ok(table) => table,
        Err(e) => fail(&e),
    };

    println!("  Rows: {}", table.len());
    println!("  Columns: {}", table.columns.join(", "));

    let required = [
        &config.columns.segment,
        &config.columns.time,
        &config.columns.target,
        &config.columns.id,
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| table.column_index(name).is_err())
        .map(|name| name.as_str())
        .collect();

    if missing.is_empty() {
        println!("  ✅ All required columns present");
    } else {
        println!("  ❌ Missing columns: {}", missing.join(", "));
    }
    println!();
    println!("✅ Dry run complete. Nothing was written.");
}

fn print_summary(report: &CleaningReport) {
    println!("✅ Cleaning completed successfully!");
    println!("  Rows read: {}", report.rows_read);
    println!("  Invalid timestamps: {}", report.unparseable_timestamps);
    println!("  Invalid segment ids: {}", report.validation.invalid_segment);
    println!("  Invalid target values: {}", report.validation.invalid_target);
    println!("  Invalid row ids: {}", report.validation.invalid_id);
    println!("  Duplicate row ids: {}", report.validation.duplicate_id);
    println!("  Rows written: {}", report.rows_written);
    if let Some(output) = &report.output_path {
        println!("📁 Output saved to: {}", output);
    }
}
