use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "traffic-clean")]
#[command(about = "Clean raw traffic-sensor CSV exports into a sorted per-segment time series")]
pub struct CliConfig {
    /// Raw CSV export to clean
    #[arg(short, long)]
    pub input: Option<String>,

    /// Where to write the cleaned CSV
    #[arg(short, long)]
    pub output: Option<String>,

    /// TOML configuration file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Segment (location) column [default: Junction]")]
    pub segment_column: Option<String>,

    #[arg(long, help = "Timestamp column [default: DateTime]")]
    pub time_column: Option<String>,

    #[arg(long, help = "Target value column [default: Vehicles]")]
    pub target_column: Option<String>,

    #[arg(long, help = "Row id column [default: ID]")]
    pub id_column: Option<String>,

    /// Input field delimiter (use \t for tab)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Output field delimiter (use \t for tab)
    #[arg(long)]
    pub output_delimiter: Option<String>,

    /// Write a JSON summary of dropped rows to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Load and check the input without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file (if any), applies command-line overrides and validates the result.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(report) = &self.report {
            config.output.report_path = Some(report.clone());
        }
        if let Some(delimiter) = &self.delimiter {
            config.input.delimiter = Some(delimiter.clone());
        }
        if let Some(delimiter) = &self.output_delimiter {
            config.output.delimiter = Some(delimiter.clone());
        }

        let overrides = [
            (&self.segment_column, &mut config.columns.segment),
            (&self.time_column, &mut config.columns.time),
            (&self.target_column, &mut config.columns.target),
            (&self.id_column, &mut config.columns.id),
        ];
        for (flag, column) in overrides {
            if let Some(name) = flag {
                *column = name.clone();
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
    use crate::config::ColumnConfig;
    use crate::utils::error::EtlError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["traffic-clean"]);

        let config = cli.resolve().unwrap();

        assert_eq!(config.input_path(), PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.output_path(), PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.columns, ColumnConfig::default());
        assert!(config.report_path().is_none());
    }

    #[test]
    fn test_flags_override_columns() {
        let cli = CliConfig::parse_from([
            "traffic-clean",
            "--input",
            "raw/sensors.csv",
            "--segment-column",
            "segment_id",
            "--time-column",
            "timestamp",
            "--target-column",
            "volume",
            "--id-column",
            "row_id",
            "--delimiter",
            ";",
        ]);

        let config = cli.resolve().unwrap();

        assert_eq!(
            config.columns,
            ColumnConfig::new("segment_id", "timestamp", "volume", "row_id")
        );
        assert_eq!(config.input.path, "raw/sensors.csv");
        assert_eq!(config.to_options().unwrap().input_delimiter, b';');
    }

    #[test]
    fn test_flags_take_precedence_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[input]
path = "from_file.csv"

[output]
path = "out_from_file.csv"

[columns]
segment = "segment_id"
"#,
        )
        .unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "traffic-clean",
            "--config",
            config_path.as_str(),
            "--output",
            "override.csv",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.input.path, "from_file.csv");
        assert_eq!(config.output.path, "override.csv");
        assert_eq!(config.columns.segment, "segment_id");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = CliConfig::parse_from(["traffic-clean", "--id-column", "Junction"]);

        let err = cli.resolve().unwrap_err();

        assert!(matches!(err, EtlError::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliConfig::parse_from(["traffic-clean", "--config", "/nonexistent/clean.toml"]);
        assert!(matches!(cli.resolve().unwrap_err(), EtlError::Config { .. }));
    }
}
