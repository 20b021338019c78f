use crate::config::ColumnConfig;
use crate::core::io::DEFAULT_DELIMITER;
use crate::core::pipeline::PipelineOptions;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_file_extension, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DATA_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

pub const DEFAULT_INPUT_PATH: &str = "data/raw/traffic.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/segment_timeseries.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineInfo>,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub delimiter: Option<String>,
    pub report_path: Option<String>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            pipeline: None,
            input: InputConfig {
                path: DEFAULT_INPUT_PATH.to_string(),
                delimiter: None,
            },
            output: OutputConfig {
                path: DEFAULT_OUTPUT_PATH.to_string(),
                delimiter: None,
                report_path: None,
            },
            columns: ColumnConfig::default(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

/// Reads a delimiter setting; unset means comma.
fn parse_delimiter(field: &str, raw: Option<&str>) -> Result<u8> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_DELIMITER);
    };

    let mut chars = raw.chars();
    let delimiter = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ if raw == "\\t" => '\t',
        _ => {
            return Err(EtlError::InvalidConfigValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason: "Delimiter must be exactly one character".to_string(),
            })
        }
    };

    validate_delimiter(field, delimiter)?;
    Ok(delimiter as u8)
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::Config {
            field: "config_file".to_string(),
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::Config {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("traffic-clean")
    }

    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input.path)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.output.report_path.as_ref().map(PathBuf::from)
    }

    pub fn to_options(&self) -> Result<PipelineOptions> {
        Ok(PipelineOptions {
            columns: self.columns.clone(),
            input_delimiter: parse_delimiter("input.delimiter", self.input.delimiter.as_deref())?,
            output_delimiter: parse_delimiter(
                "output.delimiter",
                self.output.delimiter.as_deref(),
            )?,
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_file_extension("input.path", &self.input.path, DATA_EXTENSIONS)?;
        validate_path("output.path", &self.output.path)?;
        validate_file_extension("output.path", &self.output.path, DATA_EXTENSIONS)?;
        if let Some(report) = &self.output.report_path {
            validate_path("output.report_path", report)?;
        }
        if self.input.path == self.output.path {
            return Err(EtlError::InvalidConfigValue {
                field: "output.path".to_string(),
                value: self.output.path.clone(),
                reason: "Output would overwrite the input file".to_string(),
            });
        }
        self.columns.validate()?;
        self.to_options().map(|_| ())
    }
}
