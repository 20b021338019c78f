use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read CSV data: {message}")]
    Format { message: String },

    #[error("Input contains no data rows: {}", .path.display())]
    EmptyInput { path: PathBuf },

    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    Schema {
        column: String,
        available: Vec<String>,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Schema,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn format(message: impl Into<String>) -> Self {
        EtlError::Format {
            message: message.into(),
        }
    }

    pub fn schema(column: &str, available: &[String]) -> Self {
        EtlError::Schema {
            column: column.to_string(),
            available: available.to_vec(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::NotFound { .. } | EtlError::Format { .. } | EtlError::EmptyInput { .. } => {
                ErrorCategory::Input
            }
            EtlError::Schema { .. } => ErrorCategory::Schema,
            EtlError::Write { .. } => ErrorCategory::Output,
            EtlError::Config { .. } | EtlError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Schema => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::NotFound { .. } => {
                "Check the --input path or the [input] section of the config file".to_string()
            }
            EtlError::Format { .. } => {
                "Make sure the file is delimited text with a header row and a consistent delimiter"
                    .to_string()
            }
            EtlError::EmptyInput { .. } => "Provide a file with at least one data row".to_string(),
            EtlError::Schema { available, .. } => format!(
                "Pass the matching column names explicitly (columns in file: {})",
                available.join(", ")
            ),
            EtlError::Write { .. } => {
                "Check that the output directory is writable and the disk is not full".to_string()
            }
            EtlError::Config { .. } | EtlError::InvalidConfigValue { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            EtlError::Io(_) => "Check file permissions and available disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the input data: {}", self),
            ErrorCategory::Schema => format!("The input does not have the expected columns: {}", self),
            ErrorCategory::Output => format!("Could not save the cleaned data: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::System => format!("A system error occurred: {}", self),
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_available_columns() {
        let err = EtlError::schema("Junction", &["segment_id".to_string(), "volume".to_string()]);
        assert_eq!(
            err.to_string(),
            "Column 'Junction' not found (available: segment_id, volume)"
        );
        assert_eq!(err.category(), ErrorCategory::Schema);
        assert!(err.recovery_suggestion().contains("segment_id, volume"));
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let not_found = EtlError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(not_found.severity(), ErrorSeverity::High);
        assert_eq!(not_found.exit_code(), 1);

        let write = EtlError::Write {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write.severity(), ErrorSeverity::Critical);
        assert_eq!(write.exit_code(), 3);

        let config = EtlError::Config {
            field: "columns.id".to_string(),
            message: "empty".to_string(),
        };
        assert_eq!(config.exit_code(), 2);
    }
}
