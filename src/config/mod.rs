#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_distinct, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEGMENT_COLUMN: &str = "Junction";
pub const DEFAULT_TIME_COLUMN: &str = "DateTime";
pub const DEFAULT_TARGET_COLUMN: &str = "Vehicles";
pub const DEFAULT_ID_COLUMN: &str = "ID";

fn default_segment() -> String {
    DEFAULT_SEGMENT_COLUMN.to_string()
}

fn default_time() -> String {
    DEFAULT_TIME_COLUMN.to_string()
}

fn default_target() -> String {
    DEFAULT_TARGET_COLUMN.to_string()
}

fn default_id() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

/// The four logical columns the cleaning stages operate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_segment")]
    pub segment: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_id")]
    pub id: String,
}

impl ColumnConfig {
    pub fn new(
        segment: impl Into<String>,
        time: impl Into<String>,
        target: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            segment: segment.into(),
            time: time.into(),
            target: target.into(),
            id: id.into(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            segment: default_segment(),
            time: default_time(),
            target: default_target(),
            id: default_id(),
        }
    }
}

impl Validate for ColumnConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("columns.segment", self.segment.as_str()),
            ("columns.time", self.time.as_str()),
            ("columns.target", self.target.as_str()),
            ("columns.id", self.id.as_str()),
        ];
        for (field, value) in fields {
            validate_non_empty_string(field, value)?;
        }
        validate_distinct(&fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let columns = ColumnConfig::default();
        assert_eq!(columns.segment, "Junction");
        assert_eq!(columns.time, "DateTime");
        assert_eq!(columns.target, "Vehicles");
        assert_eq!(columns.id, "ID");
        assert!(columns.validate().is_ok());
    }

    #[test]
    fn test_rejects_reused_column() {
        let columns = ColumnConfig::new("Junction", "DateTime", "Junction", "ID");
        assert!(columns.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_column() {
        let columns = ColumnConfig::new("Junction", " ", "Vehicles", "ID");
        assert!(columns.validate().is_err());
    }
}
