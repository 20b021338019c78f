pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::LocalStorage;
pub use config::{toml_config::TomlConfig, ColumnConfig};
pub use crate::core::{
    etl::EtlEngine,
    io::{load, save},
    pipeline::{run_pipeline, run_pipeline_with, CleaningPipeline, PipelineOptions},
    transform::{parse_timestamps, select_columns, sort_by_segment_then_time},
    validator::{is_positive_integer, validate, RowValidator},
};
pub use domain::model::{CleaningReport, Row, Table, Value};
pub use utils::error::{EtlError, Result};
