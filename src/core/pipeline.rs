use crate::adapters::LocalStorage;
use crate::config::ColumnConfig;
use crate::core::etl::EtlEngine;
use crate::core::io::{load_from, save_to, DEFAULT_DELIMITER};
use crate::core::transform::{parse_timestamps, sort_by_segment_then_time};
use crate::core::validator::RowValidator;
use crate::core::{CleaningReport, CleaningResult, Pipeline, Storage, Table};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub columns: ColumnConfig,
    pub input_delimiter: u8,
    pub output_delimiter: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            columns: ColumnConfig::default(),
            input_delimiter: DEFAULT_DELIMITER,
            output_delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// load → select columns → parse timestamps → validate → sort → save.
pub struct CleaningPipeline<S: Storage> {
    storage: S,
    input_path: PathBuf,
    output_path: PathBuf,
    options: PipelineOptions,
}

impl<S: Storage> CleaningPipeline<S> {
    pub fn new(
        storage: S,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            storage,
            input_path: input_path.into(),
            output_path: output_path.into(),
            options,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }
}

impl<S: Storage> Pipeline for CleaningPipeline<S> {
    fn extract(&self) -> Result<Table> {
        tracing::debug!("Reading {}", self.input_path.display());
        load_from(&self.storage, &self.input_path, self.options.input_delimiter)
    }

    fn transform(&self, table: Table) -> Result<CleaningResult> {
        let columns = &self.options.columns;
        let mut report = CleaningReport {
            input_path: self.input_path.display().to_string(),
            rows_read: table.len(),
            ..Default::default()
        };

        // The id column rides along with the three modeling columns so the
        // validator can check uniqueness after projection.
        let keep = [
            columns.segment.as_str(),
            columns.time.as_str(),
            columns.target.as_str(),
            columns.id.as_str(),
        ];
        report.columns_dropped = table
            .columns
            .iter()
            .filter(|c| !keep.contains(&c.as_str()))
            .cloned()
            .collect();
        let table = table.project(&keep)?;
        if !report.columns_dropped.is_empty() {
            tracing::debug!("Dropped columns: {}", report.columns_dropped.join(", "));
        }

        let before = table.len();
        let table = parse_timestamps(table, &columns.time)?;
        report.unparseable_timestamps = before - table.len();

        let (table, summary) =
            RowValidator::new(columns.clone()).validate_with_report(table)?;
        report.validation = summary;

        let table = sort_by_segment_then_time(table, &columns.segment, &columns.time)?;
        report.rows_written = table.len();

        Ok(CleaningResult { table, report })
    }

    fn load(&self, mut result: CleaningResult) -> Result<CleaningResult> {
        save_to(
            &self.storage,
            &result.table,
            &self.output_path,
            self.options.output_delimiter,
        )?;

        result.report.output_path = Some(self.output_path.display().to_string());
        Ok(result)
    }
}

/// Cleans `input_path` into `output_path` using the default column names.
pub fn run_pipeline(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<CleaningReport> {
    run_pipeline_with(input_path, output_path, &PipelineOptions::default())
}

pub fn run_pipeline_with(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: &PipelineOptions,
) -> Result<CleaningReport> {
    let pipeline = CleaningPipeline::new(
        LocalStorage::new(),
        input_path.as_ref(),
        output_path.as_ref(),
        options.clone(),
    );
    EtlEngine::new(pipeline).run()
}
