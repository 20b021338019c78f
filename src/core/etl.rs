use crate::core::{CleaningReport, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs extract, transform and load in order, stopping at the first error.
    pub fn run(&self) -> Result<CleaningReport> {
        let started = Instant::now();
        tracing::info!("Starting cleaning run");

        let table = self.pipeline.extract()?;
        tracing::info!(
            "Extracted {} rows with columns [{}]",
            table.len(),
            table.columns.join(", ")
        );

        let result = self.pipeline.transform(table)?;
        tracing::info!(
            "Transformed: {} rows kept, {} dropped",
            result.report.rows_written,
            result.report.rows_dropped()
        );
        if result.table.is_empty() {
            tracing::warn!("No rows survived cleaning");
        }

        let result = self.pipeline.load(result)?;
        tracing::info!(
            "Saved {} rows to {} in {:?}",
            result.report.rows_written,
            result.report.output_path.as_deref().unwrap_or("<unknown>"),
            started.elapsed()
        );

        Ok(result.report)
    }
}
