use crate::domain::model::{CleaningResult, Table};
use crate::utils::error::Result;
use std::path::Path;

pub trait Storage {
    fn exists(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Replaces `path` with `data`; on failure the previous contents (if any) are untouched.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Table>;
    fn transform(&self, table: Table) -> Result<CleaningResult>;
    fn load(&self, result: CleaningResult) -> Result<CleaningResult>;
}
