use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage. Writes go to a sibling temp file that is renamed into place.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn staging_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        path.with_file_name(format!(".{}.tmp", name))
    }
}

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(path)?;
        Ok(data)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let write_err = |source| EtlError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let staging = Self::staging_path(path);
        if let Err(e) = fs::write(&staging, data).and_then(|_| fs::rename(&staging, path)) {
            let _ = fs::remove_file(&staging);
            return Err(write_err(e));
        }

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data/processed/out.csv");
        let storage = LocalStorage::new();

        storage.write_file(&path, b"a,b\n1,2\n").unwrap();

        assert!(storage.exists(&path));
        assert_eq!(storage.read_file(&path).unwrap(), b"a,b\n1,2\n");
        assert!(!LocalStorage::staging_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        let storage = LocalStorage::new();

        storage.write_file(&path, b"old").unwrap();
        storage.write_file(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_into_file_parent_fails_with_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();
        let storage = LocalStorage::new();

        let err = storage
            .write_file(&blocker.join("out.csv"), b"data")
            .unwrap_err();

        assert!(matches!(err, EtlError::Write { .. }));
    }

    #[test]
    fn test_exists_is_false_for_directories() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!LocalStorage::new().exists(temp_dir.path()));
    }
}
