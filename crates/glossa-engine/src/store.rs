//! Snapshot persistence backends.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glossa_core::errors::SnapshotError;
use glossa_core::traits::ISnapshotStore;
use tempfile::NamedTempFile;

/// Keeps the latest snapshot in memory. Useful for tests and hand-off.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ISnapshotStore for MemorySnapshotStore {
    fn save(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let mut slot = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, SnapshotError> {
        let slot = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        slot.clone().ok_or(SnapshotError::Missing)
    }
}

/// Writes snapshots to one file, atomically: a temp file in the same
/// directory is written, flushed, then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ISnapshotStore for FileSnapshotStore {
    fn save(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;

        let temp = NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            writer.write_all(bytes).map_err(|e| self.io_error(e))?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, SnapshotError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SnapshotError::Missing),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemorySnapshotStore::new();
        assert!(matches!(store.load(), Err(SnapshotError::Missing)));
        store.save(b"{}").unwrap();
        assert_eq!(store.load().unwrap(), b"{}");
    }

    #[test]
    fn file_store_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested").join("state.json"));
        assert!(matches!(store.load(), Err(SnapshotError::Missing)));
        store.save(b"first").unwrap();
        store.save(b"second").unwrap();
        assert_eq!(store.load().unwrap(), b"second");
    }
}
