//! JSON file persistence.
//!
//! # Invariants
//! - The file holds one pretty-printed JSON array of records.
//! - Saves go to a sibling temporary file that is fsynced and renamed over
//!   the target; readers never observe a half-written array.
//! - The temporary file is removed on every failed save path.

use crate::repo::{RecordPersistence, StoreError, StoreResult};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-backed persistence for one record collection.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T: Serialize + DeserializeOwned> RecordPersistence<T> for JsonFileStore<T> {
    fn load(&self) -> StoreResult<Vec<T>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=store_load module=repo status=ok backend=file records=0 reason=missing_file");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(
                    "event=store_load module=repo status=degraded backend=file error_code=corrupt_file line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, records: &[T]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|err| self.io_error(err))?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|err| self.io_error(err))?;
        serde_json::to_writer_pretty(&mut staged, records)?;
        staged
            .write_all(b"\n")
            .and_then(|()| staged.flush())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStore;
    use crate::repo::RecordPersistence;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        content: String,
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Row>::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"id\": 1, \"content\":").unwrap();
        let store = JsonFileStore::<Row>::new(&path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_file_and_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let mut store = JsonFileStore::<Row>::new(&path);
        let rows = vec![Row {
            id: 1,
            content: "a".to_string(),
        }];
        store.save(&rows).unwrap();
        store.save(&rows).unwrap();

        assert_eq!(store.load().unwrap(), rows);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        let mut store = JsonFileStore::<Row>::new(&path);
        store.save(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }
}
