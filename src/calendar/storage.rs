use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::error::{StoreError, StoreResult};

/// A durable key-value slot holding one serialized snapshot per key.
pub trait Storage {
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the snapshot under `key`.
    fn write(&mut self, key: &str, snapshot: &str) -> StoreResult<()>;

    /// Keep an unreadable snapshot somewhere before it gets overwritten.
    fn preserve_corrupt(&mut self, _key: &str, _raw: &str) -> StoreResult<()> {
        Ok(())
    }
}

/// One `<key>.json` file per slot inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, snapshot: &str) -> StoreResult<()> {
        self.ensure_dir()?;
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, snapshot).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn preserve_corrupt(&mut self, key: &str, raw: &str) -> StoreResult<()> {
        self.ensure_dir()?;
        let path = self.dir.join(format!("{}.corrupt.json", key));
        fs::write(&path, raw).map_err(|source| StoreError::Io { path, source })
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStorage;
