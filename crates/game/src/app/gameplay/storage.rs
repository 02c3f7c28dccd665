use std::fs;
use std::io;
use std::path::PathBuf;

use labyrinth_engine::write_text_atomic;
use thiserror::Error;

pub(crate) const SAVE_SLOT: &str = "save";
pub(crate) const PERSONAL_SLOT: &str = "personal";

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("read slot '{slot}' from {path}: {source}")]
    Read {
        slot: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write slot '{slot}' to {path}: {source}")]
    Write {
        slot: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Named-slot key-value persistence. A slot that was never written reads as `None`.
pub(crate) trait SaveStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError>;
    fn describe(&self, slot: &str) -> String;
}

/// In-process slots for tests that do not need a disk.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStore {
    slots: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SaveStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn describe(&self, slot: &str) -> String {
        format!("memory:{slot}")
    }
}

/// One `<slot>.json` file per slot, replaced atomically on write.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                slot: slot.to_string(),
                path,
                source,
            }),
        }
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(slot);
        write_text_atomic(&path, value).map_err(|source| StorageError::Write {
            slot: slot.to_string(),
            path,
            source,
        })
    }

    fn describe(&self, slot: &str) -> String {
        self.slot_path(slot).display().to_string()
    }
}
