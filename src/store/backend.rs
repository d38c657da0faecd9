use std::fs;
use std::io;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::{Mutex, PoisonError};

use super::{StoreError, StoreResult};

/// Where the serialized table lives. `read` returns `None` when the
/// resource does not exist yet.
pub trait Backend: Send + Sync {
    fn describe(&self) -> String;
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;
    fn write(&self, bytes: &[u8]) -> StoreResult<()>;
}

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Backend for CsvFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, bytes).map_err(|e| self.io_error(e))
    }
}

/// In-process stand-in for the file, holding the serialized bytes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<Vec<u8>>>,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }
}

#[cfg(test)]
impl Backend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".into()
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes.to_vec());
        Ok(())
    }
}
