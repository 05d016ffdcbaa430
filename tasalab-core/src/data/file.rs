//! Local JSON payload provider.
//!
//! Reads a document in the same shape the remote API returns. The fetch
//! window is ignored: the file is the whole history.

use super::provider::{DataError, FetchRequest, RateProvider};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the payload.
    pub fn load(&self) -> Result<Value, DataError> {
        debug!(path = %self.path.display(), "reading rate payload");
        let content = std::fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| DataError::ResponseFormat(e.to_string()))
    }
}

impl RateProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Value, DataError> {
        self.load()
    }
}
