//! Persistence seam for the latest accepted point
//!
//! Accept decisions are sequential: each one depends on the point chosen by
//! the one before it. Callers must therefore serialize the retrieve ->
//! evaluate -> store cycle per tracked entity; evaluating against a stale
//! latest point can admit fixes that a fresher reference would have rejected.

use crate::core::Point;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by point store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access point store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode stored point: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for the most recently accepted point of one tracked entity
pub trait PointStore {
    /// The latest accepted point, or `None` if nothing has been accepted yet
    fn retrieve_latest(&self) -> Result<Option<Point>, StoreError>;

    /// Record `point` as the new latest accepted point
    fn store(&mut self, point: Point) -> Result<(), StoreError>;
}

/// In-memory store, suitable for tests and in-process tracking
#[derive(Debug, Clone, Default)]
pub struct MemoryPointStore {
    latest: Option<Point>,
}

impl MemoryPointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointStore for MemoryPointStore {
    fn retrieve_latest(&self) -> Result<Option<Point>, StoreError> {
        Ok(self.latest.clone())
    }

    fn store(&mut self, point: Point) -> Result<(), StoreError> {
        self.latest = Some(point);
        Ok(())
    }
}

/// Store persisting the latest accepted point as a JSON file
///
/// Writes go through a sibling temp file and a rename, so readers never see
/// a partially written latest point.
#[derive(Debug, Clone)]
pub struct JsonPointStore {
    path: PathBuf,
}

impl JsonPointStore {
    /// Create a store backed by `path`. The file is created on the first
    /// accepted point; a missing file reads as no point accepted yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointStore for JsonPointStore {
    fn retrieve_latest(&self) -> Result<Option<Point>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let point = serde_json::from_str(&content)?;
        Ok(Some(point))
    }

    fn store(&mut self, point: Point) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&point)?;
        // Write to a sibling temp file and rename into place, so the
        // latest-point file is never observed truncated.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
