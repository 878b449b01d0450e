//! The record of dependencies materialized by the last sync.
//!
//! Stored as pretty-printed JSON next to the top-level manifest and only
//! consulted to find orphans on the next run.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::manifest::Dependency;

/// File name of the record inside the sync root.
pub const RECORD_FILE_NAME: &str = ".ezdeps-synced.json";

/// Dependencies that were successfully synced, in sync order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Recorded dependencies.
    pub deps: Vec<Dependency>,
}

impl RecordSet {
    /// Wrap a list of synced dependencies.
    #[must_use]
    pub const fn new(deps: Vec<Dependency>) -> Self {
        Self { deps }
    }

    /// Path of the record file for `root`.
    #[must_use]
    pub fn path(root: &Path) -> PathBuf {
        root.join(RECORD_FILE_NAME)
    }

    /// Load the record for `root`.  An absent file is an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, RecordError> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| RecordError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| RecordError::Malformed { path, source })
    }

    /// Replace the record file for `root` with this set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, root: &Path) -> Result<(), RecordError> {
        let path = Self::path(root);
        let write_error = |reason: String| RecordError::Write {
            path: path.clone(),
            reason,
        };
        let mut content = serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        content.push('\n');
        std::fs::write(&path, content).map_err(|e| write_error(e.to_string()))
    }
}
