//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for the
//! download, verification and extraction steps.  Internal resource code
//! returns these variants directly; the orchestrator turns them into a
//! per-dependency failure line.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while bringing one dependency into its desired state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The host was unreachable or answered with a non-success status.
    #[error("cannot download from {url}: {reason}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport or status description.
        reason: String,
    },

    /// A local filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path being read, written or removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A freshly downloaded file does not hash to the declared checksum.
    #[error("sha1 of {} is {actual}, expected {expected}", path.display())]
    ChecksumMismatch {
        /// Downloaded file.
        path: PathBuf,
        /// Checksum declared in the manifest.
        expected: String,
        /// Checksum actually computed (empty if the file vanished).
        actual: String,
    },

    /// The payload is not a readable xz-compressed tarball.
    #[error("cannot extract {}: {reason}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Decoder or tar error description.
        reason: String,
    },

    /// The artifact location is occupied by something that must not be touched.
    #[error("invalid state for {}: {reason}", path.display())]
    InvalidState {
        /// Artifact path.
        path: PathBuf,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ResourceError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
