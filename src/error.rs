//! Domain-specific error types for the ezdeps engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! EzdepsError
//! ├── Config(ConfigError)    : TOML loading, platform config cache
//! ├── Manifest(ManifestError): DEPS.toml resolution
//! ├── Record(RecordError)    : synced-dependency record file
//! └── Resource(ResourceError): download, checksum, archive, filesystem
//! ```

use std::path::PathBuf;

use thiserror::Error;

pub use crate::resources::error::ResourceError;

/// Top-level error type for the ezdeps engine.
#[derive(Error, Debug)]
pub enum EzdepsError {
    /// Configuration-related error (parsing, platform cache I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Manifest resolution error.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Record file error.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Per-dependency resource error.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors that arise from loading or writing TOML files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file contains a syntax error or does not match the schema.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The resolved configuration could not be written back.
    #[error("cannot write config file {path}: {reason}")]
    Write {
        /// Path to the file that could not be written.
        path: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors that abort manifest resolution.
///
/// An incomplete dependency list cannot be trusted, so every variant stops
/// the whole run before any dependency is touched.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A directory named in `links` (or the root) has no `DEPS.toml`.
    #[error("manifest not found: {}", path.display())]
    NotFound {
        /// Expected manifest location.
        path: PathBuf,
    },

    /// The manifest exists but could not be read or parsed.
    #[error(transparent)]
    Load(#[from] ConfigError),

    /// A dependency entry is structurally invalid.
    #[error("invalid dependency in {}: {message}", path.display())]
    InvalidEntry {
        /// Manifest declaring the entry.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A manifest links back into a manifest that is still being resolved.
    #[error("manifest link cycle through {}", path.display())]
    LinkCycle {
        /// Manifest reached a second time.
        path: PathBuf,
    },
}

/// Errors from the synced-dependency record file.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record file exists but could not be read.
    #[error("cannot read record file {}: {source}", path.display())]
    Io {
        /// Record file location.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The record file is not valid JSON or has the wrong shape.
    #[error("malformed record file {}: {source}", path.display())]
    Malformed {
        /// Record file location.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The record file could not be written.
    #[error("cannot write record file {}: {reason}", path.display())]
    Write {
        /// Record file location.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },
}
