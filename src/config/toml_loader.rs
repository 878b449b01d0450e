//! TOML file loading and writing with typed errors.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize the TOML file at `path`.
///
/// A missing file deserializes from an empty document, so types whose
/// fields are all optional load as their empty value.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read and
/// [`ConfigError::InvalidSyntax`] if it is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?
    } else {
        String::new()
    };

    toml::from_str(&content).map_err(|e| ConfigError::InvalidSyntax {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}

/// Serialize `value` as TOML and write it to `path`, replacing any
/// existing file.
///
/// # Errors
///
/// Returns [`ConfigError::Write`] if serialization or the write fails.
pub fn save_config<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let write_error = |reason: String| ConfigError::Write {
        path: path.display().to_string(),
        reason,
    };
    let content = toml::to_string(value).map_err(|e| write_error(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| write_error(e.to_string()))
}
