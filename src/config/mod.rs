//! Run configuration: the cached platform settings in `_config.toml`.
pub mod toml_loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::{Arch, Os, PlatformConfig};

/// File name of the platform config cache inside the sync root.
pub const CONFIG_FILE_NAME: &str = "_config.toml";

/// Platform values supplied explicitly (command-line flags).
///
/// Also the on-disk shape of [`CONFIG_FILE_NAME`]: every key is optional,
/// unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformOverrides {
    /// Host platform override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_platform: Option<Os>,
    /// Host architecture override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_arch: Option<Arch>,
    /// Target platform override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<Os>,
    /// Target architecture override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_arch: Option<Arch>,
}

impl PlatformOverrides {
    /// Layer the values that are set onto `base`.
    #[must_use]
    pub fn apply_to(self, base: PlatformConfig) -> PlatformConfig {
        PlatformConfig {
            host_platform: self.host_platform.unwrap_or(base.host_platform),
            host_arch: self.host_arch.unwrap_or(base.host_arch),
            target_platform: self.target_platform.unwrap_or(base.target_platform),
            target_arch: self.target_arch.unwrap_or(base.target_arch),
        }
    }
}

impl From<PlatformConfig> for PlatformOverrides {
    fn from(config: PlatformConfig) -> Self {
        Self {
            host_platform: Some(config.host_platform),
            host_arch: Some(config.host_arch),
            target_platform: Some(config.target_platform),
            target_arch: Some(config.target_arch),
        }
    }
}

/// Path of the config cache for `root`.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Resolve the platform for this run and write it back to the cache.
///
/// Priority, lowest first: detection, the cached file (unless
/// `skip_cache`), `explicit`.
///
/// # Errors
///
/// Returns an error if the cache exists but cannot be read, contains an
/// unrecognised key or value, or cannot be written.
pub fn resolve_platform(
    root: &Path,
    explicit: PlatformOverrides,
    skip_cache: bool,
) -> Result<PlatformConfig, ConfigError> {
    let path = config_path(root);
    let mut config = PlatformConfig::detect();

    if skip_cache {
        tracing::debug!("ignoring {}", path.display());
    } else {
        let cached: PlatformOverrides = toml_loader::load_config(&path)?;
        config = cached.apply_to(config);
    }
    config = explicit.apply_to(config);

    toml_loader::save_config(&path, &PlatformOverrides::from(config))?;
    tracing::debug!("platform: {config}");
    Ok(config)
}
