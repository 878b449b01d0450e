//! `DEPS.toml` manifests and the dependencies they declare.
//!
//! A manifest is pure data, parsed with `toml` and never executed:
//!
//! ```toml
//! links = ["third_party"]
//!
//! [[deps]]
//! file_name = "gn-linux.tar.xz"
//! folder = "."
//! url = "https://example.com/gn/gn-linux.tar.xz"
//! sha1 = "8d7258cec98b816c15b998e2d1136f1a58256e1b"
//! platforms = ["linux"]
//! ```
//!
//! [`resolve`] walks the link tree and flattens every applicable entry
//! into one ordered list of [`Dependency`] values whose folders are
//! relative to the resolution root.
pub mod resolver;

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use resolver::resolve;

use crate::platform::{Arch, Os, PlatformConfig};
use crate::resources::archive;
use crate::resources::helpers::fs::normalize;

/// File name of a manifest inside a directory.
pub const MANIFEST_FILE_NAME: &str = "DEPS.toml";

/// Folder (under the sync root) that archives are downloaded into.
pub const STAGING_DIR_NAME: &str = ".tmp";

/// Stand-in for `..` in staging subfolder names.
const STAGED_PARENT: &str = "_up_";

/// On-disk shape of one manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Directories, relative to this manifest, holding child manifests.
    #[serde(default)]
    pub links: Vec<PathBuf>,
    /// Dependencies declared by this manifest.
    #[serde(default)]
    pub deps: Vec<DependencySpec>,
}

/// One `[[deps]]` entry as written in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySpec {
    /// File name of the downloaded artifact.
    pub file_name: String,
    /// Folder relative to the manifest; archives are extracted here.
    #[serde(default = "current_dir")]
    pub folder: PathBuf,
    /// Download URL.
    pub url: String,
    /// Expected SHA-1 of the downloaded file.
    pub sha1: String,
    /// Target platforms this entry applies to (empty means all).
    #[serde(default)]
    pub platforms: Vec<Os>,
    /// Target architectures this entry applies to (empty means all).
    #[serde(default)]
    pub archs: Vec<Arch>,
    /// Host platforms this entry applies to (empty means all).
    #[serde(default)]
    pub host_platforms: Vec<Os>,
    /// Host architectures this entry applies to (empty means all).
    #[serde(default)]
    pub host_archs: Vec<Arch>,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Subfolder of the staging directory for archives declared in `folder`.
/// Only plain names survive, so the result never climbs out of staging.
fn staging_subdir(folder: &Path) -> PathBuf {
    normalize(folder)
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            Component::ParentDir => Some(OsStr::new(STAGED_PARENT)),
            _ => None,
        })
        .collect()
}

fn allows<T: PartialEq>(filter: &[T], value: &T) -> bool {
    filter.is_empty() || filter.contains(value)
}

impl DependencySpec {
    /// Whether every platform filter on this entry accepts `platform`.
    #[must_use]
    pub fn applies_to(&self, platform: &PlatformConfig) -> bool {
        allows(&self.platforms, &platform.target_platform)
            && allows(&self.archs, &platform.target_arch)
            && allows(&self.host_platforms, &platform.host_platform)
            && allows(&self.host_archs, &platform.host_arch)
    }

    /// Check the entry for structural problems.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let mut components = Path::new(&self.file_name).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(format!(
                "file_name '{}' must be a plain file name",
                self.file_name
            ));
        }
        if self.folder.is_absolute() {
            return Err(format!(
                "folder '{}' of {} must be relative",
                self.folder.display(),
                self.file_name
            ));
        }
        if self.url.trim().is_empty() {
            return Err(format!("url of {} is empty", self.file_name));
        }
        Ok(())
    }
}

/// A resolved dependency.  Its folder is relative to the sync root.
///
/// This is also the shape persisted in the record file, so field order is
/// the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// File name of the downloaded artifact.
    pub file_name: String,
    /// Folder relative to the sync root.
    pub folder: PathBuf,
    /// Download URL.
    pub url: String,
    /// Expected SHA-1.
    pub sha1: String,
    /// Manifest that declared this dependency (diagnostics only).
    #[serde(skip)]
    pub source_manifest: PathBuf,
}

impl Dependency {
    /// Whether the artifact is an archive.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        archive::is_archive_name(Path::new(&self.file_name))
    }

    /// Where the artifact is downloaded: the staging folder for archives,
    /// the target folder otherwise.  This path is the dependency's identity.
    #[must_use]
    pub fn download_path(&self, root: &Path) -> PathBuf {
        let relative = if self.is_archive() {
            Path::new(STAGING_DIR_NAME).join(staging_subdir(&self.folder))
        } else {
            self.folder.clone()
        };
        normalize(&root.join(relative).join(&self.file_name))
    }

    /// Folder archives are extracted into.
    #[must_use]
    pub fn target_dir(&self, root: &Path) -> PathBuf {
        normalize(&root.join(&self.folder))
    }

    /// Short root-relative name for log lines, e.g. `tools/gn.tar.xz`.
    #[must_use]
    pub fn display_name(&self) -> String {
        normalize(&self.folder.join(&self.file_name))
            .display()
            .to_string()
    }
}
