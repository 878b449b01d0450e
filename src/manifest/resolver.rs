//! Recursive manifest resolution.
use std::path::{Path, PathBuf};

use super::{Dependency, MANIFEST_FILE_NAME, ManifestFile};
use crate::config::toml_loader::load_config;
use crate::error::ManifestError;
use crate::platform::PlatformConfig;
use crate::resources::helpers::fs::normalize;

/// Load the manifest in `root` and everything it links to.
///
/// Links are resolved depth-first in declaration order, and a manifest's
/// linked dependencies come before its own.  Folders are rewritten to be
/// relative to `root`.  Entries whose platform filters reject `platform`
/// are dropped.  Duplicates are kept.
///
/// # Errors
///
/// Any manifest that is missing, unparsable, holds an invalid entry, or
/// links back into the chain currently being resolved aborts the whole
/// resolution.
pub fn resolve(root: &Path, platform: &PlatformConfig) -> Result<Vec<Dependency>, ManifestError> {
    let mut resolver = Resolver {
        root,
        platform,
        stack: Vec::new(),
        deps: Vec::new(),
    };
    resolver.visit(Path::new("."))?;
    Ok(resolver.deps)
}

struct Resolver<'a> {
    root: &'a Path,
    platform: &'a PlatformConfig,
    /// Root-relative directories of the manifests being resolved.
    stack: Vec<PathBuf>,
    deps: Vec<Dependency>,
}

impl Resolver<'_> {
    fn visit(&mut self, dir: &Path) -> Result<(), ManifestError> {
        let dir = normalize(dir);
        let path = normalize(&self.root.join(&dir).join(MANIFEST_FILE_NAME));
        if self.stack.contains(&dir) {
            return Err(ManifestError::LinkCycle { path });
        }
        if !path.is_file() {
            return Err(ManifestError::NotFound { path });
        }

        let manifest: ManifestFile = load_config(&path)?;
        tracing::debug!(
            "loaded {}: {} link(s), {} dep(s)",
            path.display(),
            manifest.links.len(),
            manifest.deps.len()
        );

        self.stack.push(dir.clone());
        for link in &manifest.links {
            self.visit(&dir.join(link))?;
        }
        self.stack.pop();

        for spec in manifest.deps {
            spec.validate()
                .map_err(|message| ManifestError::InvalidEntry {
                    path: path.clone(),
                    message,
                })?;
            if !spec.applies_to(self.platform) {
                tracing::debug!("{} does not apply to {}", spec.file_name, self.platform);
                continue;
            }
            self.deps.push(Dependency {
                folder: normalize(&dir.join(&spec.folder)),
                file_name: spec.file_name,
                url: spec.url,
                sha1: spec.sha1,
                source_manifest: path.clone(),
            });
        }
        Ok(())
    }
}
