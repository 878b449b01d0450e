//! xz-compressed tarball handling: detection, extraction and cleanup of
//! previously extracted members.
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use tar::Archive;
use xz2::read::XzDecoder;

use super::error::ResourceError;
use super::helpers::fs::remove_path;

/// Return `true` if `path` names an xz payload (the file name ends in `xz`).
#[must_use]
pub fn is_archive_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("xz"))
}

fn open(archive: &Path) -> Result<Archive<XzDecoder<File>>, ResourceError> {
    let file = File::open(archive).map_err(|e| ResourceError::io(archive, e))?;
    Ok(Archive::new(XzDecoder::new(file)))
}

fn archive_error(archive: &Path, e: &std::io::Error) -> ResourceError {
    ResourceError::Archive {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    }
}

/// List the member paths stored in `archive` without writing anything.
///
/// Walking every header also drains the compressed stream, so a truncated
/// or corrupt payload is reported here rather than halfway through an
/// extraction.
///
/// # Errors
///
/// Returns [`ResourceError::Io`] if the file cannot be opened and
/// [`ResourceError::Archive`] if it is not a readable xz tarball.
pub fn member_names(archive: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    let mut tar = open(archive)?;
    let entries = tar.entries().map_err(|e| archive_error(archive, &e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| archive_error(archive, &e))?;
        let name = entry.path().map_err(|e| archive_error(archive, &e))?;
        names.push(name.into_owned());
    }
    Ok(names)
}

/// Extract every member of `archive` into `dest`, overwriting files that
/// already exist at member paths.
///
/// The archive is validated before `dest` is created, so a missing or
/// malformed payload leaves the filesystem untouched.
///
/// # Errors
///
/// Returns an error if `archive` is missing or is not a readable xz
/// tarball, or if a member cannot be written.
pub fn extract(archive: &Path, dest: &Path) -> Result<(), ResourceError> {
    if !archive.is_file() {
        return Err(ResourceError::Archive {
            path: archive.to_path_buf(),
            reason: "archive does not exist".to_string(),
        });
    }
    member_names(archive)?;

    std::fs::create_dir_all(dest).map_err(|e| ResourceError::io(dest, e))?;
    let mut tar = open(archive)?;
    tar.set_overwrite(true);
    tar.set_preserve_permissions(true);
    tar.unpack(dest).map_err(|e| archive_error(archive, &e))
}

/// A member name is safe to delete only if it stays strictly below `dest`.
fn is_removable_member(name: &Path) -> bool {
    let mut has_normal = false;
    for component in name.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}

/// Delete everything under `dest` that was extracted from `archive`.
///
/// Best effort: a missing or corrupt archive, or a member that cannot be
/// removed, is logged at debug level and skipped.  Member names that are
/// absolute or climb out of `dest` are never touched.
pub fn delete_extracted_members(archive: &Path, dest: &Path) {
    let names = match member_names(archive) {
        Ok(names) => names,
        Err(e) => {
            tracing::debug!("not deleting extracted members: {e}");
            return;
        }
    };

    let mut announced = false;
    for name in names.iter().filter(|n| is_removable_member(n)) {
        let path = dest.join(name);
        if path.symlink_metadata().is_err() {
            continue;
        }
        if !announced {
            tracing::info!("deleting files extracted from {}", archive.display());
            announced = true;
        }
        tracing::debug!("deleting {}", path.display());
        if let Err(e) = remove_path(&path) {
            tracing::debug!("cannot delete extracted member: {e}");
        }
    }
}
