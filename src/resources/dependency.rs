//! Dependency resource: one remote artifact reconciled against its checksum.
use std::path::{Path, PathBuf};

use super::archive;
use super::checksum::{self, Verification};
use super::error::ResourceError;
use super::fetch::{self, Fetcher};
use super::helpers::fs::remove_existing;
use super::{ResourceChange, ResourceState};
use crate::manifest::Dependency;

/// A downloaded artifact that can be checked, fetched, extracted and removed.
pub struct DependencyResource<'a> {
    /// Where the artifact is downloaded to (staging folder for archives).
    pub download_path: PathBuf,
    /// Folder archives are extracted into.
    pub target_dir: PathBuf,
    /// Source URL.
    pub url: String,
    /// Expected SHA-1 digest.
    pub sha1: String,
    /// Re-extract archives even when the download is already valid.
    pub force_extract: bool,
    fetcher: &'a dyn Fetcher,
}

impl std::fmt::Debug for DependencyResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyResource")
            .field("download_path", &self.download_path)
            .field("target_dir", &self.target_dir)
            .field("url", &self.url)
            .field("sha1", &self.sha1)
            .field("force_extract", &self.force_extract)
            .finish_non_exhaustive()
    }
}

impl<'a> DependencyResource<'a> {
    /// Create a new dependency resource.
    #[must_use]
    pub const fn new(
        download_path: PathBuf,
        target_dir: PathBuf,
        url: String,
        sha1: String,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            download_path,
            target_dir,
            url,
            sha1,
            force_extract: false,
            fetcher,
        }
    }

    /// Create from a resolved manifest entry and the sync root.
    #[must_use]
    pub fn from_dependency(dep: &Dependency, root: &Path, fetcher: &'a dyn Fetcher) -> Self {
        Self::new(
            dep.download_path(root),
            dep.target_dir(root),
            dep.url.clone(),
            dep.sha1.clone(),
            fetcher,
        )
    }

    /// Set whether a valid archive is extracted again.
    #[must_use]
    pub const fn with_force_extract(mut self, force_extract: bool) -> Self {
        self.force_extract = force_extract;
        self
    }

    /// Whether the artifact is an archive that expands into `target_dir`.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        archive::is_archive_name(&self.download_path)
    }

    /// Inspect the artifact on disk.  Never touches the network.
    #[must_use]
    pub fn state(&self) -> ResourceState {
        match checksum::verify(&self.download_path, &self.sha1) {
            Verification::Match => ResourceState::Correct,
            Verification::Mismatch { actual } => ResourceState::Incorrect { current: actual },
            Verification::NotFound if self.download_path.is_dir() => ResourceState::Invalid {
                reason: "a directory occupies the download path".to_string(),
            },
            Verification::NotFound => ResourceState::Missing,
        }
    }

    /// Bring the artifact into its desired state with the fewest actions.
    ///
    /// | state     | action                                              |
    /// |-----------|-----------------------------------------------------|
    /// | correct   | nothing, or re-extract when `force_extract` is set  |
    /// | incorrect | delete extracted members and the file, re-download  |
    /// | missing   | download, verify, extract if archive                |
    /// | invalid   | fail without deleting anything                      |
    ///
    /// A checksum mismatch after a fresh download is fatal and the file is
    /// left on disk for inspection.  An invalid state is an error, so this
    /// never reports [`ResourceChange::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ResourceError`] hit along the way.
    pub fn reconcile(&self) -> Result<ResourceChange, ResourceError> {
        match self.state() {
            ResourceState::Correct if self.force_extract && self.is_archive() => {
                self.extract()?;
                Ok(ResourceChange::Applied)
            }
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Incorrect { current } => {
                tracing::info!(
                    "{} has sha1 {current}, expected {}",
                    self.download_path.display(),
                    self.sha1
                );
                self.delete_artifact()?;
                self.fetch_fresh()?;
                Ok(ResourceChange::Applied)
            }
            ResourceState::Missing => {
                self.fetch_fresh()?;
                Ok(ResourceChange::Applied)
            }
            ResourceState::Invalid { reason } => Err(ResourceError::InvalidState {
                path: self.download_path.clone(),
                reason,
            }),
        }
    }

    /// Replace the artifact with whatever the URL currently serves, skipping
    /// checksum verification, and return the digest of the new file.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory occupies the download path, or if the
    /// download or extraction fails.
    pub fn force_update(&self) -> Result<String, ResourceError> {
        if self.download_path.is_dir() {
            return Err(ResourceError::InvalidState {
                path: self.download_path.clone(),
                reason: "a directory occupies the download path".to_string(),
            });
        }
        if let Err(e) = self.delete_artifact() {
            tracing::debug!("stale artifact not removed before update: {e}");
        }
        fetch::download(self.fetcher, &self.url, &self.download_path)?;
        if self.is_archive() {
            self.extract()?;
        }
        checksum::digest(&self.download_path).ok_or_else(|| ResourceError::InvalidState {
            path: self.download_path.clone(),
            reason: "downloaded file disappeared".to_string(),
        })
    }

    /// Delete the artifact and, for archives, everything it expanded into.
    ///
    /// Never fails: problems are logged and reported as
    /// [`ResourceChange::Skipped`].
    #[must_use]
    pub fn clean(&self) -> ResourceChange {
        if self.download_path.is_dir() {
            return ResourceChange::Skipped {
                reason: "a directory occupies the download path".to_string(),
            };
        }
        if self.download_path.symlink_metadata().is_err() {
            return ResourceChange::AlreadyCorrect;
        }
        match self.delete_artifact() {
            Ok(()) => ResourceChange::Applied,
            Err(e) => {
                tracing::warn!("{e}");
                ResourceChange::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn delete_artifact(&self) -> Result<(), ResourceError> {
        if self.is_archive() {
            archive::delete_extracted_members(&self.download_path, &self.target_dir);
        }
        tracing::debug!("deleting {}", self.download_path.display());
        remove_existing(&self.download_path)
    }

    fn fetch_fresh(&self) -> Result<(), ResourceError> {
        fetch::download(self.fetcher, &self.url, &self.download_path)?;
        match checksum::verify(&self.download_path, &self.sha1) {
            Verification::Match => {}
            Verification::Mismatch { actual } => {
                return Err(ResourceError::ChecksumMismatch {
                    path: self.download_path.clone(),
                    expected: self.sha1.clone(),
                    actual,
                });
            }
            Verification::NotFound => {
                return Err(ResourceError::ChecksumMismatch {
                    path: self.download_path.clone(),
                    expected: self.sha1.clone(),
                    actual: String::new(),
                });
            }
        }
        if self.is_archive() {
            self.extract()?;
        }
        Ok(())
    }

    fn extract(&self) -> Result<(), ResourceError> {
        tracing::info!(
            "extracting {} into {}",
            self.download_path.display(),
            self.target_dir.display()
        );
        archive::extract(&self.download_path, &self.target_dir)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::archive::test_fixtures::write_tar_xz;
    use crate::resources::fetch::MockFetcher;

    const SHA1_A: &str = "86f7e437faa5a7fce15d1ddcb9eaeaea377667b8";
    const SHA1_B: &str = "e9d71f5ee7c92d6dc9e92ffdad17b8bd49418f98";

    fn serving(body: &[u8]) -> MockFetcher {
        let body = body.to_vec();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(move |_| Ok(body.clone()));
        fetcher
    }

    fn offline() -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);
        fetcher
    }

    /// Build an archive in a scratch dir and return its bytes and digest.
    fn archive_bytes(files: &[(&str, &[u8])]) -> (Vec<u8>, String) {
        let scratch = tempfile::tempdir().unwrap();
        let path = scratch.path().join("fixture.tar.xz");
        write_tar_xz(&path, files);
        let digest = checksum::digest(&path).unwrap();
        (std::fs::read(&path).unwrap(), digest)
    }

    fn plain<'a>(root: &Path, sha1: &str, fetcher: &'a dyn Fetcher) -> DependencyResource<'a> {
        DependencyResource::new(
            root.join("bin").join("file"),
            root.join("bin"),
            "http://host/file".to_string(),
            sha1.to_string(),
            fetcher,
        )
    }

    fn packed<'a>(root: &Path, sha1: &str, fetcher: &'a dyn Fetcher) -> DependencyResource<'a> {
        DependencyResource::new(
            root.join(".tmp").join("file.tar.xz"),
            root.to_path_buf(),
            "http://host/file.tar.xz".to_string(),
            sha1.to_string(),
            fetcher,
        )
    }

    // -----------------------------------------------------------------------
    // state
    // -----------------------------------------------------------------------

    #[test]
    fn state_missing_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = offline();
        assert_eq!(
            plain(dir.path(), SHA1_A, &fetcher).state(),
            ResourceState::Missing
        );
    }

    #[test]
    fn state_incorrect_reports_actual_digest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/file"), b"b").unwrap();
        let fetcher = offline();
        assert_eq!(
            plain(dir.path(), SHA1_A, &fetcher).state(),
            ResourceState::Incorrect {
                current: SHA1_B.to_string()
            }
        );
    }

    #[test]
    fn state_invalid_when_directory_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin/file")).unwrap();
        let fetcher = offline();
        let resource = plain(dir.path(), SHA1_A, &fetcher);
        assert!(matches!(resource.state(), ResourceState::Invalid { .. }));
    }

    // -----------------------------------------------------------------------
    // reconcile
    // -----------------------------------------------------------------------

    #[test]
    fn reconcile_correct_file_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/file"), b"a").unwrap();
        let before = std::fs::metadata(dir.path().join("bin/file"))
            .unwrap()
            .modified()
            .unwrap();

        let fetcher = offline();
        let change = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap();

        assert_eq!(change, ResourceChange::AlreadyCorrect);
        let after = std::fs::metadata(dir.path().join("bin/file"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(std::fs::read_dir(dir.path().join("bin")).unwrap().count(), 1);
    }

    #[test]
    fn reconcile_missing_file_downloads_it() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = serving(b"a");
        let change = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert!(checksum::matches(&dir.path().join("bin/file"), SHA1_A));
    }

    #[test]
    fn reconcile_accepts_uppercase_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = serving(b"a");
        plain(dir.path(), &SHA1_A.to_uppercase(), &fetcher)
            .reconcile()
            .unwrap();
        assert!(checksum::matches(&dir.path().join("bin/file"), SHA1_A));
    }

    #[test]
    fn reconcile_replaces_file_with_wrong_checksum() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/file"), b"b").unwrap();

        let fetcher = serving(b"a");
        let change = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap();

        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(std::fs::read(dir.path().join("bin/file")).unwrap(), b"a");
    }

    #[test]
    fn reconcile_mismatch_after_download_leaves_file_for_inspection() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = serving(b"b");
        let err = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap_err();

        assert!(
            matches!(
                &err,
                ResourceError::ChecksumMismatch { expected, actual, .. }
                    if expected == SHA1_A && actual == SHA1_B
            ),
            "unexpected error: {err}"
        );
        assert_eq!(std::fs::read(dir.path().join("bin/file")).unwrap(), b"b");
    }

    #[test]
    fn reconcile_network_failure_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|url| {
            Err(ResourceError::Network {
                url: url.to_string(),
                reason: "http status 404".to_string(),
            })
        });
        let err = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap_err();
        assert!(matches!(err, ResourceError::Network { .. }));
        assert!(!dir.path().join("bin/file").exists());
    }

    #[test]
    fn reconcile_refuses_directory_and_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin/file")).unwrap();
        std::fs::write(dir.path().join("bin/file/keep"), b"x").unwrap();

        let fetcher = offline();
        let err = plain(dir.path(), SHA1_A, &fetcher).reconcile().unwrap_err();

        assert!(matches!(err, ResourceError::InvalidState { .. }));
        assert!(dir.path().join("bin/file/keep").exists());
    }

    #[test]
    fn reconcile_downloads_archive_to_staging_and_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let (bytes, digest) = archive_bytes(&[("file", b"a")]);
        let fetcher = serving(&bytes);

        let resource = packed(dir.path(), &digest, &fetcher);
        assert!(resource.is_archive());
        assert_eq!(resource.reconcile().unwrap(), ResourceChange::Applied);

        assert!(checksum::matches(&dir.path().join(".tmp/file.tar.xz"), &digest));
        assert!(checksum::matches(&dir.path().join("file"), SHA1_A));
    }

    #[test]
    fn reconcile_stale_archive_removes_old_members() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".tmp/file.tar.xz");
        std::fs::create_dir_all(dir.path().join(".tmp")).unwrap();
        write_tar_xz(&staging, &[("old/tool", b"old")]);
        archive::extract(&staging, dir.path()).unwrap();
        assert!(dir.path().join("old/tool").exists());

        let (bytes, digest) = archive_bytes(&[("new/tool", b"new")]);
        let fetcher = serving(&bytes);
        packed(dir.path(), &digest, &fetcher).reconcile().unwrap();

        assert!(!dir.path().join("old").exists());
        assert_eq!(std::fs::read(dir.path().join("new/tool")).unwrap(), b"new");
    }

    #[test]
    fn reconcile_force_extract_restores_members_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".tmp/file.tar.xz");
        std::fs::create_dir_all(dir.path().join(".tmp")).unwrap();
        write_tar_xz(&staging, &[("file", b"a")]);
        let digest = checksum::digest(&staging).unwrap();

        let fetcher = offline();
        let resource = packed(dir.path(), &digest, &fetcher);
        assert_eq!(resource.reconcile().unwrap(), ResourceChange::AlreadyCorrect);
        assert!(!dir.path().join("file").exists());

        let resource = resource.with_force_extract(true);
        assert_eq!(resource.reconcile().unwrap(), ResourceChange::Applied);
        assert!(checksum::matches(&dir.path().join("file"), SHA1_A));
    }

    #[test]
    fn reconcile_force_extract_reports_broken_archive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".tmp")).unwrap();
        std::fs::write(dir.path().join(".tmp/file.tar.xz"), b"a").unwrap();

        let fetcher = offline();
        let err = packed(dir.path(), SHA1_A, &fetcher)
            .with_force_extract(true)
            .reconcile()
            .unwrap_err();
        assert!(matches!(err, ResourceError::Archive { .. }));
    }

    // -----------------------------------------------------------------------
    // force_update
    // -----------------------------------------------------------------------

    #[test]
    fn force_update_returns_fresh_digest_regardless_of_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/file"), b"a").unwrap();

        let fetcher = serving(b"b");
        let digest = plain(dir.path(), SHA1_A, &fetcher).force_update().unwrap();

        assert_eq!(digest, SHA1_B);
        assert_eq!(std::fs::read(dir.path().join("bin/file")).unwrap(), b"b");
    }

    #[test]
    fn force_update_extracts_archives() {
        let dir = tempfile::tempdir().unwrap();
        let (bytes, digest) = archive_bytes(&[("file", b"a")]);
        let fetcher = serving(&bytes);

        let fresh = packed(dir.path(), "", &fetcher).force_update().unwrap();

        assert_eq!(fresh, digest);
        assert!(dir.path().join("file").exists());
    }

    #[test]
    fn force_update_propagates_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = serving(b"not an archive");
        assert!(packed(dir.path(), "", &fetcher).force_update().is_err());
    }

    // -----------------------------------------------------------------------
    // clean
    // -----------------------------------------------------------------------

    #[test]
    fn clean_removes_archive_and_members() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".tmp/file.tar.xz");
        std::fs::create_dir_all(dir.path().join(".tmp")).unwrap();
        write_tar_xz(&staging, &[("gn/gn", b"bin")]);
        archive::extract(&staging, dir.path()).unwrap();

        let fetcher = offline();
        let resource = packed(dir.path(), "", &fetcher);
        assert_eq!(resource.clean(), ResourceChange::Applied);
        assert!(!staging.exists());
        assert!(!dir.path().join("gn").exists());
    }

    #[test]
    fn clean_is_noop_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = offline();
        let resource = plain(dir.path(), SHA1_A, &fetcher);
        assert_eq!(resource.clean(), ResourceChange::AlreadyCorrect);
    }

    #[test]
    fn clean_skips_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin/file")).unwrap();
        let fetcher = offline();
        let change = plain(dir.path(), SHA1_A, &fetcher).clean();
        assert!(matches!(change, ResourceChange::Skipped { .. }));
        assert!(dir.path().join("bin/file").is_dir());
    }
}
