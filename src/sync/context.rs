//! Shared state for one run of the orchestrator.
use std::path::PathBuf;
use std::sync::Arc;

use crate::logging::Log;
use crate::platform::PlatformConfig;
use crate::resources::fetch::Fetcher;

/// Everything a sync, clean or update run needs besides the manifests.
pub struct Context {
    /// Directory holding the top-level `DEPS.toml`.
    pub root: PathBuf,
    /// Platform used to filter manifest entries.
    pub platform: PlatformConfig,
    /// Logger for output and outcome recording.
    pub log: Arc<dyn Log>,
    /// Source of remote artifacts.
    pub fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("fetcher", &"<dyn Fetcher>")
            .finish()
    }
}

impl Context {
    /// Create a new run context.
    #[must_use]
    pub fn new(
        root: PathBuf,
        platform: PlatformConfig,
        log: Arc<dyn Log>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            root,
            platform,
            log,
            fetcher,
        }
    }
}
