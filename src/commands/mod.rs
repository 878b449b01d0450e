//! One module per CLI action, plus the setup they share.
pub mod clean;
pub mod sync;
pub mod update;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config;
use crate::logging::{Log, Logger};
use crate::platform::PlatformConfig;
use crate::resources::fetch::HttpFetcher;
use crate::sync::Context;

/// Environment variable naming the sync root when `--dir` is absent.
pub const ROOT_ENV_VAR: &str = "EZDEPS_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Resolves the sync root and the platform so that each command does not
/// have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Canonical directory holding the top-level `DEPS.toml`.
    pub root: PathBuf,
    /// Platform for this run.
    pub platform: PlatformConfig,
}

impl CommandSetup {
    /// Resolve the root directory and the platform config.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist or the
    /// platform config cache cannot be read or written.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;
        log.debug(&format!("root: {}", root.display()));

        let platform =
            config::resolve_platform(&root, global.platform_overrides(), global.skip_config)?;
        log.info(&format!("platform: {platform}"));

        Ok(Self { root, platform })
    }

    /// Build the orchestrator context, fetching over HTTP.
    #[must_use]
    pub fn context(&self, log: &Arc<Logger>) -> Context {
        let log: Arc<dyn Log> = log.clone();
        Context::new(
            self.root.clone(),
            self.platform,
            log,
            Arc::new(HttpFetcher::new()),
        )
    }
}

/// Pick the sync root: `--dir`, then `$EZDEPS_ROOT`, then the current
/// directory.
///
/// # Errors
///
/// Returns an error if the chosen directory cannot be canonicalized.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = match (&global.dir, std::env::var_os(ROOT_ENV_VAR)) {
        (Some(dir), _) => dir.clone(),
        (None, Some(env)) if !env.is_empty() => PathBuf::from(env),
        _ => std::env::current_dir().context("cannot determine current directory")?,
    };
    dunce::canonicalize(&root)
        .with_context(|| format!("cannot access root directory {}", root.display()))
}

/// Print the summary and bail if any dependency recorded a failure.
///
/// # Errors
///
/// Returns an error if one or more dependencies failed.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} dependency(ies) failed");
    }
    Ok(())
}
