//! Commands: `sync` and `force-extract`.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the sync command.  With `force_extract`, archives that are already
/// up to date are extracted again.
///
/// # Errors
///
/// Returns an error if setup, manifest resolution or the record write
/// fails, or if any dependency failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>, force_extract: bool) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.context(log);

    let report = crate::sync::sync(&ctx, force_extract)?;
    log.debug(&format!(
        "{} synced, {} failed, {} orphan(s) removed",
        report.succeeded.len(),
        report.failed.len(),
        report.removed.len()
    ));

    super::finish(log)
}
