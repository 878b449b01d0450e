//! Command: delete every dependency.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if setup or manifest resolution fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let report = crate::sync::clean(&setup.context(log))?;
    log.debug(&format!("{} deleted", report.removed.len()));
    super::finish(log)
}
