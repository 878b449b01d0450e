//! Command: re-download every dependency and report fresh checksums.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the update command.
///
/// # Errors
///
/// Returns an error if setup or manifest resolution fails, or if any
/// download failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    crate::sync::update(&setup.context(log))?;
    super::finish(log)
}
