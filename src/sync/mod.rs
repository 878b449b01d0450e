//! Orchestration of whole runs: sync, force-extract, clean and update.
//!
//! Every run starts by resolving the manifests under [`Context::root`]; a
//! resolution error aborts the run before any dependency is touched.  Past
//! that point one failing dependency never stops the others.
pub mod context;
pub mod gc;

pub use context::Context;

use crate::error::{EzdepsError, ManifestError};
use crate::logging::DepStatus;
use crate::manifest::{self, Dependency};
use crate::record::RecordSet;
use crate::resources::ResourceChange;
use crate::resources::dependency::DependencyResource;

/// Outcome of a run, split by what happened to each dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Dependencies that ended in their desired state, in manifest order.
    pub succeeded: Vec<Dependency>,
    /// Dependencies that failed, in manifest order.
    pub failed: Vec<Dependency>,
    /// Previously recorded dependencies deleted as orphans.
    pub removed: Vec<Dependency>,
}

impl RunReport {
    /// Whether no dependency failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Bring one dependency into its desired state.
///
/// Returns `true` on success.  Failures are logged with the dependency's
/// name and recorded for the summary; they never propagate.
#[must_use]
pub fn reconcile(ctx: &Context, dep: &Dependency, force_extract: bool) -> bool {
    let name = dep.display_name();
    let resource = DependencyResource::from_dependency(dep, &ctx.root, ctx.fetcher.as_ref())
        .with_force_extract(force_extract);

    match resource.reconcile() {
        Ok(ResourceChange::AlreadyCorrect) => {
            ctx.log.debug(&format!("{name} is up to date"));
            ctx.log.record(&name, DepStatus::Ok, None);
            true
        }
        Ok(_) => {
            ctx.log.info(&format!("synced {name}"));
            ctx.log.record(&name, DepStatus::Fetched, None);
            true
        }
        Err(e) => {
            ctx.log.error(&format!(
                "{name} (from {}): {e}",
                dep.source_manifest.display()
            ));
            ctx.log.record(&name, DepStatus::Failed, Some(&e.to_string()));
            false
        }
    }
}

/// Resolve, collect garbage, reconcile every dependency, and record the
/// ones that succeeded.
///
/// With `force_extract`, archives that are already valid are extracted
/// again.  A missing or corrupt record is treated as empty.  When nothing
/// succeeds the previous record is kept.
///
/// # Errors
///
/// Returns an error if resolution fails or the record cannot be written.
pub fn sync(ctx: &Context, force_extract: bool) -> Result<RunReport, EzdepsError> {
    let deps = manifest::resolve(&ctx.root, &ctx.platform)?;
    ctx.log.debug(&format!("resolved {} dependencies", deps.len()));

    let previous = RecordSet::load(&ctx.root).unwrap_or_else(|e| {
        ctx.log.warn(&format!("{e}; treating it as empty"));
        RecordSet::default()
    });

    let mut report = RunReport {
        removed: gc::collect(ctx, &previous.deps, &deps),
        ..RunReport::default()
    };

    ctx.log.stage(if force_extract {
        "Syncing dependencies (force extract)"
    } else {
        "Syncing dependencies"
    });
    for dep in deps {
        if reconcile(ctx, &dep, force_extract) {
            report.succeeded.push(dep);
        } else {
            report.failed.push(dep);
        }
    }

    if report.succeeded.is_empty() {
        if !report.failed.is_empty() {
            ctx.log.warn("nothing synced, keeping the previous record");
        }
    } else {
        RecordSet::new(report.succeeded.clone()).save(&ctx.root)?;
    }
    Ok(report)
}

/// Delete every resolved dependency and whatever its archive expanded into.
///
/// The record is neither read nor written.
///
/// # Errors
///
/// Returns an error only if resolution fails.
pub fn clean(ctx: &Context) -> Result<RunReport, ManifestError> {
    let deps = manifest::resolve(&ctx.root, &ctx.platform)?;
    let mut report = RunReport::default();

    ctx.log.stage("Cleaning dependencies");
    for dep in deps {
        let name = dep.display_name();
        let resource = DependencyResource::from_dependency(&dep, &ctx.root, ctx.fetcher.as_ref());
        match resource.clean() {
            ResourceChange::Applied => {
                ctx.log.info(&format!("deleted {name}"));
                ctx.log.record(&name, DepStatus::Removed, None);
                report.removed.push(dep);
            }
            ResourceChange::AlreadyCorrect => {
                ctx.log.debug(&format!("{name} is not present"));
                ctx.log.record(&name, DepStatus::Ok, Some("not present"));
                report.succeeded.push(dep);
            }
            ResourceChange::Skipped { reason } => {
                ctx.log.warn(&format!("{name} left in place: {reason}"));
                ctx.log.record(&name, DepStatus::Ok, Some(&reason));
                report.succeeded.push(dep);
            }
        }
    }
    Ok(report)
}

/// Re-download every resolved dependency without checking its checksum and
/// report the SHA-1 the server currently serves.
///
/// A changed checksum is logged as a warning naming the manifest to edit.
/// The record is neither read nor written.
///
/// # Errors
///
/// Returns an error only if resolution fails.
pub fn update(ctx: &Context) -> Result<RunReport, ManifestError> {
    let deps = manifest::resolve(&ctx.root, &ctx.platform)?;
    let mut report = RunReport::default();

    ctx.log.stage("Updating dependencies");
    for dep in deps {
        let name = dep.display_name();
        let resource = DependencyResource::from_dependency(&dep, &ctx.root, ctx.fetcher.as_ref());
        match resource.force_update() {
            Ok(sha1) => {
                ctx.log.info(&format!("{name}: sha1 {sha1}"));
                if sha1 != dep.sha1.to_lowercase() {
                    ctx.log.warn(&format!(
                        "{name}: sha1 changed from '{}' to '{sha1}', update {}",
                        dep.sha1,
                        dep.source_manifest.display()
                    ));
                }
                ctx.log.record(&name, DepStatus::Fetched, Some(&sha1));
                report.succeeded.push(dep);
            }
            Err(e) => {
                ctx.log.error(&format!("{name}: {e}"));
                ctx.log.record(&name, DepStatus::Failed, Some(&e.to_string()));
                report.failed.push(dep);
            }
        }
    }
    Ok(report)
}
