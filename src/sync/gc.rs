//! Garbage collection of dependencies dropped from the manifests.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::context::Context;
use crate::logging::DepStatus;
use crate::manifest::Dependency;
use crate::resources::ResourceChange;
use crate::resources::dependency::DependencyResource;

/// Recorded dependencies whose download path no longer appears in
/// `current`.  Each orphaned path is reported once, in record order.
#[must_use]
pub fn orphans<'a>(
    previous: &'a [Dependency],
    current: &[Dependency],
    root: &Path,
) -> Vec<&'a Dependency> {
    let wanted: HashSet<PathBuf> = current.iter().map(|d| d.download_path(root)).collect();
    let mut seen = HashSet::new();
    previous
        .iter()
        .filter(|d| {
            let path = d.download_path(root);
            !wanted.contains(&path) && seen.insert(path)
        })
        .collect()
}

/// Delete every orphan and return the ones that were actually removed.
///
/// Cleanup never fails the run: problems are logged as warnings.
#[must_use]
pub fn collect(ctx: &Context, previous: &[Dependency], current: &[Dependency]) -> Vec<Dependency> {
    let orphaned = orphans(previous, current, &ctx.root);
    if orphaned.is_empty() {
        return Vec::new();
    }

    ctx.log.stage("Removing unreferenced dependencies");
    let mut removed = Vec::new();
    for dep in orphaned {
        let name = dep.display_name();
        let resource = DependencyResource::from_dependency(dep, &ctx.root, ctx.fetcher.as_ref());
        match resource.clean() {
            ResourceChange::Applied => {
                ctx.log.info(&format!("removed {name}"));
                ctx.log.record(&name, DepStatus::Removed, None);
                removed.push(dep.clone());
            }
            ResourceChange::AlreadyCorrect => {
                ctx.log.debug(&format!("{name} is already gone"));
            }
            ResourceChange::Skipped { reason } => {
                ctx.log.warn(&format!("cannot remove {name}: {reason}"));
            }
        }
    }
    removed
}
