//! Core logging types: dependency outcomes and the [`Log`] trait.

/// Outcome of one dependency for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepEntry {
    /// Root-relative dependency name, e.g. `tools/gn.tar.xz`.
    pub name: String,
    /// What happened to the dependency.
    pub status: DepStatus,
    /// Optional detail (error description, fresh checksum).
    pub message: Option<String>,
}

/// What a run did to one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepStatus {
    /// Already in the desired state; nothing was done.
    Ok,
    /// Downloaded and/or extracted during this run.
    Fetched,
    /// Deleted (clean, or an orphan from a previous sync).
    Removed,
    /// Could not be brought into the desired state.
    Failed,
}

/// Abstraction over logging backends.
///
/// The orchestrator only talks to this trait, so tests can swap in a
/// recorder without installing a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a dependency outcome for the summary.
    fn record(&self, name: &str, status: DepStatus, message: Option<&str>);
}
