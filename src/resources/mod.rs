//! Idempotent resource primitives (check + apply pattern).
//!
//! The leaf modules ([`checksum`], [`archive`], [`fetch`]) are plain
//! functions; [`dependency`] combines them into one reconcilable artifact.
pub mod archive;
pub mod checksum;
pub mod dependency;
pub mod error;
pub mod fetch;
pub mod helpers;

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use ezdeps_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "da39a3ee5e6b4b0d3255bfef95601890afd80709".into() };
/// let skip = ResourceState::Invalid { reason: "a directory occupies the download path".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., a directory sits where a file belongs).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use ezdeps_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "permission denied".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g., the path is occupied by a directory).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}
