//! SHA-1 content verification for local artifacts.
use std::fmt::Write as _;
use std::path::Path;

use sha1::{Digest, Sha1};

/// Outcome of comparing a file against an expected checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The file exists and hashes to the expected value.
    Match,
    /// The file exists but hashes to something else.
    Mismatch {
        /// Digest actually computed.
        actual: String,
    },
    /// Nothing hashable lives at the path (missing, or not a regular file).
    NotFound,
}

/// Compute the lowercase hex SHA-1 digest of the file at `path`.
///
/// Returns `None` when `path` does not exist, is not a regular file (a
/// directory reports "no digest" rather than an error), or cannot be read.
#[must_use]
pub fn digest(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let mut file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("cannot open {} for hashing: {e}", path.display());
            return None;
        }
    };
    let mut hasher = Sha1::new();
    if let Err(e) = std::io::copy(&mut file, &mut hasher) {
        tracing::debug!("cannot hash {}: {e}", path.display());
        return None;
    }
    let result = hasher.finalize();
    let mut hex = String::with_capacity(40);
    for b in &result {
        write!(hex, "{b:02x}").unwrap_or(());
    }
    Some(hex)
}

/// Compare the file at `path` against `expected` (case-insensitive).
#[must_use]
pub fn verify(path: &Path, expected: &str) -> Verification {
    match digest(path) {
        None => Verification::NotFound,
        Some(actual) if actual == expected.to_lowercase() => Verification::Match,
        Some(actual) => Verification::Mismatch { actual },
    }
}

/// Return `true` if the file at `path` hashes to `expected`.
///
/// By convention an absent path matches an empty `expected`, so "nothing
/// here" can be asserted with the same call.  Use [`verify`] when absence
/// has to be told apart from a match.
#[must_use]
pub fn matches(path: &Path, expected: &str) -> bool {
    match verify(path, expected) {
        Verification::Match => true,
        Verification::NotFound => expected.is_empty(),
        Verification::Mismatch { .. } => false,
    }
}
