//! Remote artifact retrieval.
use std::path::Path;

use super::error::ResourceError;
use super::helpers::fs::{ensure_parent_dir, remove_existing};

/// Retrieves the full body behind a URL.
///
/// Abstracted so reconciliation can be tested without a network.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Network`] if the host is unreachable or the
    /// response status is not a success.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError>;
}

/// [`Fetcher`] backed by a blocking HTTP agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher with the agent's stock timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
        let network = |reason: String| ResourceError::Network {
            url: url.to_string(),
            reason,
        };
        let mut response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => network(format!("http status {code}")),
            other => network(other.to_string()),
        })?;
        response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| network(e.to_string()))
    }
}

/// Download `url` to `dest`.
///
/// Parent directories are created before the request goes out.  An
/// existing file at `dest` is replaced only once the body has been received
/// in full; a failed write removes the partial file.
///
/// # Errors
///
/// Returns an error if the fetch fails or the file cannot be written.
pub fn download(fetcher: &dyn Fetcher, url: &str, dest: &Path) -> Result<(), ResourceError> {
    ensure_parent_dir(dest)?;
    tracing::info!("downloading {url}");
    let body = fetcher.fetch(url)?;
    if let Err(e) = std::fs::write(dest, &body) {
        if let Err(cleanup) = remove_existing(dest) {
            tracing::debug!("cannot remove partial download: {cleanup}");
        }
        return Err(ResourceError::io(dest, e));
    }
    tracing::debug!("wrote {} bytes to {}", body.len(), dest.display());
    Ok(())
}
