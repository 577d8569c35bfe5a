use thiserror::Error;

use crate::lifecycle::WorkerPhase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by the offline cache manager.
pub enum CacheError {
    /// A manifest asset could not be fetched (or answered with a non-ok status) during install.
    /// Nothing from the attempt was committed.
    #[error("install aborted: manifest asset `{url}` unavailable: {reason}")]
    InstallFetch {
        /// Resolved URL of the failing asset.
        url: String,
        /// Network error or HTTP status description.
        reason: String,
    },
    /// The host cache storage rejected an operation.
    #[error("cache storage failure: {0}")]
    Storage(String),
    /// A runtime fetch missed the cache and the network fetch failed.
    #[error("network fetch for `{url}` failed: {reason}")]
    Network {
        /// Requested URL.
        url: String,
        /// Network error description.
        reason: String,
    },
    /// A lifecycle operation was invoked out of order.
    #[error("cannot {operation} while worker is {phase}")]
    InvalidPhase {
        /// Attempted operation.
        operation: &'static str,
        /// Phase at the time of the call.
        phase: WorkerPhase,
    },
    /// Cache configuration is unusable.
    #[error("invalid cache configuration: {0}")]
    Config(String),
}
