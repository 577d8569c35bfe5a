//! Service-worker lifecycle phases and the outcomes reported to the host integration.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Lifecycle phase of one worker instance.
///
/// A new deployed version starts a fresh instance in [`WorkerPhase::Installing`].
pub enum WorkerPhase {
    /// Manifest not yet committed. A failed install stays here until retried.
    #[default]
    Installing,
    /// Manifest committed and activation requested; stale generations may still exist and open
    /// pages are not yet controlled.
    ActiveOld,
    /// Stale generations purged and open pages claimed.
    ActiveCurrent,
}

impl WorkerPhase {
    /// Returns a stable lower-case token for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::ActiveOld => "active-old",
            Self::ActiveCurrent => "active-current",
        }
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a committed install.
pub struct InstallOutcome {
    /// Cache generation the manifest was committed into.
    pub cache_name: String,
    /// Number of distinct request keys stored.
    pub cached_assets: usize,
    /// The host should call `skipWaiting()` so the instance activates without waiting for old
    /// tabs to close.
    pub skip_waiting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of an activation.
pub struct ActivateOutcome {
    /// Generation kept as current.
    pub current: String,
    /// Generations deleted, in enumeration order.
    pub purged: Vec<String>,
    /// The host should call `clients.claim()` so already-open pages are controlled immediately.
    pub claim_clients: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a handled fetch was answered from.
pub enum FetchSource {
    /// Served from the current generation without touching the network.
    Cache,
    /// Served from the network. `stored` tells whether a copy was written through to the cache.
    Network {
        /// Whether the response was written into the current generation.
        stored: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Response produced by the fetch handler along with its source.
pub struct FetchOutcome {
    /// Response to hand back to the page.
    pub response: platform_host::AssetResponse,
    /// Cache or network.
    pub source: FetchSource,
}
