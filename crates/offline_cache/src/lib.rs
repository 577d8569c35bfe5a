//! Offline asset cache for the notes app service worker.
//!
//! One versioned cache generation is current at any time. [`CacheManager::install`] commits the
//! static manifest into it all-or-nothing, [`CacheManager::activate`] deletes every other
//! generation, and [`CacheManager::handle_fetch`] answers requests cache-first with write-through
//! population of same-origin `200` responses.
//!
//! Storage and network access go through the [`platform_host::CacheStorage`] and
//! [`platform_host::AssetFetcher`] capabilities so the lifecycle can be exercised without a
//! browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod config;
mod error;
mod lifecycle;
mod manager;

pub use config::{CacheConfig, CacheManifest, DEFAULT_CACHE_NAME, DEFAULT_MANIFEST};
pub use error::CacheError;
pub use lifecycle::{ActivateOutcome, FetchOutcome, FetchSource, InstallOutcome, WorkerPhase};
pub use manager::CacheManager;
