//! Typed host-domain contracts and shared models used by the notes core and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! key/value storage capability behind note persistence, the asynchronous cache-storage and
//! network-fetch capabilities behind offline asset caching, and time helpers. Concrete browser
//! adapters live in `platform_host_web`; in-memory adapters here back tests and non-browser
//! targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod network;
pub mod storage;
pub mod time;

pub use cache::{CacheStorage, CacheStorageFuture, MemoryCacheStorage, NoopCacheStorage};
pub use network::{
    AssetFetchFuture, AssetFetcher, AssetRequest, AssetResponse, MemoryAssetFetcher,
    NoopAssetFetcher, RequestMethod, ResponseType,
};
pub use storage::{KeyValueStore, MemoryKeyValueStore};
pub use time::{
    iso_timestamp_from_ms, next_monotonic_timestamp_ms, parse_iso_timestamp_ms, unix_time_ms_now,
};
