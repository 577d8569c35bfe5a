//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for key/value storage
//! (`localStorage`), response caching (Cache API), network fetches and window event broadcast.
//! On non-wasm targets every adapter degrades to an empty/no-op shim so the workspace builds and
//! tests natively.
//!
//! Bridge bindings are split by domain under `bridge/`:
//! - `bridge::cache`
//! - `bridge::fetch`
//! - `bridge::interop` (shared wasm/non-wasm transport glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod cache;
pub mod events;
pub mod network;
pub mod storage;

pub use adapters::{
    asset_fetcher, cache_storage, host_strategy_name, key_value_store, selected_host_strategy,
    AssetFetcherAdapter, CacheStorageAdapter, HostStrategy, KeyValueStoreAdapter,
};
pub use cache::cache_api::WebCacheStorage;
pub use events::dispatch_window_event;
pub use network::web_fetch::{capture_response, WebAssetFetcher};
pub use storage::local_storage::WebKeyValueStore;
