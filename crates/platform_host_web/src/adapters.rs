use platform_host::{
    AssetFetchFuture, AssetFetcher, AssetRequest, AssetResponse, CacheStorage,
    CacheStorageFuture, KeyValueStore, MemoryKeyValueStore, NoopAssetFetcher, NoopCacheStorage,
};

use crate::{WebAssetFetcher, WebCacheStorage, WebKeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters (`localStorage`, Cache API, `fetch`).
    Browser,
    /// In-process stand-ins used for headless builds: session-only storage, no cache, no network.
    Stub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Stub => "stub",
    }
}

/// Adapter enum that erases the concrete key/value backend behind [`KeyValueStore`].
#[derive(Debug, Clone)]
pub enum KeyValueStoreAdapter {
    /// Browser `localStorage`.
    Browser(WebKeyValueStore),
    /// Session-only in-memory storage.
    Stub(MemoryKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.get_item(key),
            Self::Stub(store) => store.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.set_item(key, value),
            Self::Stub(store) => store.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.remove_item(key),
            Self::Stub(store) => store.remove_item(key),
        }
    }
}

/// Adapter enum that erases the concrete cache backend behind [`CacheStorage`].
#[derive(Debug, Clone, Copy)]
pub enum CacheStorageAdapter {
    /// Browser Cache API.
    Browser(WebCacheStorage),
    /// No-op fallback.
    Stub(NoopCacheStorage),
}

impl CacheStorage for CacheStorageAdapter {
    fn match_key<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
    ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>> {
        match self {
            Self::Browser(storage) => storage.match_key(cache_name, key),
            Self::Stub(storage) => storage.match_key(cache_name, key),
        }
    }

    fn put<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
        response: &'a AssetResponse,
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(storage) => storage.put(cache_name, key, response),
            Self::Stub(storage) => storage.put(cache_name, key, response),
        }
    }

    fn put_all<'a>(
        &'a self,
        cache_name: &'a str,
        entries: &'a [(String, AssetResponse)],
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(storage) => storage.put_all(cache_name, entries),
            Self::Stub(storage) => storage.put_all(cache_name, entries),
        }
    }

    fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>> {
        match self {
            Self::Browser(storage) => storage.cache_names(),
            Self::Stub(storage) => storage.cache_names(),
        }
    }

    fn delete_cache<'a>(
        &'a self,
        cache_name: &'a str,
    ) -> CacheStorageFuture<'a, Result<bool, String>> {
        match self {
            Self::Browser(storage) => storage.delete_cache(cache_name),
            Self::Stub(storage) => storage.delete_cache(cache_name),
        }
    }
}

/// Adapter enum that erases the concrete network backend behind [`AssetFetcher`].
#[derive(Debug, Clone, Copy)]
pub enum AssetFetcherAdapter {
    /// Browser `fetch`.
    Browser(WebAssetFetcher),
    /// Always-offline fallback.
    Stub(NoopAssetFetcher),
}

impl AssetFetcher for AssetFetcherAdapter {
    fn fetch<'a>(
        &'a self,
        request: &'a AssetRequest,
    ) -> AssetFetchFuture<'a, Result<AssetResponse, String>> {
        match self {
            Self::Browser(fetcher) => fetcher.fetch(request),
            Self::Stub(fetcher) => fetcher.fetch(request),
        }
    }
}

/// Builds the key/value storage adapter for the compile-time selected host strategy.
pub fn key_value_store() -> KeyValueStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => KeyValueStoreAdapter::Browser(WebKeyValueStore),
        HostStrategy::Stub => KeyValueStoreAdapter::Stub(MemoryKeyValueStore::default()),
    }
}

/// Builds the cache-storage adapter for the compile-time selected host strategy.
pub fn cache_storage() -> CacheStorageAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => CacheStorageAdapter::Browser(WebCacheStorage),
        HostStrategy::Stub => CacheStorageAdapter::Stub(NoopCacheStorage),
    }
}

/// Builds the network adapter for the compile-time selected host strategy.
pub fn asset_fetcher() -> AssetFetcherAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => AssetFetcherAdapter::Browser(WebAssetFetcher),
        HostStrategy::Stub => AssetFetcherAdapter::Stub(NoopAssetFetcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "host-stub"))]
    #[test]
    fn default_build_selects_browser_adapters() {
        assert_eq!(selected_host_strategy(), HostStrategy::Browser);
        assert_eq!(host_strategy_name(), "browser");
        assert!(matches!(key_value_store(), KeyValueStoreAdapter::Browser(_)));
        assert!(matches!(cache_storage(), CacheStorageAdapter::Browser(_)));
        assert!(matches!(asset_fetcher(), AssetFetcherAdapter::Browser(_)));
    }

    #[cfg(feature = "host-stub")]
    #[test]
    fn stub_build_keeps_values_for_the_session() {
        let store = key_value_store();
        store.set_item("k", "v").expect("set");
        assert_eq!(store.get_item("k").expect("get"), Some("v".to_string()));
        assert_eq!(host_strategy_name(), "stub");
    }
}
