//! Cache API-backed response cache implementation.

use platform_host::{AssetResponse, CacheStorage, CacheStorageFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Browser cache storage backed by the global `caches` object.
pub struct WebCacheStorage;

impl CacheStorage for WebCacheStorage {
    fn match_key<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
    ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>> {
        Box::pin(async move { crate::bridge::cache_match(cache_name, key).await })
    }

    fn put<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
        response: &'a AssetResponse,
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::cache_put(cache_name, key, response).await })
    }

    fn put_all<'a>(
        &'a self,
        cache_name: &'a str,
        entries: &'a [(String, AssetResponse)],
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async move { crate::bridge::cache_put_all(cache_name, entries).await })
    }

    fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>> {
        Box::pin(async move { crate::bridge::cache_names().await })
    }

    fn delete_cache<'a>(
        &'a self,
        cache_name: &'a str,
    ) -> CacheStorageFuture<'a, Result<bool, String>> {
        Box::pin(async move { crate::bridge::cache_delete(cache_name).await })
    }
}
