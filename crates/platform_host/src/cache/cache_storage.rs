//! Named response-cache service contracts and adapters.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use crate::network::AssetResponse;

/// Object-safe boxed future used by [`CacheStorage`] async methods.
pub type CacheStorageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host cache storage: a set of named caches, each mapping request keys to responses.
pub trait CacheStorage {
    /// Looks up the response stored under `key` in `cache_name`.
    fn match_key<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
    ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>>;

    /// Stores `response` under `key` in `cache_name`, creating the cache when missing.
    fn put<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
        response: &'a AssetResponse,
    ) -> CacheStorageFuture<'a, Result<(), String>>;

    /// Stores every entry into `cache_name` as one unit: either all entries land or none do.
    fn put_all<'a>(
        &'a self,
        cache_name: &'a str,
        entries: &'a [(String, AssetResponse)],
    ) -> CacheStorageFuture<'a, Result<(), String>>;

    /// Lists the names of every existing cache.
    fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>>;

    /// Deletes a whole cache. Resolves to `true` when a cache was removed.
    fn delete_cache<'a>(
        &'a self,
        cache_name: &'a str,
    ) -> CacheStorageFuture<'a, Result<bool, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op cache storage for unsupported targets and baseline tests.
pub struct NoopCacheStorage;

impl CacheStorage for NoopCacheStorage {
    fn match_key<'a>(
        &'a self,
        _cache_name: &'a str,
        _key: &'a str,
    ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn put<'a>(
        &'a self,
        _cache_name: &'a str,
        _key: &'a str,
        _response: &'a AssetResponse,
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn put_all<'a>(
        &'a self,
        _cache_name: &'a str,
        _entries: &'a [(String, AssetResponse)],
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn delete_cache<'a>(
        &'a self,
        _cache_name: &'a str,
    ) -> CacheStorageFuture<'a, Result<bool, String>> {
        Box::pin(async { Ok(false) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory cache storage keyed by cache name, then request key.
pub struct MemoryCacheStorage {
    inner: Rc<RefCell<BTreeMap<String, HashMap<String, AssetResponse>>>>,
}

impl MemoryCacheStorage {
    /// Returns the number of entries held by `cache_name` (zero when the cache is missing).
    pub fn entry_count(&self, cache_name: &str) -> usize {
        self.inner
            .borrow()
            .get(cache_name)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Returns whether a cache named `cache_name` exists.
    pub fn has_cache(&self, cache_name: &str) -> bool {
        self.inner.borrow().contains_key(cache_name)
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn match_key<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
    ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>> {
        Box::pin(async move {
            Ok(self
                .inner
                .borrow()
                .get(cache_name)
                .and_then(|cache| cache.get(key))
                .cloned())
        })
    }

    fn put<'a>(
        &'a self,
        cache_name: &'a str,
        key: &'a str,
        response: &'a AssetResponse,
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .entry(cache_name.to_string())
                .or_default()
                .insert(key.to_string(), response.clone());
            Ok(())
        })
    }

    fn put_all<'a>(
        &'a self,
        cache_name: &'a str,
        entries: &'a [(String, AssetResponse)],
    ) -> CacheStorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut caches = self.inner.borrow_mut();
            let cache = caches.entry(cache_name.to_string()).or_default();
            for (key, response) in entries {
                cache.insert(key.clone(), response.clone());
            }
            Ok(())
        })
    }

    fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().keys().cloned().collect()) })
    }

    fn delete_cache<'a>(
        &'a self,
        cache_name: &'a str,
    ) -> CacheStorageFuture<'a, Result<bool, String>> {
        Box::pin(async move { Ok(self.inner.borrow_mut().remove(cache_name).is_some()) })
    }
}
