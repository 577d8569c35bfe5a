//! Cache-first offline manager driving one worker instance through install, activate and fetch.

use std::cell::Cell;

use futures::future::join_all;
use leptos::logging;
use platform_host::{AssetFetcher, AssetRequest, AssetResponse, CacheStorage, ResponseType};

use crate::{
    ActivateOutcome, CacheConfig, CacheError, CacheManifest, FetchOutcome, FetchSource,
    InstallOutcome, WorkerPhase,
};

/// Owns the current cache generation for one worker instance.
///
/// The host platform integration calls [`CacheManager::install`], [`CacheManager::activate`] and
/// [`CacheManager::handle_fetch`] from its lifecycle events; the manager itself never registers
/// for platform events.
pub struct CacheManager<C, F> {
    config: CacheConfig,
    cache: C,
    fetcher: F,
    phase: Cell<WorkerPhase>,
}

impl<C: CacheStorage, F: AssetFetcher> CacheManager<C, F> {
    /// Creates a manager in [`WorkerPhase::Installing`].
    pub fn new(config: CacheConfig, cache: C, fetcher: F) -> Self {
        Self {
            config,
            cache,
            fetcher,
            phase: Cell::new(WorkerPhase::Installing),
        }
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> WorkerPhase {
        self.phase.get()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the version tag of the current generation.
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    /// Installs the configured manifest. See [`CacheManager::install_manifest`].
    ///
    /// # Errors
    ///
    /// Same as [`CacheManager::install_manifest`].
    pub async fn install(&self) -> Result<InstallOutcome, CacheError> {
        let manifest = self.config.manifest.clone();
        self.install_manifest(&manifest).await
    }

    /// Fetches every manifest asset and commits them into the current generation as one unit.
    ///
    /// All fetches run concurrently. If any of them fails or answers with a status outside
    /// `200..=299`, nothing is stored and the instance stays in [`WorkerPhase::Installing`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InstallFetch`] for the first failing asset in manifest order,
    /// [`CacheError::Storage`] when the commit fails, and [`CacheError::InvalidPhase`] when the
    /// instance has already installed.
    pub async fn install_manifest(
        &self,
        manifest: &CacheManifest,
    ) -> Result<InstallOutcome, CacheError> {
        self.config.validate()?;
        if self.phase() != WorkerPhase::Installing {
            return Err(CacheError::InvalidPhase {
                operation: "install",
                phase: self.phase(),
            });
        }

        let requests: Vec<AssetRequest> = manifest
            .assets()
            .iter()
            .map(|path| AssetRequest::get(self.config.resolve(path)))
            .collect();
        let results = join_all(requests.iter().map(|request| self.fetcher.fetch(request))).await;

        let mut entries: Vec<(String, AssetResponse)> = Vec::with_capacity(requests.len());
        for (request, result) in requests.iter().zip(results) {
            let response = result.map_err(|reason| CacheError::InstallFetch {
                url: request.url.clone(),
                reason,
            })?;
            if !response.is_ok() {
                return Err(CacheError::InstallFetch {
                    url: request.url.clone(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            let key = request.cache_key().to_string();
            if !entries.iter().any(|(existing, _)| existing == &key) {
                entries.push((key, response));
            }
        }

        self.cache
            .put_all(self.cache_name(), &entries)
            .await
            .map_err(CacheError::Storage)?;

        self.phase.set(WorkerPhase::ActiveOld);
        logging::log!(
            "offline cache `{}` installed with {} assets",
            self.cache_name(),
            entries.len()
        );
        Ok(InstallOutcome {
            cache_name: self.cache_name().to_string(),
            cached_assets: entries.len(),
            skip_waiting: true,
        })
    }

    /// Deletes every cache generation other than the current one and requests control of open
    /// pages.
    ///
    /// Calling it again once active re-runs the purge.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidPhase`] before a successful install and
    /// [`CacheError::Storage`] when enumeration or deletion fails.
    pub async fn activate(&self) -> Result<ActivateOutcome, CacheError> {
        if self.phase() == WorkerPhase::Installing {
            return Err(CacheError::InvalidPhase {
                operation: "activate",
                phase: self.phase(),
            });
        }

        let names = self.cache.cache_names().await.map_err(CacheError::Storage)?;
        let mut purged = Vec::new();
        for name in names.into_iter().filter(|name| name != self.cache_name()) {
            self.cache
                .delete_cache(&name)
                .await
                .map_err(CacheError::Storage)?;
            logging::log!("offline cache purged stale generation `{name}`");
            purged.push(name);
        }

        self.phase.set(WorkerPhase::ActiveCurrent);
        Ok(ActivateOutcome {
            current: self.cache_name().to_string(),
            purged,
            claim_clients: true,
        })
    }

    /// Answers one outgoing request, cache first.
    ///
    /// A hit is returned without network access. On a miss the network response is returned,
    /// and written through to the current generation when it is a same-origin (`basic`) `200`.
    /// Non-`GET` requests always go to the network and are never stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Network`] when the request misses the cache and the network fetch
    /// fails. No offline fallback response is synthesized.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<FetchOutcome, CacheError> {
        if let Some(response) = self.lookup(request).await {
            return Ok(FetchOutcome {
                response,
                source: FetchSource::Cache,
            });
        }

        let response =
            self.fetcher
                .fetch(request)
                .await
                .map_err(|reason| CacheError::Network {
                    url: request.url.clone(),
                    reason,
                })?;

        let stored = self.write_through(request, &response).await;
        Ok(FetchOutcome {
            response,
            source: FetchSource::Network { stored },
        })
    }

    /// Returns the current generation's entry for `request`, if any.
    ///
    /// Non-`GET` requests never hit. A failing cache read is logged and treated as a miss.
    pub async fn lookup(&self, request: &AssetRequest) -> Option<AssetResponse> {
        if !request.is_cacheable() {
            return None;
        }
        match self
            .cache
            .match_key(self.cache_name(), request.cache_key())
            .await
        {
            Ok(found) => found,
            Err(err) => {
                logging::warn!("offline cache lookup for `{}` failed: {err}", request.url);
                None
            }
        }
    }

    /// Stores a network `response` for `request` when it is a `GET` answered by a same-origin
    /// (`basic`) `200`. Returns whether an entry was written.
    ///
    /// Write failures are logged and reported as `false`.
    pub async fn write_through(&self, request: &AssetRequest, response: &AssetResponse) -> bool {
        if !request.is_cacheable() || !should_store(response) {
            return false;
        }
        match self
            .cache
            .put(self.cache_name(), request.cache_key(), response)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                logging::warn!("offline cache write-through for `{}` failed: {err}", request.url);
                false
            }
        }
    }
}

fn should_store(response: &AssetResponse) -> bool {
    response.status == 200 && response.response_type == ResponseType::Basic
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use platform_host::{
        CacheStorageFuture, MemoryAssetFetcher, MemoryCacheStorage, RequestMethod,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn routed_fetcher(config: &CacheConfig) -> MemoryAssetFetcher {
        let fetcher = MemoryAssetFetcher::default();
        for path in config.manifest.assets() {
            fetcher.route(config.resolve(path), AssetResponse::ok(format!("asset {path}")));
        }
        fetcher
    }

    fn installed_manager(
        config: CacheConfig,
    ) -> (
        CacheManager<MemoryCacheStorage, MemoryAssetFetcher>,
        MemoryCacheStorage,
        MemoryAssetFetcher,
    ) {
        let cache = MemoryCacheStorage::default();
        let fetcher = routed_fetcher(&config);
        let manager = CacheManager::new(config, cache.clone(), fetcher.clone());
        block_on(manager.install()).expect("install");
        (manager, cache, fetcher)
    }

    #[test]
    fn install_commits_manifest_and_requests_eager_activation() {
        let config = CacheConfig::default();
        let cache = MemoryCacheStorage::default();
        let fetcher = routed_fetcher(&config);
        let manager = CacheManager::new(config, cache.clone(), fetcher.clone());
        assert_eq!(manager.phase(), WorkerPhase::Installing);

        let outcome = block_on(manager.install()).expect("install");

        assert_eq!(
            outcome,
            InstallOutcome {
                cache_name: "notes-app-v1".to_string(),
                cached_assets: 8,
                skip_waiting: true,
            }
        );
        assert_eq!(cache.entry_count("notes-app-v1"), 8);
        assert_eq!(fetcher.call_count(), 8);
        assert_eq!(manager.phase(), WorkerPhase::ActiveOld);
    }

    #[test]
    fn install_with_unreachable_asset_commits_nothing() {
        let config = CacheConfig {
            manifest: CacheManifest::new(["/", "/css/style.css", "/js/app.js"]),
            ..CacheConfig::default()
        };
        let cache = MemoryCacheStorage::default();
        let fetcher = MemoryAssetFetcher::default();
        fetcher.route("/", AssetResponse::ok("doc"));
        fetcher.route("/css/style.css", AssetResponse::ok("css"));
        fetcher.fail("/js/app.js", "connection reset");
        let manager = CacheManager::new(config, cache.clone(), fetcher);

        let err = block_on(manager.install()).expect_err("install should fail");

        assert_eq!(
            err,
            CacheError::InstallFetch {
                url: "/js/app.js".to_string(),
                reason: "connection reset".to_string(),
            }
        );
        assert!(!cache.has_cache("notes-app-v1"));
        assert_eq!(manager.phase(), WorkerPhase::Installing);
        assert!(matches!(
            block_on(manager.activate()),
            Err(CacheError::InvalidPhase { operation: "activate", .. })
        ));
    }

    #[test]
    fn install_treats_error_status_as_failure_and_can_retry() {
        let config = CacheConfig {
            manifest: CacheManifest::new(["/", "/manifest.json"]),
            ..CacheConfig::default()
        };
        let cache = MemoryCacheStorage::default();
        let fetcher = MemoryAssetFetcher::default();
        fetcher.route("/", AssetResponse::ok("doc"));
        fetcher.route("/manifest.json", AssetResponse::with_status(404, ""));
        let manager = CacheManager::new(config, cache.clone(), fetcher.clone());

        assert_eq!(
            block_on(manager.install()).expect_err("404 aborts install"),
            CacheError::InstallFetch {
                url: "/manifest.json".to_string(),
                reason: "HTTP 404".to_string(),
            }
        );
        assert_eq!(cache.entry_count("notes-app-v1"), 0);

        fetcher.route("/manifest.json", AssetResponse::ok("{}"));
        let outcome = block_on(manager.install()).expect("retry succeeds");
        assert_eq!(outcome.cached_assets, 2);
        assert!(matches!(
            block_on(manager.install()),
            Err(CacheError::InvalidPhase { operation: "install", .. })
        ));
    }

    #[test]
    fn install_resolves_manifest_against_origin() {
        let config = CacheConfig {
            manifest: CacheManifest::new(["/", "/js/app.js"]),
            ..CacheConfig::default()
        }
        .with_origin("https://notes.local");
        let (manager, cache, fetcher) = installed_manager(config);

        assert_eq!(
            fetcher
                .calls()
                .into_iter()
                .map(|request| request.url)
                .collect::<Vec<_>>(),
            vec![
                "https://notes.local/".to_string(),
                "https://notes.local/js/app.js".to_string()
            ]
        );
        assert_eq!(cache.entry_count(manager.cache_name()), 2);
    }

    #[test]
    fn activate_purges_every_other_generation() {
        let cache = MemoryCacheStorage::default();
        block_on(cache.put("notes-app-v1", "/", &AssetResponse::ok("old root"))).expect("seed");
        block_on(cache.put("unrelated", "/x", &AssetResponse::ok("x"))).expect("seed");

        let config = CacheConfig {
            cache_name: "notes-app-v2".to_string(),
            ..CacheConfig::default()
        };
        let fetcher = routed_fetcher(&config);
        let manager = CacheManager::new(config, cache.clone(), fetcher);
        block_on(manager.install()).expect("install");

        let outcome = block_on(manager.activate()).expect("activate");

        assert_eq!(
            outcome,
            ActivateOutcome {
                current: "notes-app-v2".to_string(),
                purged: vec!["notes-app-v1".to_string(), "unrelated".to_string()],
                claim_clients: true,
            }
        );
        assert_eq!(
            block_on(cache.cache_names()).expect("names"),
            vec!["notes-app-v2".to_string()]
        );
        assert_eq!(manager.phase(), WorkerPhase::ActiveCurrent);

        let again = block_on(manager.activate()).expect("activate again");
        assert!(again.purged.is_empty());
    }

    #[test]
    fn cached_manifest_assets_never_touch_the_network() {
        let (manager, _cache, fetcher) = installed_manager(CacheConfig::default());
        block_on(manager.activate()).expect("activate");
        let before = fetcher.call_count();
        fetcher.go_offline();

        for path in CacheConfig::default().manifest.assets() {
            let outcome =
                block_on(manager.handle_fetch(&AssetRequest::get(path.clone()))).expect("hit");
            assert_eq!(outcome.source, FetchSource::Cache);
            assert_eq!(outcome.response.body, format!("asset {path}").into_bytes());
        }
        assert_eq!(fetcher.call_count(), before);
    }

    #[test]
    fn fragment_is_ignored_for_cache_lookup() {
        let (manager, _cache, fetcher) = installed_manager(CacheConfig::default());
        fetcher.go_offline();
        let outcome = block_on(manager.handle_fetch(&AssetRequest::get("/index.html#notes")))
            .expect("hit");
        assert_eq!(outcome.source, FetchSource::Cache);
    }

    #[test]
    fn basic_ok_miss_is_written_through_and_then_hits() {
        let (manager, cache, fetcher) = installed_manager(CacheConfig::default());
        fetcher.route("/notes/today", AssetResponse::ok("fresh"));
        let request = AssetRequest::get("/notes/today");

        let first = block_on(manager.handle_fetch(&request)).expect("miss");
        assert_eq!(first.source, FetchSource::Network { stored: true });
        assert_eq!(cache.entry_count("notes-app-v1"), 9);

        fetcher.go_offline();
        let second = block_on(manager.handle_fetch(&request)).expect("hit");
        assert_eq!(second.source, FetchSource::Cache);
        assert_eq!(second.response, first.response);
    }

    #[test]
    fn non_basic_or_non_200_responses_are_returned_uncached() {
        let (manager, cache, fetcher) = installed_manager(CacheConfig::default());
        fetcher.route(
            "https://cdn.example/font.woff2",
            AssetResponse::ok("").with_type(ResponseType::Opaque),
        );
        fetcher.route("/missing", AssetResponse::with_status(404, "nope"));
        fetcher.route("/partial", AssetResponse::with_status(206, "part"));

        for url in ["https://cdn.example/font.woff2", "/missing", "/partial"] {
            let outcome =
                block_on(manager.handle_fetch(&AssetRequest::get(url))).expect("network");
            assert_eq!(outcome.source, FetchSource::Network { stored: false });
        }
        assert_eq!(cache.entry_count("notes-app-v1"), 8);
    }

    #[test]
    fn non_get_requests_bypass_the_cache() {
        let (manager, cache, fetcher) = installed_manager(CacheConfig::default());
        fetcher.route("/", AssetResponse::ok("posted"));
        let request = AssetRequest::new(RequestMethod::Post, "/");

        let outcome = block_on(manager.handle_fetch(&request)).expect("network");

        assert_eq!(outcome.source, FetchSource::Network { stored: false });
        assert_eq!(outcome.response.body, b"posted".to_vec());
        assert_eq!(cache.entry_count("notes-app-v1"), 8);
    }

    #[test]
    fn write_through_stores_only_basic_ok_get_responses() {
        let (manager, cache, _fetcher) = installed_manager(CacheConfig::default());
        let opaque = AssetResponse::with_status(0, "").with_type(ResponseType::Opaque);
        let cors = AssetResponse::ok("{}").with_type(ResponseType::Cors);
        let post = AssetRequest::new(RequestMethod::Post, "/api/sync");

        assert!(!block_on(manager.write_through(&AssetRequest::get("/font"), &opaque)));
        assert!(!block_on(manager.write_through(&AssetRequest::get("/feed"), &cors)));
        assert!(!block_on(manager.write_through(&post, &AssetResponse::ok("ack"))));
        assert_eq!(cache.entry_count("notes-app-v1"), 8);

        let request = AssetRequest::get("/notes/draft");
        assert!(block_on(manager.write_through(&request, &AssetResponse::ok("draft"))));
        assert_eq!(
            block_on(manager.lookup(&request)).map(|response| response.body),
            Some(b"draft".to_vec())
        );
    }

    #[test]
    fn lookup_never_hits_for_non_get_requests() {
        let (manager, _cache, _fetcher) = installed_manager(CacheConfig::default());
        assert!(block_on(manager.lookup(&AssetRequest::get("/"))).is_some());
        assert_eq!(
            block_on(manager.lookup(&AssetRequest::new(RequestMethod::Post, "/"))),
            None
        );
    }

    #[test]
    fn offline_miss_propagates_network_error() {
        let (manager, _cache, fetcher) = installed_manager(CacheConfig::default());
        fetcher.go_offline();

        let err = block_on(manager.handle_fetch(&AssetRequest::get("/never-seen")))
            .expect_err("offline miss");

        assert!(matches!(err, CacheError::Network { url, .. } if url == "/never-seen"));
    }

    #[derive(Clone, Default)]
    struct FlakyCache {
        inner: MemoryCacheStorage,
        fail_reads: Rc<RefCell<bool>>,
        fail_writes: Rc<RefCell<bool>>,
    }

    impl CacheStorage for FlakyCache {
        fn match_key<'a>(
            &'a self,
            cache_name: &'a str,
            key: &'a str,
        ) -> CacheStorageFuture<'a, Result<Option<AssetResponse>, String>> {
            if *self.fail_reads.borrow() {
                return Box::pin(async { Err("cache read failed".to_string()) });
            }
            self.inner.match_key(cache_name, key)
        }

        fn put<'a>(
            &'a self,
            cache_name: &'a str,
            key: &'a str,
            response: &'a AssetResponse,
        ) -> CacheStorageFuture<'a, Result<(), String>> {
            if *self.fail_writes.borrow() {
                return Box::pin(async { Err("quota exceeded".to_string()) });
            }
            self.inner.put(cache_name, key, response)
        }

        fn put_all<'a>(
            &'a self,
            cache_name: &'a str,
            entries: &'a [(String, AssetResponse)],
        ) -> CacheStorageFuture<'a, Result<(), String>> {
            if *self.fail_writes.borrow() {
                return Box::pin(async { Err("quota exceeded".to_string()) });
            }
            self.inner.put_all(cache_name, entries)
        }

        fn cache_names<'a>(&'a self) -> CacheStorageFuture<'a, Result<Vec<String>, String>> {
            self.inner.cache_names()
        }

        fn delete_cache<'a>(
            &'a self,
            cache_name: &'a str,
        ) -> CacheStorageFuture<'a, Result<bool, String>> {
            self.inner.delete_cache(cache_name)
        }
    }

    #[test]
    fn failing_commit_surfaces_storage_error() {
        let config = CacheConfig::default();
        let cache = FlakyCache::default();
        *cache.fail_writes.borrow_mut() = true;
        let manager = CacheManager::new(config.clone(), cache, routed_fetcher(&config));

        assert_eq!(
            block_on(manager.install()).expect_err("commit fails"),
            CacheError::Storage("quota exceeded".to_string())
        );
        assert_eq!(manager.phase(), WorkerPhase::Installing);
    }

    #[test]
    fn cache_faults_during_fetch_degrade_to_network() {
        let config = CacheConfig::default();
        let cache = FlakyCache::default();
        let fetcher = routed_fetcher(&config);
        let manager = CacheManager::new(config, cache.clone(), fetcher.clone());
        block_on(manager.install()).expect("install");

        *cache.fail_reads.borrow_mut() = true;
        *cache.fail_writes.borrow_mut() = true;
        let outcome = block_on(manager.handle_fetch(&AssetRequest::get("/js/app.js")))
            .expect("served from network");

        assert_eq!(outcome.source, FetchSource::Network { stored: false });
        assert_eq!(outcome.response.body, b"asset /js/app.js".to_vec());
    }
}
