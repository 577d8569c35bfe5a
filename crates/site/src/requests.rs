//! Translation between worker event data and the cache manager's request model.

use offline_cache::CacheConfig;
use platform_host::{AssetRequest, RequestMethod};

/// Builds the request the worker should answer itself, or `None` to leave it to the browser.
///
/// Only `GET` requests are intercepted; other methods keep their streamed bodies and default
/// browser handling.
pub fn intercepted_request(method: &str, url: &str) -> Option<AssetRequest> {
    let method = RequestMethod::parse(method)?;
    let request = AssetRequest::new(method, url);
    request.is_cacheable().then_some(request)
}

/// Default cache configuration with manifest paths resolved against the worker's origin.
///
/// An empty or `"null"` origin leaves paths root-relative.
pub fn worker_cache_config(origin: &str) -> CacheConfig {
    let config = CacheConfig::default();
    match origin.trim() {
        "" | "null" => config,
        origin => config.with_origin(origin),
    }
}
