//! Shared transport interop for browser bridge domains.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for higher-level bridge domain modules.

use platform_host::{AssetRequest, AssetResponse};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn cache_match(cache_name: &str, key: &str) -> Result<Option<AssetResponse>, String> {
    imp::cache_match(cache_name, key).await
}

pub async fn cache_put(cache_name: &str, key: &str, response: &AssetResponse) -> Result<(), String> {
    imp::cache_put(cache_name, key, response).await
}

pub async fn cache_put_all(
    cache_name: &str,
    entries: &[(String, AssetResponse)],
) -> Result<(), String> {
    imp::cache_put_all(cache_name, entries).await
}

pub async fn cache_names() -> Result<Vec<String>, String> {
    imp::cache_names().await
}

pub async fn cache_delete(cache_name: &str) -> Result<bool, String> {
    imp::cache_delete(cache_name).await
}

pub async fn network_fetch(request: &AssetRequest) -> Result<AssetResponse, String> {
    imp::network_fetch(request).await
}

pub async fn read_response(response: &web_sys::Response) -> Result<AssetResponse, String> {
    imp::read_response(response).await
}
