//! Browser capability bridge implementations for `platform_host_web` service adapters.
//!
//! This module is organized by host domain (`cache`, `fetch`) while routing every call through
//! `interop`, which selects the wasm or non-wasm transport.

mod cache;
mod fetch;
mod interop;

use platform_host::{AssetRequest, AssetResponse};

pub async fn cache_match(cache_name: &str, key: &str) -> Result<Option<AssetResponse>, String> {
    cache::cache_match(cache_name, key).await
}

pub async fn cache_put(cache_name: &str, key: &str, response: &AssetResponse) -> Result<(), String> {
    cache::cache_put(cache_name, key, response).await
}

pub async fn cache_put_all(
    cache_name: &str,
    entries: &[(String, AssetResponse)],
) -> Result<(), String> {
    cache::cache_put_all(cache_name, entries).await
}

pub async fn cache_names() -> Result<Vec<String>, String> {
    cache::cache_names().await
}

pub async fn cache_delete(cache_name: &str) -> Result<bool, String> {
    cache::cache_delete(cache_name).await
}

pub async fn network_fetch(request: &AssetRequest) -> Result<AssetResponse, String> {
    fetch::network_fetch(request).await
}

pub async fn read_response(response: &web_sys::Response) -> Result<AssetResponse, String> {
    fetch::read_response(response).await
}
