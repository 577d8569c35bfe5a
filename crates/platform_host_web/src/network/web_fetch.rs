//! `fetch()`-backed network adapter.

use platform_host::{AssetFetchFuture, AssetFetcher, AssetRequest, AssetResponse};

#[derive(Debug, Clone, Copy, Default)]
/// Network fetcher backed by the global `fetch` function (window or worker scope).
pub struct WebAssetFetcher;

impl AssetFetcher for WebAssetFetcher {
    fn fetch<'a>(
        &'a self,
        request: &'a AssetRequest,
    ) -> AssetFetchFuture<'a, Result<AssetResponse, String>> {
        Box::pin(async move { crate::bridge::network_fetch(request).await })
    }
}

/// Reads a browser `Response` (status, type, headers, body) into an [`AssetResponse`].
///
/// The body is consumed, so pass a clone when the original still has to be returned to the page.
///
/// # Errors
///
/// Fails when the body cannot be read, and always off `wasm32`.
pub async fn capture_response(response: &web_sys::Response) -> Result<AssetResponse, String> {
    crate::bridge::read_response(response).await
}
