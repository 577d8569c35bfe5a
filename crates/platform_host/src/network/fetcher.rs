//! Network fetch service contracts and adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use super::asset::{AssetRequest, AssetResponse};

/// Object-safe boxed future used by [`AssetFetcher`] async methods.
pub type AssetFetchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that performs a network fetch for a resource request.
pub trait AssetFetcher {
    /// Fetches `request` from the network.
    ///
    /// An `Err` means the fetch itself failed (offline, DNS, aborted). HTTP error statuses are
    /// returned as `Ok` responses.
    fn fetch<'a>(
        &'a self,
        request: &'a AssetRequest,
    ) -> AssetFetchFuture<'a, Result<AssetResponse, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Offline fetcher that fails every request.
pub struct NoopAssetFetcher;

impl AssetFetcher for NoopAssetFetcher {
    fn fetch<'a>(
        &'a self,
        request: &'a AssetRequest,
    ) -> AssetFetchFuture<'a, Result<AssetResponse, String>> {
        Box::pin(async move { Err(format!("network unavailable for `{}`", request.url)) })
    }
}

#[derive(Debug, Default)]
struct MemoryFetcherState {
    routes: HashMap<String, Result<AssetResponse, String>>,
    calls: Vec<AssetRequest>,
}

#[derive(Debug, Clone, Default)]
/// Scripted in-memory fetcher keyed by request URL, recording every request it serves.
///
/// Unrouted URLs fail like an unreachable network.
pub struct MemoryAssetFetcher {
    inner: Rc<RefCell<MemoryFetcherState>>,
}

impl MemoryAssetFetcher {
    /// Routes `url` to a successful response.
    pub fn route(&self, url: impl Into<String>, response: AssetResponse) {
        self.inner
            .borrow_mut()
            .routes
            .insert(url.into(), Ok(response));
    }

    /// Routes `url` to a fetch failure.
    pub fn fail(&self, url: impl Into<String>, error: impl Into<String>) {
        self.inner
            .borrow_mut()
            .routes
            .insert(url.into(), Err(error.into()));
    }

    /// Removes every route so all requests fail.
    pub fn go_offline(&self) {
        self.inner.borrow_mut().routes.clear();
    }

    /// Returns the requests fetched so far, in call order.
    pub fn calls(&self) -> Vec<AssetRequest> {
        self.inner.borrow().calls.clone()
    }

    /// Returns how many fetches have been issued.
    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }
}

impl AssetFetcher for MemoryAssetFetcher {
    fn fetch<'a>(
        &'a self,
        request: &'a AssetRequest,
    ) -> AssetFetchFuture<'a, Result<AssetResponse, String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            state.calls.push(request.clone());
            state
                .routes
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| Err(format!("failed to fetch `{}`", request.url)))
        })
    }
}
