//! Network-domain models and fetch contracts.

mod asset;
mod fetcher;

pub use asset::{AssetRequest, AssetResponse, RequestMethod, ResponseType};
pub use fetcher::{AssetFetchFuture, AssetFetcher, MemoryAssetFetcher, NoopAssetFetcher};
