//! Browser cache-storage adapters.

pub mod cache_api;
