use platform_host::AssetResponse;

pub(crate) async fn cache_match(
    cache_name: &str,
    key: &str,
) -> Result<Option<AssetResponse>, String> {
    super::interop::cache_match(cache_name, key).await
}

pub(crate) async fn cache_put(
    cache_name: &str,
    key: &str,
    response: &AssetResponse,
) -> Result<(), String> {
    super::interop::cache_put(cache_name, key, response).await
}

pub(crate) async fn cache_put_all(
    cache_name: &str,
    entries: &[(String, AssetResponse)],
) -> Result<(), String> {
    super::interop::cache_put_all(cache_name, entries).await
}

pub(crate) async fn cache_names() -> Result<Vec<String>, String> {
    super::interop::cache_names().await
}

pub(crate) async fn cache_delete(cache_name: &str) -> Result<bool, String> {
    super::interop::cache_delete(cache_name).await
}
