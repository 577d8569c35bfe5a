use super::*;

fn unsupported() -> String {
    "Browser cache and fetch APIs are only available when compiled for wasm32".to_string()
}

pub async fn cache_match(_cache_name: &str, _key: &str) -> Result<Option<AssetResponse>, String> {
    Ok(None)
}

pub async fn cache_put(
    _cache_name: &str,
    _key: &str,
    _response: &AssetResponse,
) -> Result<(), String> {
    Ok(())
}

pub async fn cache_put_all(
    _cache_name: &str,
    _entries: &[(String, AssetResponse)],
) -> Result<(), String> {
    Ok(())
}

pub async fn cache_names() -> Result<Vec<String>, String> {
    Ok(Vec::new())
}

pub async fn cache_delete(_cache_name: &str) -> Result<bool, String> {
    Ok(false)
}

pub async fn network_fetch(_request: &AssetRequest) -> Result<AssetResponse, String> {
    Err(unsupported())
}

pub async fn read_response(_response: &web_sys::Response) -> Result<AssetResponse, String> {
    Err(unsupported())
}
