use platform_host::{AssetRequest, AssetResponse};

pub(crate) async fn network_fetch(request: &AssetRequest) -> Result<AssetResponse, String> {
    super::interop::network_fetch(request).await
}

pub(crate) async fn read_response(response: &web_sys::Response) -> Result<AssetResponse, String> {
    super::interop::read_response(response).await
}
