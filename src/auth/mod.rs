pub mod session;

use std::path::Path;

use tracing::{info, warn};

use crate::common::client::client::UdemyClient;
use crate::common::client::error::ApiError;
use crate::parser::endpoints::ApiEndpoints;
pub use session::Session;

/// 已认证的客户端以及它应当请求的接口地址
#[derive(Debug, Clone)]
pub struct AuthedClient {
    pub client: UdemyClient,
    pub endpoints: ApiEndpoints,
}

// 加载会话文件，并用命令行参数覆盖
pub async fn load_session(
    path: impl AsRef<Path>,
    access_token: Option<String>,
    business: Option<String>,
) -> Result<Session, ApiError> {
    let path = path.as_ref();
    let exists = tokio::fs::try_exists(path).await.map_err(|e| {
        ApiError::InvalidSession(format!("无法访问会话文件 {:?}: {}", path, e))
    })?;
    let session = if exists {
        Session::load_from_file(path).await?
    } else if access_token.is_some() {
        warn!("会话文件 {:?} 不存在，仅使用命令行提供的 access_token", path);
        Session::default()
    } else {
        return Err(ApiError::InvalidSession(format!(
            "会话文件 {:?} 不存在，请先导出浏览器中的 Cookie",
            path
        )));
    };
    Ok(session.with_overrides(access_token, business))
}

// 根据会话创建客户端，企业版会话会改写请求主机
pub fn get_authed_client(session: &Session) -> Result<AuthedClient, ApiError> {
    let endpoints = ApiEndpoints::for_session(session)?;
    if let Some(business) = session.business_tenant() {
        info!("使用企业版站点: {}", business);
    }
    let client = UdemyClient::from_session(session, endpoints.base())?;
    Ok(AuthedClient { client, endpoints })
}
