use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("服务器返回错误状态码: {status} ({url})")]
    Status { status: u16, url: String },

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("无效的会话: {0}")]
    InvalidSession(String),
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}
