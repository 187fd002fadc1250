use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP错误: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
    #[error("下载地址返回错误状态码: {0}")]
    BadStatus(u16),
    #[error("无效的URL: {0}")]
    InvalidUrl(String),
    #[error("{failed}/{total} 个课时下载失败")]
    Incomplete { failed: usize, total: usize },
}
