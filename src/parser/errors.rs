use thiserror::Error;

use crate::common::client::error::ApiError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("网络错误: {0}")]
    NetworkError(String),
    #[error("响应解析失败: {0}")]
    DecodeError(String),
    #[error("未完成选择: {0}")]
    NoSelection(String),
    #[error("没有已订阅的课程")]
    NoCourses,
}

impl From<ApiError> for ParseError {
    fn from(err: ApiError) -> Self {
        ParseError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::DecodeError(err.to_string())
    }
}
