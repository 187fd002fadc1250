use std::collections::BTreeMap;
use std::path::Path;

use serde_derive::Deserialize;
use tracing::{debug, info};

use crate::common::client::error::ApiError;

/// 会话文件中的 Cookie，既可以是键值对象，也可以是浏览器里直接复制的 Cookie 字符串
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SessionCookies {
    Map(BTreeMap<String, String>),
    Header(String),
}

impl Default for SessionCookies {
    fn default() -> Self {
        SessionCookies::Map(BTreeMap::new())
    }
}

impl SessionCookies {
    pub fn pairs(&self) -> Vec<(String, String)> {
        match self {
            SessionCookies::Map(map) => map
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            SessionCookies::Header(header) => header
                .split(';')
                .filter_map(|part| {
                    let (name, value) = part.trim().split_once('=')?;
                    let name = name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some((name.to_string(), value.trim().to_string()))
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.pairs()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// 登录凭证，对下载流程来说是一个不透明的凭证包
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Session {
    pub cookies: SessionCookies,
    #[serde(alias = "csrftoken")]
    pub csrf: String,
    pub access_token: String,
    pub client_id: String,
    pub business: Option<String>,
}

impl Session {
    // 从本地 JSON 文件加载会话
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        info!("加载会话文件: {:?}", path);
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::InvalidSession(format!("读取会话文件失败 {:?}: {}", path, e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ApiError> {
        let session: Session = serde_json::from_str(text)
            .map_err(|e| ApiError::InvalidSession(format!("会话文件格式错误: {}", e)))?;
        debug!(
            "会话: {} 个Cookie, business={:?}",
            session.cookies.pairs().len(),
            session.business
        );
        Ok(session)
    }

    /// 命令行参数优先于会话文件
    pub fn with_overrides(mut self, access_token: Option<String>, business: Option<String>) -> Self {
        if let Some(token) = access_token {
            self.access_token = token;
        }
        if business.is_some() {
            self.business = business;
        }
        self
    }

    /// 企业版子域名，空值或字面量 "null" 视为未设置
    pub fn business_tenant(&self) -> Option<&str> {
        self.business
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty() && *b != "null")
    }

    pub fn bearer_token(&self) -> Option<String> {
        if !self.access_token.is_empty() {
            return Some(self.access_token.clone());
        }
        self.cookies.get("access_token").filter(|t| !t.is_empty())
    }

    pub fn csrf_token(&self) -> Option<String> {
        if !self.csrf.is_empty() {
            return Some(self.csrf.clone());
        }
        self.cookies.get("csrftoken").filter(|t| !t.is_empty())
    }
}
