use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cookie::Cookie;
use cookie_store::CookieStore;
use flate2::read::GzDecoder;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{
        ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderName,
        HeaderValue, REFERER, USER_AGENT,
    },
};
use reqwest_cookie_store::CookieStoreMutex;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::session::Session;
use crate::common::client::error::ApiError;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
const API_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// 下载流程只依赖这一个能力：对一个 URL 发起已认证的 GET 请求并拿到响应体
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ApiError>;
}

// 携带会话凭证的客户端
#[derive(Debug, Clone)]
pub struct UdemyClient {
    pub inner: Client,
    pub cookie_store: Arc<CookieStoreMutex>,
    base: Url,
    auth_headers: HeaderMap,
}

impl UdemyClient {
    /// 根据会话创建客户端，Cookie 写入 `base` 对应的域名
    pub fn from_session(session: &Session, base: &Url) -> Result<Self, ApiError> {
        let mut store = CookieStore::default();
        for (name, value) in session.cookies.pairs() {
            let cookie = Cookie::new(name.clone(), value);
            if let Err(e) = store.insert_raw(&cookie, base) {
                warn!("忽略无效的Cookie {}: {}", name, e);
            }
        }
        let cookie_store = Arc::new(CookieStoreMutex::new(store));

        let inner = ClientBuilder::new()
            .timeout(API_TIMEOUT)
            .cookie_provider(Arc::clone(&cookie_store))
            .default_headers(Self::get_default_headers(base))
            .build()
            .map_err(|e| {
                error!("创建客户端失败: {}", e);
                ApiError::Reqwest(e)
            })?;

        Ok(Self {
            inner,
            cookie_store,
            base: base.clone(),
            auth_headers: Self::get_auth_headers(session)?,
        })
    }

    /// 下载视频用的客户端：不限制整体耗时，只限制连接和两次读取之间的间隔
    pub fn download_client(&self) -> Result<Client, ApiError> {
        self.download_client_with_timeout(DOWNLOAD_READ_TIMEOUT)
    }

    pub fn download_client_with_timeout(&self, read_timeout: Duration) -> Result<Client, ApiError> {
        ClientBuilder::new()
            .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
            .read_timeout(read_timeout)
            .cookie_provider(Arc::clone(&self.cookie_store))
            .default_headers(Self::get_download_headers(&self.base))
            .build()
            .map_err(|e| {
                error!("创建下载客户端失败: {}", e);
                ApiError::Reqwest(e)
            })
    }

    // CDN 返回的是原始字节，不声明 JSON 和 gzip
    fn get_download_headers(base: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if let Ok(referer) = HeaderValue::from_str(base.as_str()) {
            headers.insert(REFERER, referer);
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers
    }

    pub fn get_default_headers(base: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        if let Ok(referer) = HeaderValue::from_str(base.as_str()) {
            headers.insert(REFERER, referer);
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers
    }

    fn get_auth_headers(session: &Session) -> Result<HeaderMap, ApiError> {
        let invalid = |field: &str| ApiError::InvalidSession(format!("{} 含有非法字符", field));
        let mut headers = HeaderMap::new();

        if let Some(token) = session.bearer_token() {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| invalid("access_token"))?;
            headers.insert(AUTHORIZATION, bearer.clone());
            headers.insert(HeaderName::from_static("x-udemy-authorization"), bearer);
        } else {
            warn!("会话中没有 access_token，请求可能被拒绝");
        }
        if let Some(csrf) = session.csrf_token() {
            headers.insert(
                HeaderName::from_static("x-csrftoken"),
                HeaderValue::from_str(&csrf).map_err(|_| invalid("csrf"))?,
            );
        }
        if !session.client_id.is_empty() {
            headers.insert(
                HeaderName::from_static("x-udemy-client-id"),
                HeaderValue::from_str(&session.client_id).map_err(|_| invalid("client_id"))?,
            );
        }
        Ok(headers)
    }

    // 发起请求，只返回原始响应，状态码由调用方处理
    pub async fn get_raw_response(&self, url: &Url) -> Result<Response, ApiError> {
        debug!("GET {}", url);
        let resp = self
            .inner
            .get(url.clone())
            .headers(self.auth_headers.clone())
            .send()
            .await
            .map_err(|e| {
                error!("请求失败: {}", e);
                ApiError::Reqwest(e)
            })?;
        Ok(resp)
    }

    fn try_decompress(raw: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut decoder = GzDecoder::new(raw);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded)?;
        Ok(decoded)
    }

    async fn handle_response(resp: Response) -> Result<Vec<u8>, ApiError> {
        let status = resp.status();
        let url = resp.url().to_string();
        if !status.is_success() {
            error!("请求 {} 返回 {}", url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let raw_body = resp.bytes().await?;
        debug!("响应 {} 字节: {}", raw_body.len(), url);

        // 解压失败则原样使用
        Ok(Self::try_decompress(&raw_body).unwrap_or_else(|_| raw_body.to_vec()))
    }
}

#[async_trait]
impl Transport for UdemyClient {
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ApiError> {
        let resp = self.get_raw_response(url).await?;
        Self::handle_response(resp).await
    }
}
