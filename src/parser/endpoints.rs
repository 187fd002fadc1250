use url::Url;

use crate::auth::session::Session;
use crate::common::client::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://www.udemy.com";

/// 一次请求拿完全部已订阅课程，不处理分页
pub const COURSE_PAGE_SIZE: u32 = 500;

/// 一次请求拿完整个课程目录，不处理分页
pub const CURRICULUM_PAGE_SIZE: u32 = 1400;

// 与服务端约定的字段列表，必须原样发送
const CURRICULUM_FIELDS: &str = "fields[lecture]=@min,object_index,asset,supplementary_assets,sort_order,is_published,is_free\
&fields[quiz]=@min,object_index,title,sort_order,is_published\
&fields[practice]=@min,object_index,title,sort_order,is_published\
&fields[chapter]=@min,description,object_index,title,sort_order,is_published\
&fields[asset]=@min,title,filename,asset_type,external_url,download_urls,stream_urls,length,status";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// 根据会话决定请求的主机，企业版用户改写为 `https://{business}.udemy.com`
    pub fn for_session(session: &Session) -> Result<Self, ApiError> {
        let base = match session.business_tenant() {
            Some(business) => Url::parse(&format!("https://{}.udemy.com", business))?,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        Ok(Self::new(base))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn subscribed_courses(&self) -> Url {
        self.build(
            "/api-2.0/users/me/subscribed-courses",
            &format!("page_size={}", COURSE_PAGE_SIZE),
        )
    }

    pub fn curriculum(&self, course_id: i64) -> Url {
        self.build(
            &format!("/api-2.0/courses/{}/cached-subscriber-curriculum-items", course_id),
            &format!("page_size={}&{}", CURRICULUM_PAGE_SIZE, CURRICULUM_FIELDS),
        )
    }

    fn build(&self, path: &str, query: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url.set_query(Some(query));
        url
    }
}
