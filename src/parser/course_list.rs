use serde_json::Value;
use tracing::{debug, info, warn};

use crate::common::chooser::{Chooser, checked_choice};
use crate::common::client::client::Transport;
use crate::parser::endpoints::ApiEndpoints;
use crate::parser::errors::ParseError;
use crate::parser::models::{Course, CoursesResponse};

pub struct CourseLister<'a, T: Transport + ?Sized> {
    client: &'a T,
    endpoints: &'a ApiEndpoints,
}

impl<'a, T: Transport + ?Sized> CourseLister<'a, T> {
    pub fn new(client: &'a T, endpoints: &'a ApiEndpoints) -> Self {
        Self { client, endpoints }
    }

    // 获取已订阅课程，只取第一页
    pub async fn list_courses(&self) -> Result<Vec<Course>, ParseError> {
        let url = self.endpoints.subscribed_courses();
        let body = self.client.get_bytes(&url).await?;
        let resp = parse_courses(&body)?;

        if resp.next.as_ref().is_some_and(|next| !next.is_null()) {
            warn!("课程列表还有下一页，只处理前 {} 门课程", resp.results.len());
        }
        debug!("已订阅课程 {} 门", resp.results.len());
        Ok(resp.results)
    }

    /// 让用户选出一门课程；指定了课程 ID 时直接按 ID 匹配
    pub async fn select_course(
        &self,
        chooser: &dyn Chooser,
        preset_id: Option<i64>,
    ) -> Result<Course, ParseError> {
        let courses = self.list_courses().await?;
        if courses.is_empty() {
            return Err(ParseError::NoCourses);
        }

        if let Some(id) = preset_id {
            return courses
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| ParseError::NoSelection(format!("没有找到 ID 为 {} 的已订阅课程", id)));
        }

        let titles: Vec<String> = courses.iter().map(|c| c.title.clone()).collect();
        let index = checked_choice(chooser, "选择课程", &titles)?;
        let course = courses[index].clone();
        info!("选择课程: {} ({})", course.title, course.id);
        Ok(course)
    }
}

/// 信封宽松解析：只有响应体根本不是 JSON 时才报错
pub fn parse_courses(body: &[u8]) -> Result<CoursesResponse, ParseError> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
