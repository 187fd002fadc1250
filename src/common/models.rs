use serde_derive::Serialize;

use crate::downloader::models::ResolvedTask;
use crate::parser::models::{Course, SkippedLecture};

// 解析出来、可以直接交给下载器的计划
#[derive(Debug, Clone, Serialize)]
pub struct DownloadPlan {
    pub course: Course,
    pub quality: String,              // 全课程统一的清晰度
    pub tasks: Vec<ResolvedTask>,     // 按目录顺序排列
    pub skipped: Vec<SkippedLecture>, // 跳过的课时及原因
}

impl DownloadPlan {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
