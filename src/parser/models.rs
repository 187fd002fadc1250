use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::utils::{lenient, lenient_list};

// ------------------------------------------------------------------------------------
// 已订阅课程

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
}

/// 课程列表的分页信封，`next` 只保留不跟进
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursesResponse {
    #[serde(default)]
    pub next: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<Course>,
}

// ------------------------------------------------------------------------------------
// 课程目录

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoVariant {
    pub file: String,
    pub label: String,
}

/// 在边界处一次性解码好的目录条目，下游只按标签匹配
#[derive(Debug, Clone, PartialEq)]
pub enum CurriculumItem {
    Chapter { object_index: i64, title: String },
    Lecture(Lecture),
    // quiz、practice 等，直接跳过
    Other { class: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lecture {
    pub id: i64,
    pub object_index: i64,
    pub title: String,
    pub asset: LectureAsset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LectureAsset {
    /// 非空的清晰度列表
    Video(Vec<VideoVariant>),
    NonVideo { asset_type: String },
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChapterHeading {
    index: i64,
    title: String,
}

/// 最近一次出现的章节，出现章节之前为空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterContext {
    heading: Option<ChapterHeading>,
}

impl ChapterContext {
    pub fn new(index: i64, title: impl Into<String>) -> Self {
        Self {
            heading: Some(ChapterHeading {
                index,
                title: title.into(),
            }),
        }
    }

    pub fn label(&self) -> String {
        match &self.heading {
            Some(heading) => format!("{} - {}", heading.index, heading.title),
            None => String::new(),
        }
    }
}

// ------------------------------------------------------------------------------------
// 跳过的课时

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("不是视频资源 ({0})")]
    NonVideoAsset(String),
    #[error("资源数据异常: {0}")]
    MalformedAsset(String),
    #[error("没有 {0} 清晰度")]
    QualityUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLecture {
    pub lecture_id: i64,
    pub lecture_title: String,
    pub chapter: String,
    pub reason: SkipReason,
}

impl SkippedLecture {
    pub fn new(
        lecture_id: i64,
        lecture_title: impl Into<String>,
        chapter: impl Into<String>,
        reason: SkipReason,
    ) -> Self {
        Self {
            lecture_id,
            lecture_title: lecture_title.into(),
            chapter: chapter.into(),
            reason,
        }
    }
}
