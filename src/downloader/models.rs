use std::path::PathBuf;

use serde_derive::Serialize;

use crate::downloader::error::DownloadError;
use crate::parser::models::{Lecture, VideoVariant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Video,
}

/// 已归属章节的课时，清晰度尚未确定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadTask {
    pub chapter: String,
    pub course_id: i64,
    pub lecture_id: i64,
    pub lecture_title: String,
    /// 章节内序号，从 1 开始，不是 object_index
    pub sequence_in_chapter: i64,
    pub available_variants: Vec<VideoVariant>,
    pub kind: FileType,
}

impl DownloadTask {
    // 序号由第二遍编号统一填写
    pub fn new(
        chapter: String,
        course_id: i64,
        lecture: &Lecture,
        available_variants: Vec<VideoVariant>,
    ) -> Self {
        Self {
            chapter,
            course_id,
            lecture_id: lecture.id,
            lecture_title: lecture.title.clone(),
            sequence_in_chapter: 0,
            available_variants,
            kind: FileType::Video,
        }
    }

    /// 按清晰度标签挑出唯一的视频源
    pub fn resolve(&self, label: &str) -> Option<ResolvedTask> {
        let video = self
            .available_variants
            .iter()
            .find(|v| v.label == label)?
            .clone();
        Some(ResolvedTask {
            chapter: self.chapter.clone(),
            course_id: self.course_id,
            lecture_id: self.lecture_id,
            lecture_title: self.lecture_title.clone(),
            sequence_in_chapter: self.sequence_in_chapter,
            video,
            kind: self.kind,
        })
    }
}

/// 交给下载器的最终任务，只剩一个视频源
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTask {
    pub chapter: String,
    pub course_id: i64,
    pub lecture_id: i64,
    pub lecture_title: String,
    pub sequence_in_chapter: i64,
    pub video: VideoVariant,
    pub kind: FileType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    Completed(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct DownloadSummary {
    pub results: Vec<(i64, TaskStatus)>,
}

impl DownloadSummary {
    pub fn completed(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, s)| matches!(s, TaskStatus::Completed(_)))
            .count()
    }

    pub fn failed(&self) -> Vec<(i64, &str)> {
        self.results
            .iter()
            .filter_map(|(id, s)| match s {
                TaskStatus::Failed(msg) => Some((*id, msg.as_str())),
                TaskStatus::Completed(_) => None,
            })
            .collect()
    }

    /// 全部成功时返回完成数，否则报告失败数
    pub fn ensure_all_completed(&self) -> Result<usize, DownloadError> {
        let failed = self.failed().len();
        if failed > 0 {
            return Err(DownloadError::Incomplete {
                failed,
                total: self.results.len(),
            });
        }
        Ok(self.completed())
    }
}
