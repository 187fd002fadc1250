use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::common::models::DownloadPlan;
use crate::common::utils::FormatTool;
use error::DownloadError;
use models::{DownloadSummary, ResolvedTask, TaskStatus};

pub mod error;
pub mod models;

const NO_CHAPTER_DIR: &str = "00 - 未分章";

/// 执行单个已确定视频源的下载任务
#[async_trait]
pub trait DownloadExecutor: Send + Sync {
    async fn execute(
        &self,
        course_title: &str,
        task: &ResolvedTask,
    ) -> Result<PathBuf, DownloadError>;
}

pub struct VideoDownloader {
    client: Client,
    output_dir: PathBuf,
}

impl VideoDownloader {
    pub fn new(client: Client, output_dir: PathBuf) -> Self {
        Self { client, output_dir }
    }

    /// `<输出目录>/<课程>/<章节>/<序号>. <课时>.mp4`
    pub fn target_path(output_dir: &Path, course_title: &str, task: &ResolvedTask) -> PathBuf {
        let chapter = if task.chapter.is_empty() {
            NO_CHAPTER_DIR.to_string()
        } else {
            FormatTool::sanitize_filename(&task.chapter)
        };
        let lecture = if task.lecture_title.is_empty() {
            format!("lecture-{}", task.lecture_id)
        } else {
            task.lecture_title.clone()
        };
        let filename = FormatTool::sanitize_filename(&format!(
            "{:03}. {}",
            task.sequence_in_chapter, lecture
        ));

        output_dir
            .join(FormatTool::sanitize_filename(course_title))
            .join(chapter)
            .join(format!("{}.mp4", filename))
    }

    async fn write_body(
        mut resp: reqwest::Response,
        partial: &Path,
        path: &Path,
    ) -> Result<u64, DownloadError> {
        let mut file = tokio::fs::File::create(partial).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(partial, path).await?;
        Ok(written)
    }
}

#[async_trait]
impl DownloadExecutor for VideoDownloader {
    async fn execute(
        &self,
        course_title: &str,
        task: &ResolvedTask,
    ) -> Result<PathBuf, DownloadError> {
        let url = reqwest::Url::parse(&task.video.file)
            .map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", task.video.file, e)))?;
        let path = Self::target_path(&self.output_dir, course_title, task);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        debug!("下载 {} -> {:?}", url, path);
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(DownloadError::BadStatus(resp.status().as_u16()));
        }

        // 先写临时文件，完成后再改名；失败时删掉半截文件
        let partial = path.with_extension("mp4.part");
        let written = match Self::write_body(resp, &partial, &path).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    debug!("清理临时文件 {:?} 失败: {}", partial, rm);
                }
                return Err(e);
            }
        };

        info!(
            "已保存 {:?} ({})",
            path,
            FormatTool::format_size(written)
        );
        Ok(path)
    }
}

/// 按顺序逐个下载，上一个完成后才开始下一个；单个失败不影响后续任务
pub async fn run_plan(executor: &dyn DownloadExecutor, plan: &DownloadPlan) -> DownloadSummary {
    let mut summary = DownloadSummary::default();
    let total = plan.tasks.len();

    for (i, task) in plan.tasks.iter().enumerate() {
        info!(
            "[{}/{}] {} / {:03} {}",
            i + 1,
            total,
            task.chapter,
            task.sequence_in_chapter,
            task.lecture_title
        );
        let status = match executor.execute(&plan.course.title, task).await {
            Ok(path) => TaskStatus::Completed(path),
            Err(e) => {
                error!("课时 {} 下载失败: {}", task.lecture_id, e);
                TaskStatus::Failed(e.to_string())
            }
        };
        summary.results.push((task.lecture_id, status));
    }

    summary
}
