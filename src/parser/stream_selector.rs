use tracing::{debug, warn};

use crate::common::chooser::{Chooser, checked_choice};
use crate::downloader::models::{DownloadTask, ResolvedTask};
use crate::parser::errors::ParseError;
use crate::parser::models::{SkipReason, SkippedLecture};

/// 选择全课程统一使用的清晰度；预设值必须出现在课程的清晰度列表中
pub fn choose_quality(
    resolutions: &[String],
    chooser: &dyn Chooser,
    preset: Option<&str>,
) -> Result<String, ParseError> {
    if let Some(label) = preset {
        if resolutions.iter().any(|r| r == label) {
            debug!("使用预设清晰度: {}", label);
            return Ok(label.to_string());
        }
        return Err(ParseError::NoSelection(format!(
            "课程没有 {} 清晰度，可选: {}",
            label,
            resolutions.join(", ")
        )));
    }

    if resolutions.is_empty() {
        return Err(ParseError::NoSelection("课程没有可选的清晰度".to_string()));
    }

    let index = checked_choice(chooser, "选择清晰度", resolutions)?;
    Ok(resolutions[index].clone())
}

/// 每个任务只保留指定清晰度的视频源，缺少该清晰度的课时跳过并记录
pub fn select_quality(
    tasks: &[DownloadTask],
    label: &str,
) -> (Vec<ResolvedTask>, Vec<SkippedLecture>) {
    let mut resolved = Vec::with_capacity(tasks.len());
    let mut skipped = Vec::new();

    for task in tasks {
        match task.resolve(label) {
            Some(r) => resolved.push(r),
            None => {
                warn!(
                    "课时 {} ({}) 没有 {} 清晰度，跳过",
                    task.lecture_id, task.lecture_title, label
                );
                skipped.push(SkippedLecture::new(
                    task.lecture_id,
                    &task.lecture_title,
                    &task.chapter,
                    SkipReason::QualityUnavailable(label.to_string()),
                ));
            }
        }
    }

    (resolved, skipped)
}
