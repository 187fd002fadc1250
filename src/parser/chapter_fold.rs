use itertools::Itertools;
use tracing::{debug, warn};

use crate::downloader::models::DownloadTask;
use crate::parser::models::{
    ChapterContext, CurriculumItem, LectureAsset, SkipReason, SkippedLecture,
};

/// 单步折叠的产出
#[derive(Debug, Clone, PartialEq)]
pub enum FoldStep {
    Task(DownloadTask),
    Skipped(SkippedLecture),
    Nothing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurriculumPlan {
    pub tasks: Vec<DownloadTask>,
    /// 去重后的清晰度标签，保持首次出现的顺序
    pub resolutions: Vec<String>,
    pub skipped: Vec<SkippedLecture>,
}

/// 章节条目更新当前章节，课时条目继承当前章节
pub fn fold_step(
    chapter: ChapterContext,
    item: &CurriculumItem,
    course_id: i64,
) -> (ChapterContext, FoldStep) {
    match item {
        CurriculumItem::Chapter { object_index, title } => {
            (ChapterContext::new(*object_index, title.clone()), FoldStep::Nothing)
        }
        CurriculumItem::Lecture(lecture) => {
            let label = chapter.label();
            let step = match &lecture.asset {
                LectureAsset::Video(variants) => {
                    FoldStep::Task(DownloadTask::new(label, course_id, lecture, variants.clone()))
                }
                LectureAsset::NonVideo { asset_type } => FoldStep::Skipped(SkippedLecture::new(
                    lecture.id,
                    &lecture.title,
                    label,
                    SkipReason::NonVideoAsset(asset_type.clone()),
                )),
                LectureAsset::Malformed { reason } => FoldStep::Skipped(SkippedLecture::new(
                    lecture.id,
                    &lecture.title,
                    label,
                    SkipReason::MalformedAsset(reason.clone()),
                )),
            };
            (chapter, step)
        }
        CurriculumItem::Other { .. } => (chapter, FoldStep::Nothing),
    }
}

pub fn build_tasks_and_resolutions(course_id: i64, items: &[CurriculumItem]) -> CurriculumPlan {
    let mut plan = CurriculumPlan::default();
    let mut labels: Vec<String> = Vec::new();
    let mut chapter = ChapterContext::default();

    for item in items {
        let (next, step) = fold_step(chapter, item, course_id);
        chapter = next;
        match step {
            FoldStep::Task(task) => {
                labels.extend(task.available_variants.iter().map(|v| v.label.clone()));
                plan.tasks.push(task);
            }
            FoldStep::Skipped(skipped) => {
                match &skipped.reason {
                    SkipReason::NonVideoAsset(_) => debug!("跳过课时 {}: {}", skipped.lecture_id, skipped.reason),
                    _ => warn!("跳过课时 {}: {}", skipped.lecture_id, skipped.reason),
                }
                plan.skipped.push(skipped);
            }
            FoldStep::Nothing => {}
        }
    }

    assign_sequence_numbers(&mut plan.tasks);
    plan.resolutions = labels.into_iter().unique().collect();
    debug!(
        "课程 {}: {} 个视频任务, 清晰度 {:?}",
        course_id,
        plan.tasks.len(),
        plan.resolutions
    );
    plan
}

/// 章节内编号：章节标签变化时重置为 1，否则递增
pub fn assign_sequence_numbers(tasks: &mut [DownloadTask]) {
    let mut current: Option<String> = None;
    let mut count = 0;
    for task in tasks.iter_mut() {
        if current.as_deref() != Some(task.chapter.as_str()) {
            current = Some(task.chapter.clone());
            count = 1;
        } else {
            count += 1;
        }
        task.sequence_in_chapter = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::{Lecture, VideoVariant};

    fn chapter(index: i64, title: &str) -> CurriculumItem {
        CurriculumItem::Chapter {
            object_index: index,
            title: title.to_string(),
        }
    }

    fn video(id: i64, labels: &[&str]) -> CurriculumItem {
        CurriculumItem::Lecture(Lecture {
            id,
            object_index: id,
            title: format!("lecture {}", id),
            asset: LectureAsset::Video(
                labels
                    .iter()
                    .map(|l| VideoVariant {
                        file: format!("https://cdn/{}/{}.mp4", id, l),
                        label: l.to_string(),
                    })
                    .collect(),
            ),
        })
    }

    fn article(id: i64) -> CurriculumItem {
        CurriculumItem::Lecture(Lecture {
            id,
            object_index: id,
            title: String::new(),
            asset: LectureAsset::NonVideo {
                asset_type: "Article".to_string(),
            },
        })
    }

    fn quiz() -> CurriculumItem {
        CurriculumItem::Other {
            class: "quiz".to_string(),
        }
    }

    fn summary(plan: &CurriculumPlan) -> Vec<(i64, &str, i64)> {
        plan.tasks
            .iter()
            .map(|t| (t.lecture_id, t.chapter.as_str(), t.sequence_in_chapter))
            .collect()
    }

    #[test]
    fn chapter_step_replaces_context_without_output() {
        let (ctx, step) = fold_step(ChapterContext::default(), &chapter(3, "Setup"), 1);
        assert_eq!(ctx.label(), "3 - Setup");
        assert_eq!(step, FoldStep::Nothing);
    }

    #[test]
    fn lecture_step_inherits_context() {
        let ctx = ChapterContext::new(2, "Core");
        let (next, step) = fold_step(ctx.clone(), &video(9, &["720p"]), 77);
        assert_eq!(next, ctx);
        match step {
            FoldStep::Task(task) => {
                assert_eq!(task.chapter, "2 - Core");
                assert_eq!(task.course_id, 77);
                assert_eq!(task.lecture_id, 9);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn two_chapter_course() {
        let items = vec![
            chapter(1, "Intro"),
            video(10, &["720p", "360p"]),
            video(11, &["360p"]),
            chapter(2, "Core"),
            video(12, &["720p"]),
        ];
        let plan = build_tasks_and_resolutions(5, &items);

        assert_eq!(plan.resolutions, vec!["720p", "360p"]);
        assert_eq!(
            summary(&plan),
            vec![(10, "1 - Intro", 1), (11, "1 - Intro", 2), (12, "2 - Core", 1)]
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn empty_curriculum() {
        let plan = build_tasks_and_resolutions(5, &[]);
        assert_eq!(plan, CurriculumPlan::default());
    }

    #[test]
    fn lecture_before_any_chapter_has_empty_label() {
        let plan = build_tasks_and_resolutions(5, &[video(1, &["480p"]), video(2, &["480p"]), chapter(1, "A"), video(3, &["480p"])]);
        assert_eq!(summary(&plan), vec![(1, "", 1), (2, "", 2), (3, "1 - A", 1)]);
    }

    #[test]
    fn quizzes_and_articles_do_not_consume_sequence_numbers() {
        let items = vec![
            chapter(1, "Intro"),
            video(10, &["720p"]),
            quiz(),
            article(11),
            video(12, &["1080p"]),
        ];
        let plan = build_tasks_and_resolutions(5, &items);

        assert_eq!(summary(&plan), vec![(10, "1 - Intro", 1), (12, "1 - Intro", 2)]);
        assert_eq!(plan.resolutions, vec!["720p", "1080p"]);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].lecture_id, 11);
        assert_eq!(plan.skipped[0].chapter, "1 - Intro");
        assert_eq!(
            plan.skipped[0].reason,
            SkipReason::NonVideoAsset("Article".to_string())
        );
    }

    #[test]
    fn malformed_lecture_is_reported_and_run_continues() {
        let broken = CurriculumItem::Lecture(Lecture {
            id: 20,
            object_index: 2,
            title: "broken".to_string(),
            asset: LectureAsset::Malformed {
                reason: "stream_urls 中没有 Video 列表".to_string(),
            },
        });
        let plan = build_tasks_and_resolutions(5, &[chapter(1, "A"), broken, video(21, &["720p"])]);

        assert_eq!(summary(&plan), vec![(21, "1 - A", 1)]);
        assert!(matches!(plan.skipped[0].reason, SkipReason::MalformedAsset(_)));
    }

    #[test]
    fn resolutions_deduplicated_in_first_seen_order() {
        let items = vec![
            video(1, &["360p", "720p"]),
            video(2, &["1080p", "720p", "360p"]),
            video(3, &["720p"]),
        ];
        let plan = build_tasks_and_resolutions(5, &items);
        assert_eq!(plan.resolutions, vec!["360p", "720p", "1080p"]);
    }

    #[test]
    fn non_video_stream_labels_never_reach_resolutions() {
        use crate::parser::curriculum::decode_item;
        use serde_json::json;

        // 非视频资源即使带有 stream_urls.Video，其标签也不能出现在可选清晰度里
        let items = vec![
            chapter(1, "A"),
            decode_item(json!({
                "_class": "lecture", "id": 30, "object_index": 1, "title": "Slides",
                "asset": {"asset_type": "Presentation",
                          "stream_urls": {"Video": [{"type": "video/mp4", "label": "2160p", "file": "https://cdn/x.mp4"}]}}
            })),
            video(31, &["720p"]),
        ];
        let plan = build_tasks_and_resolutions(5, &items);

        assert_eq!(plan.resolutions, vec!["720p"]);
        assert!(!plan.resolutions.iter().any(|r| r == "2160p"));
        assert_eq!(summary(&plan), vec![(31, "1 - A", 1)]);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(
            plan.skipped[0].reason,
            SkipReason::NonVideoAsset("Presentation".to_string())
        );
    }

    #[test]
    fn sequence_resets_on_every_label_change() {
        let items = vec![
            chapter(1, "A"),
            video(1, &["x"]),
            video(2, &["x"]),
            video(3, &["x"]),
            chapter(2, "B"),
            chapter(3, "C"),
            video(4, &["x"]),
            chapter(1, "A"),
            video(5, &["x"]),
        ];
        let plan = build_tasks_and_resolutions(5, &items);

        assert_eq!(
            summary(&plan),
            vec![
                (1, "1 - A", 1),
                (2, "1 - A", 2),
                (3, "1 - A", 3),
                (4, "3 - C", 1),
                (5, "1 - A", 1),
            ]
        );
    }
}
