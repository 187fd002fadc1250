use serde_derive::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::common::chooser::Chooser;
use crate::common::client::client::Transport;
use crate::common::models::DownloadPlan;
use crate::parser::chapter_fold::build_tasks_and_resolutions;
use crate::parser::endpoints::ApiEndpoints;
use crate::parser::errors::ParseError;
use crate::parser::models::{Course, CurriculumItem, Lecture, LectureAsset, VideoVariant};
use crate::parser::stream_selector::{choose_quality, select_quality};
use crate::parser::utils::{lenient, lenient_list};

// ------------------------------------------------------------------------------------
// 接口原始结构，只在本模块内使用

#[derive(Debug, Default, Deserialize)]
struct CurriculumResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "_class", rename_all = "lowercase")]
enum RawItem {
    Chapter {
        #[serde(default, deserialize_with = "lenient")]
        object_index: i64,
        #[serde(default, deserialize_with = "lenient")]
        title: String,
    },
    Lecture(RawLecture),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawLecture {
    id: i64,
    #[serde(default, deserialize_with = "lenient")]
    object_index: i64,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    is_downloadable: bool,
    #[serde(default)]
    asset: Option<RawAsset>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    #[serde(default)]
    asset_type: Option<String>,
    #[serde(default)]
    download_urls: Option<Value>,
    #[serde(default)]
    stream_urls: Option<Value>,
}

// ------------------------------------------------------------------------------------

pub struct CurriculumResolver<'a, T: Transport + ?Sized> {
    client: &'a T,
    endpoints: &'a ApiEndpoints,
}

impl<'a, T: Transport + ?Sized> CurriculumResolver<'a, T> {
    pub fn new(client: &'a T, endpoints: &'a ApiEndpoints) -> Self {
        Self { client, endpoints }
    }

    // 获取课程目录，单次请求，不处理分页
    pub async fn fetch_curriculum(&self, course: &Course) -> Result<Vec<CurriculumItem>, ParseError> {
        let url = self.endpoints.curriculum(course.id);
        let body = self.client.get_bytes(&url).await?;
        let items = parse_curriculum(&body)?;
        debug!("课程 {} 共 {} 个目录条目", course.id, items.len());
        Ok(items)
    }

    /// 获取目录、生成任务、选择清晰度，得到最终的下载计划
    pub async fn resolve(
        &self,
        course: &Course,
        chooser: &dyn Chooser,
        preset_quality: Option<&str>,
    ) -> Result<DownloadPlan, ParseError> {
        let items = self.fetch_curriculum(course).await?;
        let mut plan = build_tasks_and_resolutions(course.id, &items);

        if plan.tasks.is_empty() {
            warn!("课程 {} 没有可下载的视频", course.title);
            return Ok(DownloadPlan {
                course: course.clone(),
                quality: String::new(),
                tasks: Vec::new(),
                skipped: plan.skipped,
            });
        }

        let quality = choose_quality(&plan.resolutions, chooser, preset_quality)?;
        info!("选择清晰度: {}", quality);

        let (tasks, missing) = select_quality(&plan.tasks, &quality);
        plan.skipped.extend(missing);

        Ok(DownloadPlan {
            course: course.clone(),
            quality,
            tasks,
            skipped: plan.skipped,
        })
    }
}

/// 解析目录响应；只有响应体不是 JSON 时才报错，单个条目的问题留给下游处理
pub fn parse_curriculum(body: &[u8]) -> Result<Vec<CurriculumItem>, ParseError> {
    let value: Value = serde_json::from_slice(body)?;
    let resp: CurriculumResponse = serde_json::from_value(value).unwrap_or_default();
    Ok(resp.results.into_iter().map(decode_item).collect())
}

pub fn decode_item(value: Value) -> CurriculumItem {
    let class = value
        .get("_class")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match serde_json::from_value::<RawItem>(value.clone()) {
        Ok(RawItem::Chapter {
            object_index,
            title,
        }) => CurriculumItem::Chapter {
            object_index,
            title,
        },
        Ok(RawItem::Lecture(raw)) => CurriculumItem::Lecture(Lecture {
            id: raw.id,
            object_index: raw.object_index,
            title: raw.title,
            asset: decode_asset(raw.asset, raw.is_downloadable),
        }),
        Ok(RawItem::Other) => CurriculumItem::Other { class },
        Err(e) if class == "lecture" => {
            warn!("课时数据解析失败: {}", e);
            CurriculumItem::Lecture(Lecture {
                id: value.get("id").and_then(Value::as_i64).unwrap_or_default(),
                object_index: value
                    .get("object_index")
                    .and_then(Value::as_i64)
                    .unwrap_or_default(),
                title: value
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                asset: LectureAsset::Malformed {
                    reason: e.to_string(),
                },
            })
        }
        Err(e) => {
            debug!("忽略无法识别的目录条目 ({:?}): {}", class, e);
            CurriculumItem::Other { class }
        }
    }
}

/// 可下载的课时读 download_urls，否则读 stream_urls
fn decode_asset(asset: Option<RawAsset>, is_downloadable: bool) -> LectureAsset {
    let Some(asset) = asset else {
        return LectureAsset::Malformed {
            reason: "缺少 asset".to_string(),
        };
    };

    match asset.asset_type.as_deref() {
        Some("Video") => {}
        Some(other) => {
            return LectureAsset::NonVideo {
                asset_type: other.to_string(),
            };
        }
        None => {
            return LectureAsset::Malformed {
                reason: "缺少 asset_type".to_string(),
            };
        }
    }

    let (field, urls) = if is_downloadable {
        ("download_urls", asset.download_urls)
    } else {
        ("stream_urls", asset.stream_urls)
    };

    let Some(videos) = urls.as_ref().and_then(|u| u.get("Video")) else {
        return LectureAsset::Malformed {
            reason: format!("{} 中没有 Video 列表", field),
        };
    };

    match serde_json::from_value::<Vec<VideoVariant>>(videos.clone()) {
        Ok(variants) if variants.is_empty() => LectureAsset::Malformed {
            reason: format!("{}.Video 为空", field),
        },
        Ok(variants) => LectureAsset::Video(variants),
        Err(e) => LectureAsset::Malformed {
            reason: format!("{}.Video 格式错误: {}", field, e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variants(pairs: &[(&str, &str)]) -> Vec<VideoVariant> {
        pairs
            .iter()
            .map(|(file, label)| VideoVariant {
                file: file.to_string(),
                label: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn decodes_chapter() {
        let item = decode_item(json!({"_class": "chapter", "object_index": 2, "title": "Core", "sort_order": 9}));
        assert_eq!(
            item,
            CurriculumItem::Chapter {
                object_index: 2,
                title: "Core".to_string()
            }
        );
    }

    #[test]
    fn streamable_lecture_reads_stream_urls() {
        let item = decode_item(json!({
            "_class": "lecture",
            "id": 10,
            "object_index": 3,
            "title": "Hello",
            "is_downloadable": false,
            "asset": {
                "asset_type": "Video",
                "download_urls": null,
                "stream_urls": {"Video": [
                    {"type": "video/mp4", "file": "https://s/720.mp4", "label": "720p"},
                    {"type": "video/mp4", "file": "https://s/360.mp4", "label": "360p"}
                ]}
            }
        }));

        assert_eq!(
            item,
            CurriculumItem::Lecture(Lecture {
                id: 10,
                object_index: 3,
                title: "Hello".to_string(),
                asset: LectureAsset::Video(variants(&[
                    ("https://s/720.mp4", "720p"),
                    ("https://s/360.mp4", "360p")
                ])),
            })
        );
    }

    #[test]
    fn downloadable_lecture_reads_download_urls() {
        let item = decode_item(json!({
            "_class": "lecture",
            "id": 11,
            "is_downloadable": true,
            "asset": {
                "asset_type": "Video",
                "download_urls": {"Video": [{"file": "https://d/1080.mp4", "label": "1080p"}]},
                "stream_urls": {"Video": [{"file": "https://s/360.mp4", "label": "360p"}]}
            }
        }));

        match item {
            CurriculumItem::Lecture(lecture) => assert_eq!(
                lecture.asset,
                LectureAsset::Video(variants(&[("https://d/1080.mp4", "1080p")]))
            ),
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn non_video_asset_is_classified() {
        let item = decode_item(json!({
            "_class": "lecture",
            "id": 12,
            "asset": {"asset_type": "Article"}
        }));
        match item {
            CurriculumItem::Lecture(lecture) => assert_eq!(
                lecture.asset,
                LectureAsset::NonVideo {
                    asset_type: "Article".to_string()
                }
            ),
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn missing_variant_collection_is_malformed() {
        for asset in [
            json!({"asset_type": "Video"}),
            json!({"asset_type": "Video", "stream_urls": {"Audio": []}}),
            json!({"asset_type": "Video", "stream_urls": {"Video": []}}),
            json!({"asset_type": "Video", "stream_urls": {"Video": [{"file": 3}]}}),
            json!({"asset_type": "Video", "stream_urls": "nope"}),
        ] {
            let item = decode_item(json!({"_class": "lecture", "id": 13, "asset": asset}));
            match item {
                CurriculumItem::Lecture(lecture) => {
                    assert_eq!(lecture.id, 13);
                    assert!(
                        matches!(lecture.asset, LectureAsset::Malformed { .. }),
                        "{:?}",
                        lecture.asset
                    );
                }
                other => panic!("unexpected item {:?}", other),
            }
        }
    }

    #[test]
    fn lecture_without_id_is_malformed_not_fatal() {
        let item = decode_item(json!({"_class": "lecture", "id": "abc", "title": "T"}));
        match item {
            CurriculumItem::Lecture(lecture) => {
                assert_eq!(lecture.id, 0);
                assert_eq!(lecture.title, "T");
                assert!(matches!(lecture.asset, LectureAsset::Malformed { .. }));
            }
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn other_classes_are_kept_as_other() {
        assert_eq!(
            decode_item(json!({"_class": "quiz", "id": 1, "title": "Q"})),
            CurriculumItem::Other {
                class: "quiz".to_string()
            }
        );
        assert_eq!(
            decode_item(json!({"id": 1})),
            CurriculumItem::Other {
                class: String::new()
            }
        );
    }

    #[test]
    fn parse_curriculum_keeps_response_order() {
        let body = json!({"results": [
            {"_class": "chapter", "object_index": 1, "title": "A"},
            {"_class": "practice", "id": 5},
            {"_class": "lecture", "id": 6, "asset": {"asset_type": "File"}}
        ]})
        .to_string();
        let items = parse_curriculum(body.as_bytes()).unwrap();

        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], CurriculumItem::Chapter { .. }));
        assert!(matches!(items[1], CurriculumItem::Other { .. }));
        assert!(matches!(items[2], CurriculumItem::Lecture(_)));
    }

    #[test]
    fn parse_curriculum_rejects_non_json() {
        assert!(matches!(
            parse_curriculum(b"Bad Gateway"),
            Err(ParseError::DecodeError(_))
        ));
        assert!(parse_curriculum(b"{\"detail\": \"x\"}").unwrap().is_empty());
    }
}
