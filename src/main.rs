use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use udemy_downloader::auth;
use udemy_downloader::common::chooser::InquireChooser;
use udemy_downloader::common::logger::PrettyLogger;
use udemy_downloader::common::models::DownloadPlan;
use udemy_downloader::downloader::{self, VideoDownloader};
use udemy_downloader::parser::{CourseLister, CurriculumResolver};
use udemy_downloader::{log_complete, log_error, log_info, log_step, log_success, log_warning};

mod cli;

fn print_skipped(plan: &DownloadPlan) {
    if plan.skipped.is_empty() {
        return;
    }
    log_warning!("跳过了 {} 个课时:", plan.skipped.len());
    for s in &plan.skipped {
        let chapter = if s.chapter.is_empty() { "-" } else { s.chapter.as_str() };
        println!(
            "    [{}] {} {}: {}",
            chapter, s.lecture_id, s.lecture_title, s.reason
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();
    debug!("命令行参数: {:?}", args);

    // 会话与客户端
    let session = auth::load_session(&args.session, args.access_token.clone(), args.business.clone())
        .await
        .context("加载会话失败")?;
    let authed = auth::get_authed_client(&session).context("创建客户端失败")?;
    let chooser = InquireChooser::new();

    log_step!("获取已订阅课程");
    let lister = CourseLister::new(&authed.client, &authed.endpoints);
    let course = lister
        .select_course(&chooser, args.course_id)
        .await
        .context("选择课程失败")?;
    PrettyLogger::title(&course.title);

    log_step!("解析课程目录");
    let resolver = CurriculumResolver::new(&authed.client, &authed.endpoints);
    let plan = resolver
        .resolve(&course, &chooser, args.quality.as_deref())
        .await
        .context("解析课程目录失败")?;
    PrettyLogger::video_info(&course.title, &plan.quality);
    log_info!("共 {} 个视频待下载", plan.tasks.len());

    if args.plan_only {
        println!("{}", plan.to_json().context("序列化下载计划失败")?);
        print_skipped(&plan);
        return Ok(());
    }

    log_step!("开始下载");
    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| format!("创建输出目录失败: {:?}", args.output_dir))?;
    let download_client = authed.client.download_client().context("创建下载客户端失败")?;
    let executor = VideoDownloader::new(download_client, args.output_dir.clone());
    let summary = downloader::run_plan(&executor, &plan).await;
    PrettyLogger::separator();

    let failed = summary.failed();
    for (lecture_id, reason) in &failed {
        log_error!("课时 {} 下载失败: {}", lecture_id, reason);
    }
    print_skipped(&plan);

    let counts = vec![
        format!("成功: {}", summary.completed()),
        format!("失败: {}", failed.len()),
        format!("跳过: {}", plan.skipped.len()),
    ];
    info!("输出目录: {:?}", args.output_dir);
    match summary.ensure_all_completed() {
        Ok(_) => {
            PrettyLogger::completion_summary(counts);
            log_complete!("{} 全部下载完成", course.title);
            log_success!("完成");
            Ok(())
        }
        Err(e) => {
            PrettyLogger::failure_summary(counts);
            Err(e.into())
        }
    }
}
