use clap::Parser;
use std::path::PathBuf;

/// Udemy 课程下载器
#[derive(Parser, Debug)]
#[command(name = "udemydl")]
#[command(version = "0.1")]
#[command(about = "浏览已订阅的 Udemy 课程并按章节下载课程视频", long_about = None)]
pub struct Cli {
    /// 会话文件 (包含 cookies / csrf / access_token / client_id / business)
    #[arg(long, value_name = "FILE")]
    #[arg(default_value = "session.json")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub session: PathBuf,

    /// 覆盖会话文件中的 access_token
    #[arg(long, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// 企业版子域名，例如 acme 对应 https://acme.udemy.com
    #[arg(long, value_name = "SUBDOMAIN")]
    pub business: Option<String>,

    /// 视频保存目录
    #[arg(long, value_name = "DIR")]
    #[arg(default_value = ".")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// 直接指定课程 ID，不再交互选择
    #[arg(long, value_name = "ID")]
    pub course_id: Option<i64>,

    /// 直接指定清晰度标签，例如 720p
    #[arg(long, value_name = "LABEL")]
    pub quality: Option<String>,

    /// 只输出下载计划 (JSON)，不下载
    #[arg(long)]
    pub plan_only: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}
