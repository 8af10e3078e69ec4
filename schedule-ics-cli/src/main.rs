mod commands;
mod delivery;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "schedule-ics")]
#[command(about = "课表导出ICS日历工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 启用详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 导出课表为ICS文件
    Export {
        /// 课表JSON文件
        #[arg(short, long)]
        schedules: PathBuf,

        /// 课表ID，默认使用文件中当前选中的课表
        #[arg(short, long)]
        id: Option<String>,

        /// 输出目录（默认读取 SCHEDULE_ICS_OUTPUT_DIR，其次为下载目录）
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// 参考时间（RFC 3339），默认为当前时间
        #[arg(long)]
        now: Option<String>,

        /// 考试事件标题前缀
        #[arg(long)]
        exam_label: Option<String>,

        /// 转义标题中的 `,` `;` `\` 和换行
        #[arg(long)]
        escape: bool,
    },

    /// 在终端预览ICS内容
    Preview {
        /// 课表JSON文件
        #[arg(short, long)]
        schedules: PathBuf,

        /// 课表ID
        #[arg(short, long)]
        id: Option<String>,

        /// 参考时间（RFC 3339）
        #[arg(long)]
        now: Option<String>,

        /// 考试事件标题前缀
        #[arg(long)]
        exam_label: Option<String>,

        /// 转义标题中的保留字符
        #[arg(long)]
        escape: bool,
    },

    /// 伊朗历日期转公历
    Jalali {
        /// 日期，格式 YYYY/MM/DD
        date: String,
    },

    /// 列出课表文件中的课表
    Schedules {
        /// 课表JSON文件
        #[arg(short, long)]
        schedules: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("schedule_ics_cli={log_level},schedule_ics_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Export {
            schedules,
            id,
            output_dir,
            now,
            exam_label,
            escape,
        } => commands::export_command(commands::ExportParams {
            schedules,
            id,
            output_dir,
            now,
            exam_label,
            escape,
        }),

        Commands::Preview {
            schedules,
            id,
            now,
            exam_label,
            escape,
        } => commands::preview_command(commands::PreviewParams {
            schedules,
            id,
            now,
            exam_label,
            escape,
        }),

        Commands::Jalali { date } => commands::jalali_command(date),

        Commands::Schedules { schedules } => commands::schedules_command(schedules),
    }
}
