use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use schedule_ics_core::{jalali::JalaliDate, prelude::*};

use crate::delivery::{ConsoleNotifier, DirectorySink};

/// 导出命令参数
pub struct ExportParams {
    pub schedules: PathBuf,
    pub id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub now: Option<String>,
    pub exam_label: Option<String>,
    pub escape: bool,
}

/// 预览命令参数
pub struct PreviewParams {
    pub schedules: PathBuf,
    pub id: Option<String>,
    pub now: Option<String>,
    pub exam_label: Option<String>,
    pub escape: bool,
}

fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| anyhow::anyhow!("无效的时间 '{}': {}", s, e))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn build_options(exam_label: Option<String>, escape: bool) -> ExportOptions {
    let defaults = ExportOptions::default();
    ExportOptions {
        exam_label: exam_label.unwrap_or(defaults.exam_label),
        escape_text: escape,
        ..defaults
    }
}

fn load_store(path: &Path, id: Option<String>) -> Result<(ScheduleStore, ScheduleId)> {
    let store = ScheduleStore::from_path(path)?;
    let id = store
        .resolve_id(id.map(ScheduleId::new))
        .ok_or_else(|| anyhow::anyhow!("未指定课表ID，且课表文件中没有当前选中的课表"))?;
    Ok((store, id))
}

/// 导出课表为ICS文件
pub fn export_command(params: ExportParams) -> Result<()> {
    let (store, id) = load_store(&params.schedules, params.id)?;
    let now = parse_now(params.now.as_deref())?;

    tracing::info!(
        "开始导出课表: 文件={}, 课表={}",
        params.schedules.display(),
        id
    );

    let mut sink = match params.output_dir {
        Some(dir) => DirectorySink::new(dir)?,
        None => DirectorySink::with_default_dir()?,
    };
    let exporter = Exporter::new(build_options(params.exam_label, params.escape));

    match exporter.export(&store, &id, now, &mut sink, &mut ConsoleNotifier) {
        ExportOutcome::Delivered { filename } => {
            println!("✓ ICS文件已保存到: {}", sink.dir().join(filename).display());
            Ok(())
        }
        ExportOutcome::Skipped => {
            println!("未找到课表 {}，未生成文件", id);
            Ok(())
        }
        ExportOutcome::Failed => Err(anyhow::anyhow!("导出课表 {} 失败", id)),
    }
}

/// 将ICS内容输出到标准输出
pub fn preview_command(params: PreviewParams) -> Result<()> {
    let (store, id) = load_store(&params.schedules, params.id)?;
    let now = parse_now(params.now.as_deref())?;

    let schedule = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("未找到课表: {}", id))?;
    let exporter = Exporter::new(build_options(params.exam_label, params.escape));

    print!("{}", exporter.render(schedule, now)?);
    Ok(())
}

/// 伊朗历日期转换为公历
pub fn jalali_command(date: String) -> Result<()> {
    let jalali = JalaliDate::parse(&date)?;
    let gregorian = jalali.to_gregorian()?;

    println!("{} -> {}", jalali, gregorian.format("%Y-%m-%d"));
    Ok(())
}

/// 列出课表文件中的所有课表
pub fn schedules_command(file: PathBuf) -> Result<()> {
    let store = ScheduleStore::from_path(&file)?;

    println!("课表列表:");
    if store.schedules.is_empty() {
        println!("  暂无课表");
    }
    for schedule in &store.schedules {
        let current = if store.current_schedule_id.as_ref() == Some(&schedule.id) {
            " (当前)"
        } else {
            ""
        };
        let sessions: usize = schedule.courses.iter().map(|c| c.sessions.len()).sum();
        println!(
            "  {}{} - {} 门课程, {} 个上课时段",
            schedule.id,
            current,
            schedule.courses.len(),
            sessions
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_now() {
        let now = parse_now(Some("2024-03-06T10:00:00+03:30")).unwrap();
        assert_eq!(now.to_rfc3339(), "2024-03-06T06:30:00+00:00");
        assert!(parse_now(Some("yesterday")).is_err());
        assert!(parse_now(None).is_ok());
    }

    #[test]
    fn test_build_options() {
        let options = build_options(Some("Exam".to_string()), true);
        assert_eq!(options.exam_label, "Exam");
        assert!(options.escape_text);
        assert_eq!(options.timezone, "Asia/Tehran");

        let options = build_options(None, false);
        assert_eq!(options.exam_label, "امتحان");
    }
}
