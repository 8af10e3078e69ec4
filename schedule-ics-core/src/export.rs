use chrono::{DateTime, Utc};

use crate::{
    Error, ExportOptions, Result, Schedule, ScheduleId,
    events::build_events,
    ics::{IcsGenerator, MIME_TYPE},
    store::ScheduleStore,
};

/// 课表来源（只读快照）
pub trait ScheduleSource {
    /// 按ID查找课表
    fn find_schedule(&self, id: &ScheduleId) -> Option<&Schedule>;
}

impl ScheduleSource for [Schedule] {
    fn find_schedule(&self, id: &ScheduleId) -> Option<&Schedule> {
        self.iter().find(|s| &s.id == id)
    }
}

impl ScheduleSource for ScheduleStore {
    fn find_schedule(&self, id: &ScheduleId) -> Option<&Schedule> {
        self.get(id)
    }
}

/// 待交付的导出文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// ICS 文本
    pub content: String,
    /// 文件名
    pub filename: String,
    /// MIME 类型
    pub mime_type: &'static str,
}

/// 文件交付端，例如写入磁盘
pub trait FileSink {
    /// 交付文件，失败时不应留下部分写入的内容
    fn deliver(&mut self, file: &ExportFile) -> Result<()>;
}

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 成功
    Success,
    /// 失败
    Error,
}

/// 用户提示
pub trait Notifier {
    /// 显示一条提示
    fn notify(&mut self, message: &str, severity: Severity);
}

/// 一次导出的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// 已交付，附带文件名
    Delivered { filename: String },
    /// 课表不存在，什么也不做
    Skipped,
    /// 生成或交付失败，已给出通用提示
    Failed,
}

/// `schedule-<毫秒时间戳>.ics`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("schedule-{}.ics", now.timestamp_millis())
}

/// 课表导出器
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// 使用给定选项创建导出器
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// 生成课表的ICS内容，`now` 决定每个上课时段的首次日期
    pub fn render(&self, schedule: &Schedule, now: DateTime<Utc>) -> Result<String> {
        let today = now.with_timezone(&self.options.offset()?).date_naive();
        let events = build_events(schedule, today, &self.options)?;

        tracing::debug!(schedule = %schedule.id, events = events.len(), %today, "生成ICS");
        Ok(IcsGenerator::new(self.options.clone()).generate(&events))
    }

    /// 查找课表、生成ICS并交付
    ///
    /// 课表不存在时静默跳过；其余任何错误都只记录日志并给出通用的失败提示。
    pub fn export<S, F, N>(
        &self,
        source: &S,
        id: &ScheduleId,
        now: DateTime<Utc>,
        sink: &mut F,
        notifier: &mut N,
    ) -> ExportOutcome
    where
        S: ScheduleSource + ?Sized,
        F: FileSink + ?Sized,
        N: Notifier + ?Sized,
    {
        let Some(schedule) = source.find_schedule(id) else {
            tracing::warn!("{}", Error::MissingSchedule(id.to_string()));
            return ExportOutcome::Skipped;
        };

        match self.deliver(schedule, now, sink) {
            Ok(filename) => {
                tracing::info!(schedule = %id, %filename, "ICS导出成功");
                notifier.notify(&self.options.success_message, Severity::Success);
                ExportOutcome::Delivered { filename }
            }
            Err(e) => {
                tracing::error!(schedule = %id, error = %e, "ICS导出失败");
                notifier.notify(&self.options.failure_message, Severity::Error);
                ExportOutcome::Failed
            }
        }
    }

    fn deliver<F>(&self, schedule: &Schedule, now: DateTime<Utc>, sink: &mut F) -> Result<String>
    where
        F: FileSink + ?Sized,
    {
        let file = ExportFile {
            content: self.render(schedule, now)?,
            filename: export_filename(now),
            mime_type: MIME_TYPE,
        };
        sink.deliver(&file)?;
        Ok(file.filename)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}
