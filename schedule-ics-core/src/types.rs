use std::fmt;

use chrono::{FixedOffset, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 课表ID，兼容前端保存的数字或字符串形式
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawScheduleId")]
pub struct ScheduleId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScheduleId {
    Text(String),
    Number(i64),
}

impl From<RawScheduleId> for ScheduleId {
    fn from(raw: RawScheduleId) -> Self {
        match raw {
            RawScheduleId::Text(s) => Self(s),
            RawScheduleId::Number(n) => Self(n.to_string()),
        }
    }
}

impl ScheduleId {
    /// 由字符串创建
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 课表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// 课表ID
    pub id: ScheduleId,
    /// 课程，按添加顺序
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// 课程信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// 课程名称
    #[serde(rename = "courseName")]
    pub name: String,
    /// 每周上课时段
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// 期末考试日期 (伊朗历 YYYY/MM/DD)
    #[serde(default)]
    pub final_exam_date: Option<String>,
    /// 期末考试时间 (HH:mm)
    #[serde(default)]
    pub final_exam_time: Option<String>,
}

/// 每周重复的上课时段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 星期几 - 0=Sunday, 6=Saturday
    pub day_of_week: u8,
    /// 开始时间 (H:MM)
    pub start_time: String,
    /// 结束时间 (H:MM)
    pub end_time: String,
}

/// 重复规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// 重复频率 (WEEKLY)
    pub frequency: String,
    /// 星期几 (BYDAY)
    pub by_day: Weekday,
}

impl RecurrenceRule {
    /// 每周一次
    pub fn weekly(by_day: Weekday) -> Self {
        Self {
            frequency: "WEEKLY".to_string(),
            by_day,
        }
    }
}

/// 日历事件，时间均为 `ExportOptions::timezone` 下的本地时间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// SUMMARY
    pub title: String,
    /// 开始时间
    pub start: NaiveDateTime,
    /// 结束时间
    pub end: NaiveDateTime,
    /// 仅上课事件有重复规则
    pub recurrence: Option<RecurrenceRule>,
}

/// ICS导出选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// 时区标识 (TZID)
    pub timezone: String,
    /// 该时区相对UTC的偏移（秒），用于计算"今天"
    pub utc_offset_seconds: i32,
    /// 考试事件标题前缀
    pub exam_label: String,
    /// 是否转义SUMMARY中的保留字符
    pub escape_text: bool,
    /// 导出成功提示
    pub success_message: String,
    /// 导出失败提示
    pub failure_message: String,
}

impl ExportOptions {
    /// 时区偏移
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            Error::Config(format!(
                "UTC offset out of range: {} seconds",
                self.utc_offset_seconds
            ))
        })
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tehran".to_string(),
            utc_offset_seconds: 3 * 3600 + 30 * 60,
            exam_label: "امتحان".to_string(),
            escape_text: false,
            success_message: "خروجی با موفقیت ذخیره شد.".to_string(),
            failure_message: "خطا در ساخت فایل خروجی.".to_string(),
        }
    }
}
