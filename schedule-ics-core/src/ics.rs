use chrono::NaiveDateTime;

use crate::{CalendarEvent, ExportOptions, RecurrenceRule, recurrence::weekday_token};

#[cfg(test)]
mod tests;

/// ICS 行结束符
pub const CRLF: &str = "\r\n";

/// ICS 文件的 MIME 类型
pub const MIME_TYPE: &str = "text/calendar";

const HEADER: [&str; 4] = [
    "BEGIN:VCALENDAR",
    "VERSION:2.0",
    "CALSCALE:GREGORIAN",
    "METHOD:PUBLISH",
];

const FOOTER: &str = "END:VCALENDAR";

/// 格式化为 `YYYYMMDDTHHMMSS`，秒固定为 00
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M00").to_string()
}

/// ICS日历生成器
pub struct IcsGenerator {
    options: ExportOptions,
}

impl IcsGenerator {
    /// 使用给定选项创建生成器
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// 生成ICS日历内容，事件按传入顺序输出
    pub fn generate(&self, events: &[CalendarEvent]) -> String {
        let mut lines: Vec<String> = HEADER.iter().map(ToString::to_string).collect();

        for event in events {
            self.add_event(&mut lines, event);
        }

        lines.push(FOOTER.to_string());
        lines.join(CRLF)
    }

    /// 添加单个事件
    fn add_event(&self, lines: &mut Vec<String>, event: &CalendarEvent) {
        let tzid = &self.options.timezone;

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("SUMMARY:{}", self.summary(&event.title)));
        lines.push(format!(
            "DTSTART;TZID={tzid}:{}",
            format_timestamp(&event.start)
        ));
        lines.push(format!("DTEND;TZID={tzid}:{}", format_timestamp(&event.end)));

        if let Some(ref recurrence) = event.recurrence {
            lines.push(Self::recurrence_rule(recurrence));
        }

        lines.push("END:VEVENT".to_string());
    }

    fn summary(&self, title: &str) -> String {
        if self.options.escape_text {
            escape_text(title)
        } else {
            title.to_string()
        }
    }

    fn recurrence_rule(recurrence: &RecurrenceRule) -> String {
        format!(
            "RRULE:FREQ={};BYDAY={}",
            recurrence.frequency,
            weekday_token(recurrence.by_day)
        )
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// 转义ICS文本内容
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
