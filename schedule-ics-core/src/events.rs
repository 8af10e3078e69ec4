use chrono::{Duration, NaiveDate};

use crate::{
    CalendarEvent, Course, ExportOptions, RecurrenceRule, Result, Schedule, Session,
    jalali::parse_jalali_datetime,
    recurrence::{next_occurrence, parse_time_of_day, weekday_from_index},
};

/// 考试时长（分钟），固定为两小时
pub const EXAM_DURATION_MINUTES: i64 = 120;

/// 为单个上课时段生成每周重复的事件
///
/// 首次上课日期为 `today` 当天或之后第一个匹配的星期。
pub fn session_event(
    course: &Course,
    session: &Session,
    today: NaiveDate,
) -> Result<CalendarEvent> {
    let weekday = weekday_from_index(session.day_of_week)?;
    let date = next_occurrence(session.day_of_week, today)?;
    let start = parse_time_of_day(&session.start_time)?;
    let end = parse_time_of_day(&session.end_time)?;

    Ok(CalendarEvent {
        title: course.name.clone(),
        start: date.and_time(start),
        end: date.and_time(end),
        recurrence: Some(RecurrenceRule::weekly(weekday)),
    })
}

/// 生成期末考试事件，考试日期或时间缺失时返回 `None`
pub fn exam_event(course: &Course, options: &ExportOptions) -> Result<Option<CalendarEvent>> {
    let (Some(date), Some(time)) = (
        non_empty(course.final_exam_date.as_deref()),
        non_empty(course.final_exam_time.as_deref()),
    ) else {
        return Ok(None);
    };

    let start = parse_jalali_datetime(date, time)?;
    let end = start + Duration::minutes(EXAM_DURATION_MINUTES);

    Ok(Some(CalendarEvent {
        title: format!("{} {}", options.exam_label, course.name),
        start,
        end,
        recurrence: None,
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// 按课程顺序生成课表的全部事件：每门课先是上课时段，再是考试
pub fn build_events(
    schedule: &Schedule,
    today: NaiveDate,
    options: &ExportOptions,
) -> Result<Vec<CalendarEvent>> {
    let mut events = Vec::new();

    for course in &schedule.courses {
        for session in &course.sessions {
            let event = session_event(course, session, today)?;
            tracing::debug!(course = %course.name, start = %event.start, "上课事件");
            events.push(event);
        }

        if let Some(event) = exam_event(course, options)? {
            tracing::debug!(course = %course.name, start = %event.start, "考试事件");
            events.push(event);
        }
    }

    Ok(events)
}
