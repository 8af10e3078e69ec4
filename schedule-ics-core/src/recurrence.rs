use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::{Error, Result};

/// BYDAY 取值，下标 0=Sunday
const WEEKDAY_TOKENS: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// 将 0=Sunday..6=Saturday 的下标转换为星期
pub fn weekday_from_index(day_of_week: u8) -> Result<Weekday> {
    match day_of_week {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(Error::invalid(format!(
            "day of week must be in 0..=6, got {day_of_week}"
        ))),
    }
}

/// RRULE 中使用的两字母星期标记
pub fn weekday_token(weekday: Weekday) -> &'static str {
    WEEKDAY_TOKENS[weekday.num_days_from_sunday() as usize]
}

/// 返回 `today` 当天或之后第一个落在 `day_of_week` 的日期
///
/// 若今天就是目标星期，则返回今天。
pub fn next_occurrence(day_of_week: u8, today: NaiveDate) -> Result<NaiveDate> {
    let target = weekday_from_index(day_of_week)?;
    let diff = (target.num_days_from_sunday() + 7 - today.weekday().num_days_from_sunday()) % 7;
    Ok(today + Duration::days(i64::from(diff)))
}

/// 解析 `H:MM` / `HH:MM` 形式的时刻
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let (hour, minute) = value
        .split_once(':')
        .filter(|(_, rest)| !rest.contains(':'))
        .ok_or_else(|| Error::invalid(format!("time '{value}' must look like H:MM")))?;

    let hour = parse_component(hour, value)?;
    let minute = parse_component(minute, value)?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::invalid(format!("time '{value}' is out of range")))
}

fn parse_component(part: &str, whole: &str) -> Result<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid(format!(
            "time '{whole}' has a non-numeric component '{part}'"
        )));
    }
    part.parse()
        .map_err(|_| Error::invalid(format!("time '{whole}' has an oversized component")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_occurrence_every_weekday() {
        // 2024-03-06 是星期三
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        for offset in 0..7 {
            let today = today + Duration::days(offset);
            for day in 0..7u8 {
                let next = next_occurrence(day, today).unwrap();
                assert_eq!(next.weekday().num_days_from_sunday(), u32::from(day));
                assert!(next >= today);
                assert!(next <= today + Duration::days(6));
            }
        }
    }

    #[test]
    fn test_next_occurrence_today_counts() {
        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(next_occurrence(3, wednesday).unwrap(), wednesday);
        assert_eq!(
            next_occurrence(2, wednesday).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
        );
        // 跨年
        let new_years_eve = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            next_occurrence(0, new_years_eve).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_next_occurrence_rejects_out_of_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert!(matches!(
            next_occurrence(7, today),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_weekday_tokens() {
        let tokens: Vec<_> = (0..7u8)
            .map(|d| weekday_token(weekday_from_index(d).unwrap()))
            .collect();
        assert_eq!(tokens, ["SU", "MO", "TU", "WE", "TH", "FR", "SA"]);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("8:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("13:05").unwrap(),
            NaiveTime::from_hms_opt(13, 5, 0).unwrap()
        );

        for bad in ["", "8", "8:30:00", "a:30", "8:-1", "+8:00", "25:00", "10:60", " 8:00"] {
            assert!(
                matches!(parse_time_of_day(bad), Err(Error::InvalidInput(_))),
                "'{bad}' 应该解析失败"
            );
        }
    }
}
