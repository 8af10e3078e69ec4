//! 伊朗历（Jalali / 波斯历）到公历的转换
//!
//! 闰年采用基于断点表的 33 年周期算法，与常见的 jalaali 实现结果一致，
//! 适用年份范围为 [`MIN_YEAR`, `MAX_YEAR`)。

use std::{fmt, sync::LazyLock};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::{Error, Result, recurrence::parse_time_of_day};

/// 闰年周期断点
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// 支持的最小年份
pub const MIN_YEAR: i32 = BREAKS[0];
/// 支持的年份上界（不含）
pub const MAX_YEAR: i32 = BREAKS[BREAKS.len() - 1];

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").expect("valid date regex"));

/// 伊朗历日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    /// 年
    pub year: i32,
    /// 月 1..=12
    pub month: u32,
    /// 日
    pub day: u32,
}

/// 某一伊朗历年的基本信息
struct YearInfo {
    /// 距上一个闰年的年数，0 表示本年为闰年
    leap: i32,
    /// 对应的公历年份（该年 Farvardin 1 所在年份）
    gregorian_year: i32,
    /// Farvardin 1 落在公历三月的哪一天
    march_day: u32,
}

fn year_info(year: i32) -> Result<YearInfo> {
    if !(MIN_YEAR..MAX_YEAR).contains(&year) {
        return Err(Error::invalid(format!("Jalali year {year} is out of range")));
    }

    let gregorian_year = year + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if year < jm {
            break;
        }
        leap_j += jump / 33 * 8 + jump % 33 / 4;
        jp = jm;
    }

    let mut n = year - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march_day = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(YearInfo {
        leap,
        gregorian_year,
        march_day: u32::try_from(march_day)
            .map_err(|_| Error::invalid(format!("Jalali year {year} is out of range")))?,
    })
}

/// 是否为伊朗历闰年（Esfand 有 30 天）
pub fn is_leap_year(year: i32) -> Result<bool> {
    Ok(year_info(year)?.leap == 0)
}

/// 某月天数
pub fn month_length(year: i32, month: u32) -> Result<u32> {
    match month {
        1..=6 => Ok(31),
        7..=11 => Ok(30),
        12 if is_leap_year(year)? => Ok(30),
        12 => Ok(29),
        _ => Err(Error::invalid(format!("Jalali month {month} is out of range"))),
    }
}

impl JalaliDate {
    /// 创建并校验日期
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        let length = month_length(year, month)?;
        if day == 0 || day > length {
            return Err(Error::invalid(format!(
                "day {day} is out of range for Jalali {year}/{month:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// 解析 `YYYY/MM/DD`
    pub fn parse(value: &str) -> Result<Self> {
        let caps = DATE_PATTERN.captures(value.trim()).ok_or_else(|| {
            Error::invalid(format!("date '{value}' must look like YYYY/MM/DD"))
        })?;

        let number = |i: usize| -> Result<u32> {
            caps[i]
                .parse()
                .map_err(|_| Error::invalid(format!("date '{value}' is not numeric")))
        };
        let year = i32::try_from(number(1)?)
            .map_err(|_| Error::invalid(format!("date '{value}' is out of range")))?;

        Self::new(year, number(2)?, number(3)?)
    }

    /// 转换为公历日期
    pub fn to_gregorian(self) -> Result<NaiveDate> {
        let info = year_info(self.year)?;
        let nowruz = NaiveDate::from_ymd_opt(info.gregorian_year, 3, info.march_day)
            .ok_or_else(|| Error::invalid(format!("Jalali year {} is out of range", self.year)))?;

        // 前六个月每月 31 天，之后每月 30 天
        let month = i64::from(self.month);
        let day_of_year = (month - 1) * 31 - month / 7 * (month - 7) + i64::from(self.day) - 1;

        Ok(nowruz + Duration::days(day_of_year))
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// 解析伊朗历日期 + 24 小时制时间，得到公历本地时间
pub fn parse_jalali_datetime(date: &str, time: &str) -> Result<NaiveDateTime> {
    let date = JalaliDate::parse(date)?.to_gregorian()?;
    let time = parse_time_of_day(time)?;
    Ok(date.and_time(time))
}
