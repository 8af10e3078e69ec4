use super::*;
use chrono::{NaiveDate, Weekday};
use ical::parser::ical::IcalParser;
use std::io::BufReader;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn class_event(title: &str) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start: at(2024, 3, 9, 8, 0),
        end: at(2024, 3, 9, 9, 30),
        recurrence: Some(RecurrenceRule::weekly(Weekday::Sat)),
    }
}

fn exam(title: &str) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start: at(2023, 4, 4, 9, 0),
        end: at(2023, 4, 4, 11, 0),
        recurrence: None,
    }
}

#[test]
fn test_format_timestamp() {
    let ts = format_timestamp(&at(2024, 1, 5, 7, 3));
    assert_eq!(ts, "20240105T070300");
    assert_eq!(ts.len(), 15);

    let with_seconds = NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    assert_eq!(format_timestamp(&with_seconds), "20241231T235900");
}

#[test]
fn test_empty_calendar() {
    let ics = IcsGenerator::default().generate(&[]);
    assert_eq!(
        ics,
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nCALSCALE:GREGORIAN\r\nMETHOD:PUBLISH\r\nEND:VCALENDAR"
    );
}

#[test]
fn test_class_event_block() {
    let ics = IcsGenerator::default().generate(&[class_event("برنامه‌سازی")]);
    let lines: Vec<_> = ics.split(CRLF).collect();

    assert_eq!(
        lines[4..],
        [
            "BEGIN:VEVENT",
            "SUMMARY:برنامه‌سازی",
            "DTSTART;TZID=Asia/Tehran:20240309T080000",
            "DTEND;TZID=Asia/Tehran:20240309T093000",
            "RRULE:FREQ=WEEKLY;BYDAY=SA",
            "END:VEVENT",
            "END:VCALENDAR",
        ]
    );
    // 每一行都以 CRLF 分隔，不存在单独的 LF
    assert!(!ics.replace(CRLF, "").contains('\n'));
}

#[test]
fn test_exam_event_has_no_rrule() {
    let ics = IcsGenerator::default().generate(&[exam("امتحان ریاضی")]);

    assert!(ics.contains("SUMMARY:امتحان ریاضی\r\n"));
    assert!(ics.contains("DTSTART;TZID=Asia/Tehran:20230404T090000\r\n"));
    assert!(ics.contains("DTEND;TZID=Asia/Tehran:20230404T110000\r\n"));
    assert!(!ics.contains("RRULE"));
}

#[test]
fn test_event_order_preserved() {
    let events = [class_event("A"), exam("B"), class_event("C")];
    let ics = IcsGenerator::default().generate(&events);

    let summaries: Vec<_> = ics
        .split(CRLF)
        .filter_map(|l| l.strip_prefix("SUMMARY:"))
        .collect();
    assert_eq!(summaries, ["A", "B", "C"]);
}

#[test]
fn test_title_not_escaped_by_default() {
    let ics = IcsGenerator::default().generate(&[class_event("Math, Part 1; A\\B")]);
    assert!(ics.contains("SUMMARY:Math, Part 1; A\\B\r\n"));
}

#[test]
fn test_title_escaped_when_enabled() {
    let generator = IcsGenerator::new(ExportOptions {
        escape_text: true,
        ..Default::default()
    });
    let ics = generator.generate(&[class_event("Math, Part 1; A\\B\nLab")]);
    assert!(ics.contains("SUMMARY:Math\\, Part 1\\; A\\\\B\\nLab\r\n"));
}

#[test]
fn test_custom_timezone() {
    let generator = IcsGenerator::new(ExportOptions {
        timezone: "Asia/Kabul".to_string(),
        ..Default::default()
    });
    let ics = generator.generate(&[exam("x")]);
    assert!(ics.contains("DTSTART;TZID=Asia/Kabul:"));
    assert!(ics.contains("DTEND;TZID=Asia/Kabul:"));
}

#[test]
fn test_output_parses_as_balanced_calendar() {
    let events = [class_event("A"), exam("امتحان A"), class_event("B")];
    let ics = IcsGenerator::default().generate(&events);

    // ical 解析器要求最后一行也有换行符
    let input = format!("{ics}{CRLF}");
    let calendars: Vec<_> = IcalParser::new(BufReader::new(input.as_bytes()))
        .collect::<Result<_, _>>()
        .expect("生成的ICS应能被解析");

    assert_eq!(calendars.len(), 1);
    let calendar = &calendars[0];
    assert_eq!(calendar.events.len(), 3);

    let summary = |i: usize| {
        calendar.events[i]
            .properties
            .iter()
            .find(|p| p.name == "SUMMARY")
            .and_then(|p| p.value.clone())
    };
    assert_eq!(summary(0).as_deref(), Some("A"));
    assert_eq!(summary(1).as_deref(), Some("امتحان A"));

    let rrules = calendar
        .events
        .iter()
        .filter(|e| e.properties.iter().any(|p| p.name == "RRULE"))
        .count();
    assert_eq!(rrules, 2);
}

#[test]
fn test_begin_end_balanced() {
    let events: Vec<_> = (0..5)
        .map(|i| {
            if i % 2 == 0 {
                class_event(&format!("C{i}"))
            } else {
                exam(&format!("E{i}"))
            }
        })
        .collect();
    let ics = IcsGenerator::default().generate(&events);

    let mut stack = Vec::new();
    for line in ics.split(CRLF) {
        if let Some(name) = line.strip_prefix("BEGIN:") {
            stack.push(name);
        } else if let Some(name) = line.strip_prefix("END:") {
            assert_eq!(stack.pop(), Some(name));
        }
    }
    assert!(stack.is_empty());
}
