use crate::entity::error::ScheduleError;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// "HH:MM" を0時からの経過分に変換する
pub fn parse_minute_of_day(s: &str) -> Result<u32, ScheduleError> {
    let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(s.to_string()))?;

    Ok(time.hour() * 60 + time.minute())
}

pub fn format_minute_of_day(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}

// 日曜日を0とする曜日番号
pub fn day_of_week_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

// "Mon" / "monday" などを受け付ける
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

#[test]
fn test_parse_minute_of_day_正常系() {
    let actual = parse_minute_of_day("09:30").unwrap();
    assert_eq!(actual, 9 * 60 + 30);
}

#[test]
fn test_parse_minute_of_day_真夜中は0() {
    let actual = parse_minute_of_day("00:00").unwrap();
    assert_eq!(actual, 0);
}

#[test]
fn test_parse_minute_of_day_時刻でない文字列はエラー() {
    assert!(parse_minute_of_day("nine").is_err());
    assert!(parse_minute_of_day("25:00").is_err());
    assert!(parse_minute_of_day("").is_err());
}

#[test]
fn test_format_minute_of_day_ゼロ埋めされること() {
    assert_eq!(format_minute_of_day(9 * 60 + 5), "09:05");
    assert_eq!(format_minute_of_day(23 * 60 + 59), "23:59");
}

#[test]
fn test_parse_date_正常系() {
    let actual = parse_date("2024-01-01").unwrap();
    assert_eq!(actual, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_parse_date_異常系() {
    assert!(parse_date("2024/01/01").is_err());
    assert!(parse_date("2024-02-30").is_err());
}

#[test]
fn test_day_of_week_index_日曜日が0で土曜日が6() {
    assert_eq!(day_of_week_index(Weekday::Sun), 0);
    assert_eq!(day_of_week_index(Weekday::Mon), 1);
    assert_eq!(day_of_week_index(Weekday::Sat), 6);
}

#[test]
fn test_weekday_from_index_範囲外はnone() {
    assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
    assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
    assert_eq!(weekday_from_index(7), None);
    assert_eq!(weekday_from_index(-1), None);
}

#[test]
fn test_weekday_from_index_day_of_week_indexと往復できること() {
    for i in 0..7 {
        let weekday = weekday_from_index(i).unwrap();
        assert_eq!(day_of_week_index(weekday) as i64, i);
    }
}

#[test]
fn test_weekday_from_name_略称と正式名() {
    assert_eq!(weekday_from_name("Mon"), Some(Weekday::Mon));
    assert_eq!(weekday_from_name("sunday"), Some(Weekday::Sun));
    assert_eq!(weekday_from_name("Someday"), None);
}

#[test]
fn test_weekday_of_2024年1月1日は月曜日() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(weekday_of(date), Weekday::Mon);
}
