use crate::entity::datetime::{format_minute_of_day, parse_minute_of_day};
use crate::entity::error::ScheduleError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const SLOT_LENGTH_MINUTES: u32 = 60;

// [start, end) を0時からの経過分で持つ
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    start_minute: u32,
    end_minute: u32,
}

impl TimeSlot {
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    pub fn one_hour_from(start_minute: u32) -> Self {
        Self::new(start_minute, start_minute + SLOT_LENGTH_MINUTES)
    }

    pub fn get_start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn get_end_minute(&self) -> u32 {
        self.end_minute
    }

    pub fn get_duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    pub fn get_start_time(&self) -> String {
        format_minute_of_day(self.start_minute)
    }

    pub fn get_end_time(&self) -> String {
        format_minute_of_day(self.end_minute)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.get_start_time(), self.get_end_time())
    }
}

fn slot_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})\s*$").expect("slot label pattern")
    })
}

// "HH:MM - HH:MM" を読む。終了が開始以前のものは受け付けない
impl FromStr for TimeSlot {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = slot_label_pattern()
            .captures(s)
            .ok_or_else(|| ScheduleError::InvalidSlotLabel(s.to_string()))?;

        let start_minute = parse_minute_of_day(&caps[1])?;
        let end_minute = parse_minute_of_day(&caps[2])?;

        if end_minute <= start_minute {
            return Err(ScheduleError::InvalidSlotLabel(s.to_string()));
        }

        Ok(Self::new(start_minute, end_minute))
    }
}

#[test]
fn test_one_hour_from_60分の枠になること() {
    let slot = TimeSlot::one_hour_from(10 * 60);
    assert_eq!(slot.get_end_minute(), 11 * 60);
    assert_eq!(slot.get_duration_minutes(), 60);
}

#[test]
fn test_display_表示形式() {
    let slot = TimeSlot::one_hour_from(9 * 60);
    assert_eq!(slot.to_string(), "09:00 - 10:00");
}

#[test]
fn test_from_str_表示形式を読めること() {
    let actual: TimeSlot = "10:00 - 11:00".parse().unwrap();
    assert_eq!(actual, TimeSlot::new(10 * 60, 11 * 60));
}

#[test]
fn test_from_str_空白の揺れを許すこと() {
    let actual: TimeSlot = " 9:00-10:30 ".parse().unwrap();
    assert_eq!(actual, TimeSlot::new(9 * 60, 10 * 60 + 30));
}

#[test]
fn test_from_str_異常系() {
    assert!("10:00".parse::<TimeSlot>().is_err());
    assert!("11:00 - 10:00".parse::<TimeSlot>().is_err());
    assert!("10:00 - 10:00".parse::<TimeSlot>().is_err());
    assert!("10:00 - 24:30".parse::<TimeSlot>().is_err());
}
