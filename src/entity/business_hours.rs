use crate::entity::datetime::{format_minute_of_day, parse_minute_of_day};
use crate::entity::error::ScheduleError;
use chrono::Weekday;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessHoursRule {
    day_of_week: Weekday,
    is_open: bool,
    // 休業日は0
    open_minute: u32,
    close_minute: u32,
}

impl BusinessHoursRule {
    pub fn open(day_of_week: Weekday, open_time: &str, close_time: &str) -> Result<Self, ScheduleError> {
        let open_minute = parse_minute_of_day(open_time)?;
        let close_minute = parse_minute_of_day(close_time)?;

        if open_minute >= close_minute {
            return Err(ScheduleError::CloseNotAfterOpen {
                day: day_of_week.to_string(),
                open: open_time.to_string(),
                close: close_time.to_string(),
            });
        }

        Ok(Self {
            day_of_week,
            is_open: true,
            open_minute,
            close_minute,
        })
    }

    pub fn closed(day_of_week: Weekday) -> Self {
        Self {
            day_of_week,
            is_open: false,
            open_minute: 0,
            close_minute: 0,
        }
    }

    pub fn get_day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn get_open_minute(&self) -> u32 {
        self.open_minute
    }

    pub fn get_close_minute(&self) -> u32 {
        self.close_minute
    }

    pub fn get_open_time(&self) -> String {
        format_minute_of_day(self.open_minute)
    }

    pub fn get_close_time(&self) -> String {
        format_minute_of_day(self.close_minute)
    }
}

// 曜日ごとに高々1つのルールを持つ
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusinessHoursTable {
    rules: HashMap<Weekday, BusinessHoursRule>,
}

impl BusinessHoursTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<BusinessHoursRule>) -> Result<Self, ScheduleError> {
        let mut table = Self::new();
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, rule: BusinessHoursRule) -> Result<(), ScheduleError> {
        let day_of_week = rule.get_day_of_week();
        if self.rules.contains_key(&day_of_week) {
            return Err(ScheduleError::DuplicateWeekday(day_of_week.to_string()));
        }

        self.rules.insert(day_of_week, rule);
        Ok(())
    }

    pub fn get(&self, day_of_week: Weekday) -> Option<&BusinessHoursRule> {
        self.rules.get(&day_of_week)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[test]
fn test_open_開店時刻と閉店時刻が分に変換されること() {
    let rule = BusinessHoursRule::open(Weekday::Mon, "09:00", "17:30").unwrap();

    assert!(rule.is_open());
    assert_eq!(rule.get_open_minute(), 9 * 60);
    assert_eq!(rule.get_close_minute(), 17 * 60 + 30);
    assert_eq!(rule.get_close_time(), "17:30");
}

#[test]
fn test_open_閉店時刻が開店時刻以前の場合はエラー() {
    let actual = BusinessHoursRule::open(Weekday::Mon, "12:00", "09:00");
    assert!(matches!(actual, Err(ScheduleError::CloseNotAfterOpen { .. })));

    let actual = BusinessHoursRule::open(Weekday::Mon, "09:00", "09:00");
    assert!(matches!(actual, Err(ScheduleError::CloseNotAfterOpen { .. })));
}

#[test]
fn test_open_不正な時刻はエラー() {
    let actual = BusinessHoursRule::open(Weekday::Mon, "9am", "17:00");
    assert!(matches!(actual, Err(ScheduleError::InvalidTime(_))));
}

#[test]
fn test_insert_同じ曜日を2回登録するとエラー() {
    let mut table = BusinessHoursTable::new();
    table.insert(BusinessHoursRule::closed(Weekday::Sun)).unwrap();

    let actual = table.insert(BusinessHoursRule::open(Weekday::Sun, "10:00", "12:00").unwrap());
    assert!(matches!(actual, Err(ScheduleError::DuplicateWeekday(_))));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_get_登録されていない曜日はnone() {
    let table =
        BusinessHoursTable::from_rules(vec![BusinessHoursRule::closed(Weekday::Sun)]).unwrap();

    assert!(table.get(Weekday::Sun).is_some());
    assert!(table.get(Weekday::Mon).is_none());
}
