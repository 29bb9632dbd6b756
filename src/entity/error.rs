use thiserror::Error;

// 営業時間テーブルの読み込み・解釈で起きるエラー
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid slot {0:?}, expected \"HH:MM - HH:MM\"")]
    InvalidSlotLabel(String),

    #[error("invalid day_of_week {0:?}, expected 0..6 or Sun..Sat")]
    InvalidWeekday(String),

    #[error("open_time {open} must be earlier than close_time {close} on {day}")]
    CloseNotAfterOpen {
        day: String,
        open: String,
        close: String,
    },

    #[error("business hours for {0} are defined more than once")]
    DuplicateWeekday(String),

    #[error("missing key {key:?} in business hours entry #{index}")]
    MissingKey { key: &'static str, index: usize },

    #[error("invalid value {value} for key {key:?} in business hours entry #{index}")]
    InvalidValue {
        key: &'static str,
        index: usize,
        value: String,
    },

    #[error("failed to parse business hours yaml: {0}")]
    Yaml(#[from] yaml_rust::ScanError),

    #[error("business hours yaml has no `business_hours` list")]
    MissingTable,

    #[error("unknown agency {0:?}")]
    UnknownAgency(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

// ツアー計画の検証エラー。呼び出し側がフォームに表示する前提
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourPlanError {
    #[error("a tour needs at least one property")]
    NoProperties,

    #[error(
        "This tour requires {required_minutes} minutes ({property_count} properties x 30 minutes), \
         but the selected time slot only has {available_minutes} minutes available. \
         Please select an earlier time slot or reduce the number of properties."
    )]
    CapacityExceeded {
        property_count: usize,
        required_minutes: u32,
        available_minutes: u32,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to serialize appointment: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write appointment: {0}")]
    Io(#[from] std::io::Error),

    #[error("appointment rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Tour(#[from] TourPlanError),

    #[error("slot {slot} is not offered on {date}")]
    SlotNotOffered { date: String, slot: String },

    #[error("an individual appointment takes exactly one property, got {0}")]
    IndividualNeedsOneProperty(usize),
}
