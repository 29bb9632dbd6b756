use crate::entity::datetime::format_minute_of_day;
use crate::entity::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const TOUR_STOP_MINUTES: u32 = 30;

// 1回のツアー申し込みに付く相関ID。DBの採番ではない
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourGroupId(Uuid);

impl TourGroupId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn get_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TourGroupId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourStop {
    property_id: String,
    offset_minutes: u32,
    start_minute: u32,
}

impl TourStop {
    pub fn new(property_id: String, offset_minutes: u32, start_minute: u32) -> Self {
        Self {
            property_id,
            offset_minutes,
            start_minute,
        }
    }

    pub fn get_property_id(&self) -> &str {
        &self.property_id
    }

    pub fn get_offset_minutes(&self) -> u32 {
        self.offset_minutes
    }

    pub fn get_start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn get_start_time(&self) -> String {
        format_minute_of_day(self.start_minute)
    }

    pub fn get_end_minute(&self) -> u32 {
        self.start_minute + TOUR_STOP_MINUTES
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourPlan {
    slot: TimeSlot,
    tour_group_id: TourGroupId,
    stops: Vec<TourStop>,
}

impl TourPlan {
    pub fn new(slot: TimeSlot, tour_group_id: TourGroupId, stops: Vec<TourStop>) -> Self {
        Self {
            slot,
            tour_group_id,
            stops,
        }
    }

    pub fn get_slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn get_tour_group_id(&self) -> TourGroupId {
        self.tour_group_id
    }

    pub fn get_stops(&self) -> &Vec<TourStop> {
        &self.stops
    }
}

#[test]
fn test_generate_毎回異なるidになること() {
    assert_ne!(TourGroupId::generate(), TourGroupId::generate());
}

#[test]
fn test_tour_stop_終了は開始の30分後() {
    let stop = TourStop::new("p-1".to_string(), 30, 10 * 60 + 30);
    assert_eq!(stop.get_start_time(), "10:30");
    assert_eq!(stop.get_end_minute(), 11 * 60);
}
