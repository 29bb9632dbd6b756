use crate::entity::time_slot::TimeSlot;
use crate::entity::tour::{TourGroupId, TourPlan};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
use crate::entity::slot_planner::plan_tour;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentMode {
    Individual,
    Tour,
}

impl fmt::Display for AppointmentMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppointmentMode::Individual => write!(f, "individual"),
            AppointmentMode::Tour => write!(f, "tour"),
        }
    }
}

pub fn read_appointment_mode(s: &str) -> Option<AppointmentMode> {
    match s.to_lowercase().as_str() {
        "individual" => Some(AppointmentMode::Individual),
        "tour" => Some(AppointmentMode::Tour),
        _ => None,
    }
}

// 予約APIに1件ずつ渡すリクエスト
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub property_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub appointment_mode: AppointmentMode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tour_group_id: Option<TourGroupId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

pub fn individual_payload(
    property_id: &str,
    date: NaiveDate,
    slot: &TimeSlot,
    notes: Option<String>,
) -> AppointmentPayload {
    AppointmentPayload {
        property_id: property_id.to_string(),
        date,
        time: slot.get_start_time(),
        appointment_mode: AppointmentMode::Individual,
        tour_group_id: None,
        notes,
    }
}

pub fn tour_payloads(
    plan: &TourPlan,
    date: NaiveDate,
    notes: Option<String>,
) -> Vec<AppointmentPayload> {
    plan.get_stops()
        .iter()
        .map(|stop| AppointmentPayload {
            property_id: stop.get_property_id().to_string(),
            date,
            time: stop.get_start_time(),
            appointment_mode: AppointmentMode::Tour,
            tour_group_id: Some(plan.get_tour_group_id()),
            notes: notes.clone(),
        })
        .collect()
}

#[test]
fn test_read_appointment_mode_大文字小文字を区別しないこと() {
    assert_eq!(read_appointment_mode("Tour"), Some(AppointmentMode::Tour));
    assert_eq!(
        read_appointment_mode("individual"),
        Some(AppointmentMode::Individual)
    );
    assert_eq!(read_appointment_mode("group"), None);
}

#[test]
fn test_individual_payload_枠の開始時刻で予約されること() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let slot = TimeSlot::one_hour_from(14 * 60);

    let actual = individual_payload("p-9", date, &slot, None);
    assert_eq!(actual.time, "14:00");
    assert_eq!(actual.appointment_mode, AppointmentMode::Individual);
    assert_eq!(actual.tour_group_id, None);
}

#[test]
fn test_tour_payloads_全件が同じtour_group_idを持つこと() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let slot = TimeSlot::new(10 * 60, 12 * 60);
    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let plan = plan_tour(&slot, &ids).unwrap();

    let actual = tour_payloads(&plan, date, Some("鍵は管理人室".to_string()));
    let times: Vec<&str> = actual.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(times, vec!["10:00", "10:30", "11:00"]);
    assert!(actual
        .iter()
        .all(|p| p.tour_group_id == Some(plan.get_tour_group_id())));
    assert!(actual.iter().all(|p| p.appointment_mode == AppointmentMode::Tour));
}

#[test]
fn test_serialize_camel_caseで出力されること() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let slot = TimeSlot::one_hour_from(9 * 60);
    let payload = individual_payload("p-1", date, &slot, None);

    let actual = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        actual,
        serde_json::json!({
            "propertyId": "p-1",
            "date": "2024-01-01",
            "time": "09:00",
            "appointmentMode": "individual",
        })
    );
}

#[test]
fn test_serialize_ツアーはtour_group_idを含むこと() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let slot = TimeSlot::one_hour_from(9 * 60);
    let plan = plan_tour(&slot, &["p-1".to_string()]).unwrap();
    let payloads = tour_payloads(&plan, date, None);

    let actual = serde_json::to_value(&payloads[0]).unwrap();
    assert_eq!(actual["appointmentMode"], "tour");
    assert_eq!(
        actual["tourGroupId"],
        plan.get_tour_group_id().to_string().as_str()
    );
}
