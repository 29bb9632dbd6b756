use crate::application::interface::{AppointmentSubmitterTrait, BusinessHoursSourceTrait};
use crate::entity::appointment::{
    individual_payload, tour_payloads, AppointmentMode, AppointmentPayload,
};
use crate::entity::error::{BookingError, SubmitError};
use crate::entity::slot_planner::{generate_slots, plan_tour};
use crate::entity::time_slot::TimeSlot;
use chrono::NaiveDate;

#[cfg(test)]
use crate::entity::business_hours::{BusinessHoursRule, BusinessHoursTable};

#[cfg(test)]
use crate::entity::error::{ScheduleError, TourPlanError};

#[cfg(test)]
use chrono::Weekday;

#[derive(Clone, Debug)]
pub struct BookingRequest {
    pub agency_id: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub property_ids: Vec<String>,
    pub mode: AppointmentMode,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct SubmissionReport {
    submitted: Vec<AppointmentPayload>,
    failed: Vec<(AppointmentPayload, SubmitError)>,
}

impl SubmissionReport {
    pub fn get_submitted(&self) -> &Vec<AppointmentPayload> {
        &self.submitted
    }

    pub fn get_failed(&self) -> &Vec<(AppointmentPayload, SubmitError)> {
        &self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    // 一部だけ登録された状態。ロールバックはしない
    pub fn is_partial(&self) -> bool {
        !self.submitted.is_empty() && !self.failed.is_empty()
    }
}

// 計画の検証エラーは何も送る前に返す
// 送信を始めたら全件試し、失敗はreportに集める。送信済みのものは取り消さない
pub fn book_appointment(
    source: &dyn BusinessHoursSourceTrait,
    submitter: &mut dyn AppointmentSubmitterTrait,
    request: &BookingRequest,
) -> Result<SubmissionReport, BookingError> {
    let payloads = build_payloads(source, request)?;
    Ok(submit_all(submitter, payloads))
}

pub fn build_payloads(
    source: &dyn BusinessHoursSourceTrait,
    request: &BookingRequest,
) -> Result<Vec<AppointmentPayload>, BookingError> {
    let table = source.fetch(&request.agency_id)?;
    let offered = generate_slots(request.date, &table);

    if !offered.contains(&request.slot) {
        return Err(BookingError::SlotNotOffered {
            date: request.date.to_string(),
            slot: request.slot.to_string(),
        });
    }

    match request.mode {
        AppointmentMode::Individual => match request.property_ids.as_slice() {
            [property_id] => Ok(vec![individual_payload(
                property_id,
                request.date,
                &request.slot,
                request.notes.clone(),
            )]),
            ids => Err(BookingError::IndividualNeedsOneProperty(ids.len())),
        },
        AppointmentMode::Tour => {
            let plan = plan_tour(&request.slot, &request.property_ids)?;
            log::info!(
                "tour {} planned: {} stops from {}",
                plan.get_tour_group_id(),
                plan.get_stops().len(),
                request.slot.get_start_time()
            );
            Ok(tour_payloads(&plan, request.date, request.notes.clone()))
        }
    }
}

pub fn submit_all(
    submitter: &mut dyn AppointmentSubmitterTrait,
    payloads: Vec<AppointmentPayload>,
) -> SubmissionReport {
    let mut report = SubmissionReport::default();

    for payload in payloads {
        match submitter.submit(&payload) {
            Ok(()) => {
                log::debug!("submitted {} at {}", payload.property_id, payload.time);
                report.submitted.push(payload);
            }
            Err(err) => {
                log::warn!(
                    "failed to submit {} at {}: {}",
                    payload.property_id,
                    payload.time,
                    err
                );
                report.failed.push((payload, err));
            }
        }
    }

    if report.is_partial() {
        log::warn!(
            "partially submitted: {} succeeded, {} failed",
            report.submitted.len(),
            report.failed.len()
        );
    }
    report
}

#[cfg(test)]
struct FixedSource(BusinessHoursTable);

#[cfg(test)]
impl BusinessHoursSourceTrait for FixedSource {
    fn fetch(&self, _agency_id: &str) -> Result<BusinessHoursTable, ScheduleError> {
        Ok(self.0.clone())
    }
}

// reject_property_idに一致する物件だけ失敗させる
#[cfg(test)]
#[derive(Default)]
struct RecordingSubmitter {
    reject_property_id: Option<String>,
    received: Vec<AppointmentPayload>,
}

#[cfg(test)]
impl AppointmentSubmitterTrait for RecordingSubmitter {
    fn submit(&mut self, payload: &AppointmentPayload) -> Result<(), SubmitError> {
        if self.reject_property_id.as_deref() == Some(payload.property_id.as_str()) {
            return Err(SubmitError::Rejected("property is unavailable".to_string()));
        }
        self.received.push(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
fn monday_source() -> FixedSource {
    FixedSource(
        BusinessHoursTable::from_rules(vec![
            BusinessHoursRule::open(Weekday::Mon, "09:00", "12:00").unwrap()
        ])
        .unwrap(),
    )
}

#[cfg(test)]
fn request(slot: &str, property_ids: &[&str], mode: AppointmentMode) -> BookingRequest {
    BookingRequest {
        agency_id: "agency-1".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        slot: slot.parse().unwrap(),
        property_ids: property_ids.iter().map(|s| s.to_string()).collect(),
        mode,
        notes: None,
    }
}

#[test]
fn test_book_appointment_個別予約は1件送られること() {
    let mut submitter = RecordingSubmitter::default();
    let req = request("10:00 - 11:00", &["p-1"], AppointmentMode::Individual);

    let report = book_appointment(&monday_source(), &mut submitter, &req).unwrap();
    assert!(report.is_complete());
    assert_eq!(submitter.received.len(), 1);
    assert_eq!(submitter.received[0].time, "10:00");
}

#[test]
fn test_book_appointment_個別予約で物件が複数の場合はエラー() {
    let mut submitter = RecordingSubmitter::default();
    let req = request("10:00 - 11:00", &["p-1", "p-2"], AppointmentMode::Individual);

    let actual = book_appointment(&monday_source(), &mut submitter, &req);
    assert!(matches!(
        actual,
        Err(BookingError::IndividualNeedsOneProperty(2))
    ));
    assert!(submitter.received.is_empty());
}

#[test]
fn test_book_appointment_ツアーは30分刻みで送られること() {
    let mut submitter = RecordingSubmitter::default();
    let req = request("10:00 - 11:00", &["p-1", "p-2"], AppointmentMode::Tour);

    let report = book_appointment(&monday_source(), &mut submitter, &req).unwrap();
    assert_eq!(report.get_submitted().len(), 2);

    let times: Vec<&str> = submitter.received.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(times, vec!["10:00", "10:30"]);
    assert_eq!(
        submitter.received[0].tour_group_id,
        submitter.received[1].tour_group_id
    );
}

#[test]
fn test_book_appointment_容量超過の場合は何も送らないこと() {
    let mut submitter = RecordingSubmitter::default();
    let req = request("09:00 - 10:00", &["p-1", "p-2", "p-3"], AppointmentMode::Tour);

    let actual = book_appointment(&monday_source(), &mut submitter, &req);
    assert!(matches!(
        actual,
        Err(BookingError::Tour(TourPlanError::CapacityExceeded {
            required_minutes: 90,
            available_minutes: 60,
            ..
        }))
    ));
    assert!(submitter.received.is_empty());
}

#[test]
fn test_book_appointment_提供されていない枠はエラー() {
    let mut submitter = RecordingSubmitter::default();
    let req = request("11:30 - 12:30", &["p-1"], AppointmentMode::Individual);

    let actual = book_appointment(&monday_source(), &mut submitter, &req);
    assert!(matches!(actual, Err(BookingError::SlotNotOffered { .. })));
}

#[test]
fn test_book_appointment_一部失敗しても残りは送られること() {
    let mut submitter = RecordingSubmitter {
        reject_property_id: Some("p-2".to_string()),
        ..Default::default()
    };
    let req = request("09:00 - 10:00", &["p-1", "p-2"], AppointmentMode::Tour);

    let report = book_appointment(&monday_source(), &mut submitter, &req).unwrap();
    assert!(report.is_partial());
    assert!(!report.is_complete());
    assert_eq!(report.get_submitted()[0].property_id, "p-1");
    assert_eq!(report.get_failed()[0].0.property_id, "p-2");
}
