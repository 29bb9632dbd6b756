use crate::application::interface::BusinessHoursSourceTrait;
use crate::entity::datetime::{day_of_week_index, weekday_of};
use crate::entity::error::ScheduleError;
use crate::entity::slot_planner::generate_slots;
use crate::entity::time_slot::TimeSlot;
use chrono::NaiveDate;

#[cfg(test)]
use crate::entity::business_hours::{BusinessHoursRule, BusinessHoursTable};

#[cfg(test)]
use chrono::Weekday;

pub fn list_available_slots(
    source: &dyn BusinessHoursSourceTrait,
    agency_id: &str,
    date: NaiveDate,
) -> Result<Vec<TimeSlot>, ScheduleError> {
    let table = source.fetch(agency_id)?;
    let slots = generate_slots(date, &table);

    log::info!(
        "{}: {} slots offered on {} (day_of_week {})",
        agency_id,
        slots.len(),
        date,
        day_of_week_index(weekday_of(date))
    );
    Ok(slots)
}

#[cfg(test)]
struct FixedSource(BusinessHoursTable);

#[cfg(test)]
impl BusinessHoursSourceTrait for FixedSource {
    fn fetch(&self, agency_id: &str) -> Result<BusinessHoursTable, ScheduleError> {
        if agency_id == "known" {
            Ok(self.0.clone())
        } else {
            Err(ScheduleError::UnknownAgency(agency_id.to_string()))
        }
    }
}

#[test]
fn test_list_available_slots_取得したテーブルから枠を作ること() {
    let table = BusinessHoursTable::from_rules(vec![
        BusinessHoursRule::open(Weekday::Sat, "10:00", "13:00").unwrap()
    ])
    .unwrap();
    let source = FixedSource(table);
    let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();

    let actual = list_available_slots(&source, "known", saturday).unwrap();
    assert_eq!(actual.len(), 3);
    assert_eq!(actual[0].to_string(), "10:00 - 11:00");
}

#[test]
fn test_list_available_slots_取得に失敗したらエラーを返すこと() {
    let source = FixedSource(BusinessHoursTable::new());
    let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();

    let actual = list_available_slots(&source, "unknown", date);
    assert!(matches!(actual, Err(ScheduleError::UnknownAgency(_))));
}
