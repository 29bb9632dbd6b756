use crate::entity::business_hours::BusinessHoursTable;
use crate::entity::datetime::weekday_of;
use crate::entity::error::TourPlanError;
use crate::entity::time_slot::{TimeSlot, SLOT_LENGTH_MINUTES};
use crate::entity::tour::{TourGroupId, TourPlan, TourStop, TOUR_STOP_MINUTES};
use chrono::NaiveDate;

#[cfg(test)]
use crate::entity::business_hours::BusinessHoursRule;

#[cfg(test)]
use chrono::Weekday;

#[cfg(test)]
use uuid::uuid;

// 1時間枠を開店時刻から順に作る。ルールが無い曜日と休業日は空
// 閉店までに1時間に満たない端数は枠にしない
pub fn generate_slots(date: NaiveDate, table: &BusinessHoursTable) -> Vec<TimeSlot> {
    let weekday = weekday_of(date);

    let rule = match table.get(weekday) {
        Some(rule) if rule.is_open() => rule,
        _ => {
            log::debug!("{} ({}) is closed", date, weekday);
            return vec![];
        }
    };

    let close_minute = rule.get_close_minute();
    let mut slots = vec![];
    let mut cursor = rule.get_open_minute();

    while cursor + SLOT_LENGTH_MINUTES <= close_minute {
        slots.push(TimeSlot::one_hour_from(cursor));
        cursor += SLOT_LENGTH_MINUTES;
    }

    log::debug!(
        "{} ({}): {} slots between {} and {}",
        date,
        weekday,
        slots.len(),
        rule.get_open_time(),
        rule.get_close_time()
    );
    slots
}

// 物件を30分ずつ連続で訪問する。枠に収まらなければエラー
pub fn plan_tour(slot: &TimeSlot, property_ids: &[String]) -> Result<TourPlan, TourPlanError> {
    plan_tour_with_group_id(slot, property_ids, TourGroupId::generate())
}

pub fn plan_tour_with_group_id(
    slot: &TimeSlot,
    property_ids: &[String],
    tour_group_id: TourGroupId,
) -> Result<TourPlan, TourPlanError> {
    if property_ids.is_empty() {
        return Err(TourPlanError::NoProperties);
    }

    let property_count = property_ids.len();
    let required_minutes = property_count as u32 * TOUR_STOP_MINUTES;
    let available_minutes = slot.get_duration_minutes();

    if required_minutes > available_minutes {
        return Err(TourPlanError::CapacityExceeded {
            property_count,
            required_minutes,
            available_minutes,
        });
    }

    let stops = property_ids
        .iter()
        .enumerate()
        .map(|(i, property_id)| {
            let offset_minutes = i as u32 * TOUR_STOP_MINUTES;
            TourStop::new(
                property_id.clone(),
                offset_minutes,
                slot.get_start_minute() + offset_minutes,
            )
        })
        .collect();

    Ok(TourPlan::new(*slot, tour_group_id, stops))
}

#[cfg(test)]
fn monday_table(open_time: &str, close_time: &str) -> BusinessHoursTable {
    BusinessHoursTable::from_rules(vec![
        BusinessHoursRule::open(Weekday::Mon, open_time, close_time).unwrap(),
        BusinessHoursRule::closed(Weekday::Sun),
    ])
    .unwrap()
}

#[cfg(test)]
fn properties(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("property-{}", i)).collect()
}

#[cfg(test)]
fn labels(slots: &[TimeSlot]) -> Vec<String> {
    slots.iter().map(|slot| slot.to_string()).collect()
}

// 2024-01-01は月曜日
#[cfg(test)]
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[test]
fn test_generate_slots_月曜日9時から12時() {
    let table = monday_table("09:00", "12:00");

    let actual = labels(&generate_slots(monday(), &table));
    assert_eq!(actual, vec!["09:00 - 10:00", "10:00 - 11:00", "11:00 - 12:00"]);
}

#[test]
fn test_generate_slots_端数の30分は捨てられること() {
    let table = monday_table("09:00", "11:30");

    let actual = labels(&generate_slots(monday(), &table));
    assert_eq!(actual, vec!["09:00 - 10:00", "10:00 - 11:00"]);
}

#[test]
fn test_generate_slots_開店時刻が半端でも1時間刻みになること() {
    let table = monday_table("09:30", "12:00");

    let actual = labels(&generate_slots(monday(), &table));
    assert_eq!(actual, vec!["09:30 - 10:30", "10:30 - 11:30"]);
}

#[test]
fn test_generate_slots_1時間未満の営業日は空() {
    let table = monday_table("09:00", "09:45");
    assert!(generate_slots(monday(), &table).is_empty());
}

#[test]
fn test_generate_slots_休業日は空() {
    let table = monday_table("09:00", "12:00");
    let sunday = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

    assert!(generate_slots(sunday, &table).is_empty());
}

#[test]
fn test_generate_slots_ルールが無い曜日は空() {
    let table = monday_table("09:00", "12:00");
    let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    assert!(generate_slots(tuesday, &table).is_empty());
    assert!(generate_slots(monday(), &BusinessHoursTable::new()).is_empty());
}

#[test]
fn test_generate_slots_同じ入力なら同じ結果() {
    let table = monday_table("08:00", "18:00");
    assert_eq!(generate_slots(monday(), &table), generate_slots(monday(), &table));
}

#[test]
fn test_plan_tour_60分の枠に2件はちょうど収まること() {
    let slot: TimeSlot = "09:00 - 10:00".parse().unwrap();

    let plan = plan_tour(&slot, &properties(2)).unwrap();
    let offsets: Vec<u32> = plan.get_stops().iter().map(|s| s.get_offset_minutes()).collect();
    assert_eq!(offsets, vec![0, 30]);
}

#[test]
fn test_plan_tour_60分の枠に3件は収まらないこと() {
    let slot: TimeSlot = "09:00 - 10:00".parse().unwrap();

    let actual = plan_tour(&slot, &properties(3));
    assert_eq!(
        actual,
        Err(TourPlanError::CapacityExceeded {
            property_count: 3,
            required_minutes: 90,
            available_minutes: 60,
        })
    );

    let reason = actual.unwrap_err().to_string();
    assert!(reason.contains("90"));
    assert!(reason.contains("60"));
}

#[test]
fn test_plan_tour_物件が無い場合はエラー() {
    let slot = TimeSlot::one_hour_from(9 * 60);
    assert_eq!(plan_tour(&slot, &[]), Err(TourPlanError::NoProperties));
}

#[test]
fn test_plan_tour_呼び出しごとに別のtour_group_idになること() {
    let slot = TimeSlot::new(9 * 60, 12 * 60);

    let first = plan_tour(&slot, &properties(4)).unwrap();
    let second = plan_tour(&slot, &properties(4)).unwrap();
    assert_ne!(first.get_tour_group_id(), second.get_tour_group_id());
}

#[test]
fn test_plan_tour_with_group_id_指定したidが使われること() {
    let slot = TimeSlot::one_hour_from(9 * 60);
    let id = TourGroupId::from_uuid(uuid!("67e55044-10b1-426f-9247-bb680e5fe0c8"));

    let plan = plan_tour_with_group_id(&slot, &properties(1), id).unwrap();
    assert_eq!(plan.get_tour_group_id(), id);
    assert_eq!(plan.get_slot(), slot);
}

#[test]
fn test_月曜日の2枠目を2件のツアーで予約する() {
    let table = monday_table("09:00", "12:00");
    let slots = generate_slots(monday(), &table);

    let plan = plan_tour(&slots[1], &properties(2)).unwrap();
    let actual: Vec<(String, u32, String)> = plan
        .get_stops()
        .iter()
        .map(|s| (s.get_property_id().to_string(), s.get_offset_minutes(), s.get_start_time()))
        .collect();

    assert_eq!(
        actual,
        vec![
            ("property-1".to_string(), 0, "10:00".to_string()),
            ("property-2".to_string(), 30, "10:30".to_string()),
        ]
    );
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn day_offset_strategy() -> impl Strategy<Value = u32> {
        0u32..7
    }

    proptest! {
        #[test]
        fn generated_slots_never_pass_close_time(
            open in 0u32..(23 * 60),
            span in 1u32..(10 * 60),
            day_offset in day_offset_strategy(),
        ) {
            let close = (open + span).min(crate::entity::datetime::MINUTES_PER_DAY - 1);
            prop_assume!(open < close);

            let table = BusinessHoursTable::from_rules(vec![
                BusinessHoursRule::open(
                    Weekday::Mon,
                    &crate::entity::datetime::format_minute_of_day(open),
                    &crate::entity::datetime::format_minute_of_day(close),
                ).unwrap(),
            ]).unwrap();
            let date = monday() + chrono::Duration::days(day_offset as i64);

            let slots = generate_slots(date, &table);
            prop_assert_eq!(&slots, &generate_slots(date, &table));

            if day_offset != 0 {
                prop_assert!(slots.is_empty());
                return Ok(());
            }

            for pair in slots.windows(2) {
                prop_assert_eq!(pair[0].get_end_minute(), pair[1].get_start_minute());
            }
            for slot in &slots {
                prop_assert!(slot.get_start_minute() >= open);
                prop_assert!(slot.get_end_minute() <= close);
                prop_assert_eq!(slot.get_duration_minutes(), SLOT_LENGTH_MINUTES);
            }
            // 残りが1時間未満になるまで枠を出し切っている
            let last_end = slots.last().map(|s| s.get_end_minute()).unwrap_or(open);
            prop_assert!(close - last_end < SLOT_LENGTH_MINUTES);
        }

        #[test]
        fn tour_stops_are_spaced_thirty_minutes_apart(
            start in 0u32..(20 * 60),
            length in 30u32..240,
            count in 1usize..10,
        ) {
            let slot = TimeSlot::new(start, start + length);
            let ids = properties(count);

            match plan_tour(&slot, &ids) {
                Ok(plan) => {
                    let stops = plan.get_stops();
                    prop_assert_eq!(stops.len(), count);
                    for (i, stop) in stops.iter().enumerate() {
                        prop_assert_eq!(stop.get_start_minute(), start + 30 * i as u32);
                        prop_assert_eq!(stop.get_property_id(), ids[i].as_str());
                    }
                    let last = stops.last().unwrap();
                    prop_assert!(last.get_end_minute() <= slot.get_end_minute());
                }
                Err(TourPlanError::CapacityExceeded { required_minutes, available_minutes, .. }) => {
                    prop_assert_eq!(required_minutes, count as u32 * 30);
                    prop_assert_eq!(available_minutes, length);
                    prop_assert!(required_minutes > available_minutes);
                }
                Err(err) => prop_assert!(false, "unexpected error {:?}", err),
            }
        }
    }
}
