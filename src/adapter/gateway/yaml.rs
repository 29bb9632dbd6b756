use crate::entity::business_hours::{BusinessHoursRule, BusinessHoursTable};
use crate::entity::datetime::{weekday_from_index, weekday_from_name};
use crate::entity::error::ScheduleError;
use crate::entity::tour::TourPlan;
use chrono::{NaiveDate, Weekday};
use linked_hash_map::LinkedHashMap;
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

#[cfg(test)]
use crate::entity::slot_planner::plan_tour_with_group_id;

#[cfg(test)]
use crate::entity::time_slot::TimeSlot;

#[cfg(test)]
use crate::entity::tour::TourGroupId;

#[cfg(test)]
use uuid::uuid;

#[test]
fn test_business_hours_from_yaml_str_曜日番号で書いた場合() {
    let s = "
business_hours:
  - day_of_week: 1
    is_open: true
    open_time: '09:00'
    close_time: '12:00'
  - day_of_week: 0
    is_open: false
";

    let actual = business_hours_from_yaml_str(s).unwrap();
    let expected = BusinessHoursTable::from_rules(vec![
        BusinessHoursRule::open(Weekday::Mon, "09:00", "12:00").unwrap(),
        BusinessHoursRule::closed(Weekday::Sun),
    ])
    .unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_business_hours_from_yaml_str_曜日名で書いた場合() {
    let s = "
business_hours:
  - day_of_week: 'Sat'
    is_open: true
    open_time: '10:00'
    close_time: '16:00'
";

    let actual = business_hours_from_yaml_str(s).unwrap();
    let rule = actual.get(Weekday::Sat).unwrap();
    assert_eq!(rule.get_open_time(), "10:00");
    assert_eq!(rule.get_close_time(), "16:00");
}

#[test]
fn test_business_hours_from_yaml_str_is_openが無い場合は営業日とみなすこと() {
    let s = "
business_hours:
  - day_of_week: 2
    open_time: '09:00'
    close_time: '10:00'
";

    let actual = business_hours_from_yaml_str(s).unwrap();
    assert!(actual.get(Weekday::Tue).unwrap().is_open());
}

#[test]
fn test_business_hours_from_yaml_str_休業日は時刻が無くてもよいこと() {
    let s = "
business_hours:
  - day_of_week: 0
    is_open: false
    open_time: 'closed'
";

    let actual = business_hours_from_yaml_str(s).unwrap();
    assert!(!actual.get(Weekday::Sun).unwrap().is_open());
}

#[test]
fn test_business_hours_from_yaml_str_営業日に時刻が無い場合はエラー() {
    let s = "
business_hours:
  - day_of_week: 3
    is_open: true
    open_time: '09:00'
";

    let actual = business_hours_from_yaml_str(s);
    assert!(matches!(
        actual,
        Err(ScheduleError::MissingKey {
            key: "close_time",
            index: 0
        })
    ));
}

#[test]
fn test_business_hours_from_yaml_str_曜日の重複はエラー() {
    let s = "
business_hours:
  - day_of_week: 1
    is_open: false
  - day_of_week: 'Mon'
    is_open: false
";

    let actual = business_hours_from_yaml_str(s);
    assert!(matches!(actual, Err(ScheduleError::DuplicateWeekday(_))));
}

#[test]
fn test_business_hours_from_yaml_str_範囲外の曜日はエラー() {
    let s = "
business_hours:
  - day_of_week: 7
    is_open: false
";

    let actual = business_hours_from_yaml_str(s);
    assert!(matches!(actual, Err(ScheduleError::InvalidWeekday(_))));
}

#[test]
fn test_business_hours_from_yaml_str_閉店が開店より前はエラー() {
    let s = "
business_hours:
  - day_of_week: 1
    open_time: '18:00'
    close_time: '09:00'
";

    let actual = business_hours_from_yaml_str(s);
    assert!(matches!(actual, Err(ScheduleError::CloseNotAfterOpen { .. })));
}

#[test]
fn test_business_hours_from_yaml_str_business_hoursキーが無い場合はエラー() {
    let actual = business_hours_from_yaml_str("hours: []");
    assert!(matches!(actual, Err(ScheduleError::MissingTable)));

    let actual = business_hours_from_yaml_str("");
    assert!(matches!(actual, Err(ScheduleError::MissingTable)));
}

#[test]
fn test_business_hours_from_yaml_str_空配列は全曜日休業() {
    let actual = business_hours_from_yaml_str("business_hours: []").unwrap();
    assert!(actual.is_empty());
}

#[test]
fn test_business_hours_from_yaml_str_yamlとして壊れている場合はエラー() {
    let actual = business_hours_from_yaml_str("business_hours: [");
    assert!(matches!(actual, Err(ScheduleError::Yaml(_))));
}

pub fn business_hours_from_yaml_str(yaml_str: &str) -> Result<BusinessHoursTable, ScheduleError> {
    let docs = YamlLoader::load_from_str(yaml_str)?;
    let entries = docs
        .first()
        .and_then(|doc| doc["business_hours"].as_vec())
        .ok_or(ScheduleError::MissingTable)?;

    let mut table = BusinessHoursTable::new();
    for (index, entry) in entries.iter().enumerate() {
        table.insert(yaml_to_rule(entry, index)?)?;
    }
    Ok(table)
}

fn yaml_to_rule(yaml: &Yaml, index: usize) -> Result<BusinessHoursRule, ScheduleError> {
    let day_of_week = yaml_to_weekday(&yaml["day_of_week"], index)?;

    // is_openを省略した場合は営業日。true/false以外は受け付けない
    let is_open = match &yaml["is_open"] {
        Yaml::BadValue => true,
        Yaml::Boolean(b) => *b,
        other => return Err(invalid_value("is_open", index, other)),
    };
    if !is_open {
        return Ok(BusinessHoursRule::closed(day_of_week));
    }

    let open_time = yaml_to_time_str(&yaml["open_time"], "open_time", index)?;
    let close_time = yaml_to_time_str(&yaml["close_time"], "close_time", index)?;

    BusinessHoursRule::open(day_of_week, open_time, close_time)
}

fn yaml_to_time_str<'a>(
    yaml: &'a Yaml,
    key: &'static str,
    index: usize,
) -> Result<&'a str, ScheduleError> {
    match yaml {
        Yaml::String(s) => Ok(s.as_str()),
        Yaml::BadValue => Err(ScheduleError::MissingKey { key, index }),
        other => Err(invalid_value(key, index, other)),
    }
}

fn invalid_value(key: &'static str, index: usize, yaml: &Yaml) -> ScheduleError {
    ScheduleError::InvalidValue {
        key,
        index,
        value: format!("{:?}", yaml),
    }
}

#[test]
fn test_business_hours_from_yaml_str_is_openが真偽値でない場合はエラー() {
    for value in ["False", "'false'", "no", "0"] {
        let s = format!(
            "
business_hours:
  - day_of_week: 0
    is_open: {}
    open_time: '09:00'
    close_time: '12:00'
",
            value
        );

        let actual = business_hours_from_yaml_str(&s);
        assert!(
            matches!(
                actual,
                Err(ScheduleError::InvalidValue {
                    key: "is_open",
                    index: 0,
                    ..
                })
            ),
            "is_open: {} => {:?}",
            value,
            actual
        );
    }
}

#[test]
fn test_business_hours_from_yaml_str_時刻が文字列でない場合は不正な値として扱うこと() {
    let s = "
business_hours:
  - day_of_week: 1
    open_time: 900
    close_time: '12:00'
";

    let actual = business_hours_from_yaml_str(s);
    assert!(matches!(
        actual,
        Err(ScheduleError::InvalidValue {
            key: "open_time",
            index: 0,
            ..
        })
    ));
}

fn yaml_to_weekday(yaml: &Yaml, index: usize) -> Result<Weekday, ScheduleError> {
    match yaml {
        Yaml::Integer(i) => {
            weekday_from_index(*i).ok_or_else(|| ScheduleError::InvalidWeekday(i.to_string()))
        }
        Yaml::String(s) => {
            weekday_from_name(s).ok_or_else(|| ScheduleError::InvalidWeekday(s.to_string()))
        }
        Yaml::BadValue => Err(ScheduleError::MissingKey {
            key: "day_of_week",
            index,
        }),
        other => Err(ScheduleError::InvalidWeekday(format!("{:?}", other))),
    }
}

#[test]
fn test_tour_plan_to_yaml_訪問順に出力されること() {
    let slot = TimeSlot::one_hour_from(10 * 60);
    let id = TourGroupId::from_uuid(uuid!("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    let plan =
        plan_tour_with_group_id(&slot, &["p-1".to_string(), "p-2".to_string()], id).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let actual = yaml_to_string(&tour_plan_to_yaml(&plan, date));
    assert!(actual.starts_with("---"));

    // 出力を読み直して中身を確かめる
    let docs = YamlLoader::load_from_str(&actual).unwrap();
    let tour = &docs[0]["tour"];
    assert_eq!(
        tour["tour_group_id"].as_str(),
        Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
    );
    assert_eq!(tour["date"].as_str(), Some("2024-01-01"));
    assert_eq!(tour["slot"].as_str(), Some("10:00 - 11:00"));

    let stops = tour["stops"].as_vec().unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0]["property_id"].as_str(), Some("p-1"));
    assert_eq!(stops[0]["start_time"].as_str(), Some("10:00"));
    assert_eq!(stops[1]["offset_minutes"].as_i64(), Some(30));
    assert_eq!(stops[1]["start_time"].as_str(), Some("10:30"));
}

pub fn tour_plan_to_yaml(plan: &TourPlan, date: NaiveDate) -> Yaml {
    let mut stops = vec![];
    for stop in plan.get_stops().iter() {
        let mut stop_hash = LinkedHashMap::new();
        stop_hash.insert(
            Yaml::String("property_id".to_string()),
            Yaml::String(stop.get_property_id().to_string()),
        );
        stop_hash.insert(
            Yaml::String("offset_minutes".to_string()),
            Yaml::Integer(stop.get_offset_minutes() as i64),
        );
        stop_hash.insert(
            Yaml::String("start_time".to_string()),
            Yaml::String(stop.get_start_time()),
        );
        stops.push(Yaml::Hash(stop_hash));
    }

    let mut tour_hash = LinkedHashMap::new();
    tour_hash.insert(
        Yaml::String("tour_group_id".to_string()),
        Yaml::String(plan.get_tour_group_id().to_string()),
    );
    tour_hash.insert(
        Yaml::String("date".to_string()),
        Yaml::String(date.to_string()),
    );
    tour_hash.insert(
        Yaml::String("slot".to_string()),
        Yaml::String(plan.get_slot().to_string()),
    );
    tour_hash.insert(Yaml::String("stops".to_string()), Yaml::Array(stops));

    let mut root = LinkedHashMap::new();
    root.insert(Yaml::String("tour".to_string()), Yaml::Hash(tour_hash));
    Yaml::Hash(root)
}

pub fn yaml_to_string(doc: &Yaml) -> String {
    let mut out_str = String::new();
    let mut emitter = YamlEmitter::new(&mut out_str);

    // Stringへの書き出しは失敗しない
    if let Err(err) = emitter.dump(doc) {
        log::error!("failed to emit yaml: {:?}", err);
    }

    out_str += "\n";
    out_str
}
