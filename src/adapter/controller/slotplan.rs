use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use slotplan::adapter::gateway::business_hours_repository::{
    BusinessHoursFile, BusinessHoursRepository,
};
use slotplan::adapter::gateway::json_lines_submitter::JsonLinesSubmitter;
use slotplan::adapter::gateway::yaml::{tour_plan_to_yaml, yaml_to_string};
use slotplan::application::book_appointment::{book_appointment, BookingRequest};
use slotplan::application::interface::BusinessHoursSourceTrait;
use slotplan::application::list_available_slots::list_available_slots;
use slotplan::entity::appointment::{read_appointment_mode, AppointmentMode};
use slotplan::entity::datetime::{parse_date, weekday_of};
use slotplan::entity::error::BookingError;
use slotplan::entity::slot_planner::plan_tour;
use slotplan::entity::time_slot::TimeSlot;
use std::io::stdout;
use std::path::PathBuf;
use std::process;
use termion::style;

#[derive(Parser, Debug)]
#[command(name = "slotplan", version, about = "Plan property viewing slots and tours")]
struct Cli {
    /// Business hours YAML for a single agency
    #[arg(long, env = "SLOTPLAN_HOURS", global = true)]
    hours: Option<PathBuf>,

    /// Directory holding <agency>/business_hours.yaml
    #[arg(long, env = "SLOTPLAN_AGENCIES", global = true, conflicts_with = "hours")]
    agencies: Option<PathBuf>,

    #[arg(long, env = "SLOTPLAN_AGENCY", global = true, default_value = "default")]
    agency: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bookable one-hour slots on a date
    Slots {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
    },
    /// Sequence several properties inside one slot
    Tour {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[arg(long)]
        slot: TimeSlot,
        #[arg(long = "property", required = true)]
        properties: Vec<String>,
    },
    /// Build appointment requests and write them as JSON lines
    Book {
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[arg(long)]
        slot: TimeSlot,
        #[arg(long = "property", required = true)]
        properties: Vec<String>,
        #[arg(long, value_parser = parse_mode_arg, default_value = "individual")]
        mode: AppointmentMode,
        #[arg(long)]
        notes: Option<String>,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|err| err.to_string())
}

fn parse_mode_arg(s: &str) -> Result<AppointmentMode, String> {
    read_appointment_mode(s).ok_or_else(|| format!("unknown mode {:?}, expected individual or tour", s))
}

#[test]
fn test_parse_mode_arg_不正なモードはエラー() {
    assert_eq!(parse_mode_arg("tour"), Ok(AppointmentMode::Tour));
    assert!(parse_mode_arg("group").is_err());
}

#[test]
fn test_cli_bookの引数を読めること() {
    let cli = Cli::try_parse_from([
        "slotplan",
        "--hours",
        "hours.yaml",
        "book",
        "--date",
        "2024-01-01",
        "--slot",
        "10:00 - 11:00",
        "--property",
        "p-1",
        "--property",
        "p-2",
        "--mode",
        "tour",
    ])
    .unwrap();

    match cli.command {
        Command::Book {
            slot,
            properties,
            mode,
            ..
        } => {
            assert_eq!(slot, TimeSlot::new(10 * 60, 11 * 60));
            assert_eq!(properties, vec!["p-1", "p-2"]);
            assert_eq!(mode, AppointmentMode::Tour);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_cli_hoursとagenciesは同時に指定できないこと() {
    let actual = Cli::try_parse_from([
        "slotplan",
        "--hours",
        "hours.yaml",
        "--agencies",
        "agencies/",
        "slots",
        "--date",
        "2024-01-01",
    ]);
    assert!(actual.is_err());
}

// 休業日は空リストではなく「枠なし」と表示する
fn render_slots(date: NaiveDate, slots: &[TimeSlot]) -> String {
    let mut out = format!("{}{} ({}){}\n", style::Bold, date, weekday_of(date), style::Reset);

    if slots.is_empty() {
        out += "no slots available\n";
    }
    for slot in slots.iter() {
        out += &format!("{}\n", slot);
    }
    out
}

#[test]
fn test_render_slots_枠が無い日はno_slots_availableと表示すること() {
    let sunday = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

    let actual = render_slots(sunday, &[]);
    let lines: Vec<&str> = actual.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("2023-12-31 (Sun)"));
    assert_eq!(lines[1], "no slots available");
}

#[test]
fn test_render_slots_枠を1行ずつ表示すること() {
    let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let slots = vec![
        TimeSlot::one_hour_from(9 * 60),
        TimeSlot::one_hour_from(10 * 60),
    ];

    let actual = render_slots(monday, &slots);
    let lines: Vec<&str> = actual.lines().collect();
    assert_eq!(&lines[1..], &["09:00 - 10:00", "10:00 - 11:00"]);
    assert!(!actual.contains("no slots available"));
}

fn open_source(cli: &Cli) -> Result<Box<dyn BusinessHoursSourceTrait>> {
    match (&cli.agencies, &cli.hours) {
        (Some(dir), _) => {
            let mut repository = BusinessHoursRepository::new(dir);
            repository.load();
            Ok(Box::new(repository))
        }
        (None, Some(path)) => Ok(Box::new(BusinessHoursFile::new(path))),
        (None, None) => bail!("either --hours or --agencies is required"),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = application(&cli) {
        eprintln!("{}error:{} {:#}", style::Bold, style::Reset, err);
        process::exit(1);
    }
}

fn application(cli: &Cli) -> Result<()> {
    let source = open_source(cli)?;

    match &cli.command {
        Command::Slots { date } => {
            let slots = list_available_slots(source.as_ref(), &cli.agency, *date)
                .with_context(|| format!("failed to load business hours for {}", cli.agency))?;

            print!("{}", render_slots(*date, &slots));
        }
        Command::Tour {
            date,
            slot,
            properties,
        } => {
            let slots = list_available_slots(source.as_ref(), &cli.agency, *date)?;
            if !slots.contains(slot) {
                return Err(BookingError::SlotNotOffered {
                    date: date.to_string(),
                    slot: slot.to_string(),
                }
                .into());
            }

            let plan = plan_tour(slot, properties)?;
            print!("{}", yaml_to_string(&tour_plan_to_yaml(&plan, *date)));
        }
        Command::Book {
            date,
            slot,
            properties,
            mode,
            notes,
        } => {
            let request = BookingRequest {
                agency_id: cli.agency.clone(),
                date: *date,
                slot: *slot,
                property_ids: properties.clone(),
                mode: *mode,
                notes: notes.clone(),
            };

            let mut submitter = JsonLinesSubmitter::new(stdout().lock());
            let report = book_appointment(source.as_ref(), &mut submitter, &request)?;

            eprintln!(
                "{}{} of {} appointments submitted{}",
                style::Bold,
                report.get_submitted().len(),
                report.get_submitted().len() + report.get_failed().len(),
                style::Reset
            );
            for (payload, err) in report.get_failed().iter() {
                eprintln!("  {} at {}: {}", payload.property_id, payload.time, err);
            }

            if !report.is_complete() {
                bail!("{} appointments were not submitted", report.get_failed().len());
            }
        }
    }

    Ok(())
}
