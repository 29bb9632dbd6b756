use crate::application::interface::AppointmentSubmitterTrait;
use crate::entity::appointment::AppointmentPayload;
use crate::entity::error::SubmitError;
use std::io::Write;

#[cfg(test)]
use crate::entity::appointment::individual_payload;

#[cfg(test)]
use crate::entity::time_slot::TimeSlot;

#[cfg(test)]
use chrono::NaiveDate;

// 1予約1行のJSONとして書き出す
pub struct JsonLinesSubmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSubmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AppointmentSubmitterTrait for JsonLinesSubmitter<W> {
    fn submit(&mut self, payload: &AppointmentPayload) -> Result<(), SubmitError> {
        let line = serde_json::to_string(payload)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[test]
fn test_submit_1件ごとに1行書かれること() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut submitter = JsonLinesSubmitter::new(Vec::new());

    submitter
        .submit(&individual_payload("p-1", date, &TimeSlot::one_hour_from(9 * 60), None))
        .unwrap();
    submitter
        .submit(&individual_payload("p-2", date, &TimeSlot::one_hour_from(10 * 60), None))
        .unwrap();

    let out = String::from_utf8(submitter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);

    let second: AppointmentPayload = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second.property_id, "p-2");
    assert_eq!(second.time, "10:00");
}
