use crate::entity::appointment::AppointmentPayload;
use crate::entity::business_hours::BusinessHoursTable;
use crate::entity::error::{ScheduleError, SubmitError};

// 予約セッションごとに最新の営業時間を取り直す
pub trait BusinessHoursSourceTrait {
    fn fetch(&self, agency_id: &str) -> Result<BusinessHoursTable, ScheduleError>;
}

// 予約1件ごとに呼ばれる。バッチの原子性はこのtraitでは保証しない
pub trait AppointmentSubmitterTrait {
    fn submit(&mut self, payload: &AppointmentPayload) -> Result<(), SubmitError>;
}
