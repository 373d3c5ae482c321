use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shift boundaries used to classify a day's attendance.
///
/// One value per tenant, loaded from `company_shift_schedules` with the
/// configured defaults as fallback. All boundaries are wall-clock times on
/// the record's calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShiftSchedule {
    /// Start of the shift; lateness is measured from here.
    #[schema(example = "09:00:00", value_type = String)]
    pub shift_start: NaiveTime,
    /// End of the grace window; arrivals at or after this are late.
    #[schema(example = "09:10:00", value_type = String)]
    pub grace_end: NaiveTime,
    /// End of the late window (inclusive).
    #[schema(example = "09:30:00", value_type = String)]
    pub late_end: NaiveTime,
    /// Arrivals at or after this are half-day at best.
    #[schema(example = "10:00:00", value_type = String)]
    pub half_day_start: NaiveTime,
    /// End of the shift; overtime/early-leave are measured from here.
    #[schema(example = "19:00:00", value_type = String)]
    pub shift_end: NaiveTime,
}

#[derive(sqlx::FromRow)]
pub struct ShiftScheduleSql {
    pub shift_start: NaiveTime,
    pub grace_end: NaiveTime,
    pub late_end: NaiveTime,
    pub half_day_start: NaiveTime,
    pub shift_end: NaiveTime,
}

impl From<ShiftScheduleSql> for ShiftSchedule {
    fn from(row: ShiftScheduleSql) -> Self {
        ShiftSchedule {
            shift_start: row.shift_start,
            grace_end: row.grace_end,
            late_end: row.late_end,
            half_day_start: row.half_day_start,
            shift_end: row.shift_end,
        }
    }
}
