use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Daily attendance status label, stored as text in the `status` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
    Weekend,
}

/// One row per (employee, company, calendar day); uniqueness is enforced by
/// the `uq_attendance_day` key.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "ACME")]
    pub company_code: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "2026-01-05T09:05:00", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<NaiveDateTime>,
    #[schema(example = "2026-01-05T18:30:00", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,
    #[schema(example = "PRESENT", value_type = String)]
    pub status: String,
    #[schema(example = "00:00:00")]
    pub late_by: String,
    #[schema(example = "00:00:00")]
    pub overtime: String,
    #[schema(example = "00:30:00")]
    pub early_leave: String,
    #[schema(example = "09:25:00")]
    pub total_worked: String,
    pub is_clocked_in: bool,
    #[schema(example = "Auto-generated by absence sweep")]
    pub note: Option<String>,
}
