use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::db::is_unique_violation;
use crate::engine::{derive_status, format_duration};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::utils::{shift_cache, time_window::month_bounds};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 1)]
    pub month: u32,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by employee ID
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by status label
    #[schema(example = "ABSENT")]
    pub status: Option<String>,
    /// Earliest date (inclusive)
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Latest date (inclusive)
    #[schema(example = "2026-01-31", format = "date", value_type = Option<String>)]
    pub to: Option<NaiveDate>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u32>,
    /// Pagination per page number
    #[schema(example = 20)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Manual admin edit. Supplying either clock time triggers a status and
/// duration recompute keyed off the (merged) clock-in; a status override is
/// applied only when no clock time is supplied.
#[derive(Deserialize, ToSchema)]
pub struct UpdateAttendance {
    #[schema(example = "2026-01-05T09:05:00", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<NaiveDateTime>,
    #[schema(example = "2026-01-05T18:30:00", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,
    #[schema(example = "WEEKEND", value_type = Option<String>)]
    pub status: Option<AttendanceStatus>,
    #[schema(example = "Corrected after badge reader outage")]
    pub note: Option<String>,
}

// Typed SQLx binding helper for the dynamic list query
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

async fn fetch_today(
    pool: &MySqlPool,
    employee_id: u64,
    company_code: &str,
    date: NaiveDate,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, company_code, date, clock_in, clock_out,
               status, late_by, overtime, early_leave, total_worked,
               is_clocked_in, note
        FROM attendance
        WHERE employee_id = ? AND company_code = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(company_code)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Clock-in endpoint
///
/// Inserts today's record with the status derived from the tenant's shift
/// schedule. The unique key on (employee, company, date) turns a concurrent
/// or repeated clock-in into a clean rejection -- including the case where
/// the absence sweep already inserted an ABSENT row for the day.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "Clocked in", body = Object, example = json!({
            "message": "Clocked in",
            "status": "PRESENT",
            "late_by": "00:00:00"
        })),
        (status = 400, description = "Already logged attendance for today", body = Object, example = json!({
            "message": "Already logged attendance for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let now = Local::now().naive_local();
    let shift = shift_cache::for_company(pool.get_ref(), &auth.company_code, config.default_shift)
        .await;
    let outcome = derive_status(now, None, &shift);
    let late_by = format_duration(outcome.late_by);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (employee_id, company_code, date, clock_in, status, late_by, is_clocked_in)
        VALUES (?, ?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(employee_id)
    .bind(&auth.company_code)
    .bind(now.date())
    .bind(now)
    .bind(outcome.status.to_string())
    .bind(&late_by)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Clocked in",
            "status": outcome.status,
            "late_by": late_by
        }))),
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::BadRequest().json(json!({
            "message": "Already logged attendance for today"
        }))),
        Err(e) => {
            error!(error = %e, employee_id, "Clock-in failed");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Clock-out endpoint
///
/// Sets the clock-out once and recomputes status and durations from the
/// stored clock-in. Rejected when no open clock-in exists for today.
#[utoipa::path(
    put,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "Clocked out", body = Object, example = json!({
            "message": "Clocked out",
            "status": "PRESENT",
            "total_worked": "09:25:00",
            "overtime": "00:00:00",
            "early_leave": "00:30:00"
        })),
        (status = 400, description = "No open clock-in for today", body = Object, example = json!({
            "message": "No clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let now = Local::now().naive_local();
    let record = fetch_today(pool.get_ref(), employee_id, &auth.company_code, now.date())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Clock-out lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(record) = record else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "No clock-in found for today"
        })));
    };

    // A sweep-created ABSENT row has no clock_in and cannot be closed.
    let Some(clock_in) = record.clock_in else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "No clock-in found for today"
        })));
    };

    if record.clock_out.is_some() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Already clocked out today"
        })));
    }

    let shift = shift_cache::for_company(pool.get_ref(), &auth.company_code, config.default_shift)
        .await;
    let outcome = derive_status(clock_in, Some(now), &shift);

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET clock_out = ?, status = ?, late_by = ?, total_worked = ?,
            overtime = ?, early_leave = ?, is_clocked_in = FALSE
        WHERE id = ? AND clock_out IS NULL
        "#,
    )
    .bind(now)
    .bind(outcome.status.to_string())
    .bind(format_duration(outcome.late_by))
    .bind(format_duration(outcome.total_worked))
    .bind(format_duration(outcome.overtime))
    .bind(format_duration(outcome.early_leave))
    .bind(record.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Clock-out failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        // Lost a race with another clock-out for the same record.
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Already clocked out today"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Clocked out",
        "status": outcome.status,
        "total_worked": format_duration(outcome.total_worked),
        "overtime": format_duration(outcome.overtime),
        "early_leave": format_duration(outcome.early_leave)
    })))
}

/// Caller's attendance record for today
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's record", body = Attendance),
        (status = 404, description = "No record for today", body = Object, example = json!({
            "message": "No attendance record for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let today = Local::now().naive_local().date();
    let record = fetch_today(pool.get_ref(), employee_id, &auth.company_code, today)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Today's attendance lookup failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No attendance record for today"
        }))),
    }
}

/// Caller's attendance records for one calendar month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/month",
    params(MonthQuery),
    responses(
        (status = 200, description = "Records for the month", body = Vec<Attendance>),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_month(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let Some((first, next_first)) = month_bounds(query.year, query.month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "month must be between 1 and 12"
        })));
    };

    let records = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, company_code, date, clock_in, clock_out,
               status, late_by, overtime, early_leave, total_worked,
               is_clocked_in, note
        FROM attendance
        WHERE employee_id = ? AND company_code = ? AND date >= ? AND date < ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(&auth.company_code)
    .bind(first)
    .bind(next_first)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Monthly attendance lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

/// Admin/HR attendance list, always scoped to the caller's tenant
#[utoipa::path(
    get,
    path = "/api/v1/attendance/records",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = vec!["company_code = ?"];
    let mut bindings = vec![FilterValue::Str(auth.company_code.clone())];

    if let Some(employee_id) = query.employee_id {
        conditions.push("employee_id = ?");
        bindings.push(FilterValue::U64(employee_id));
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status.clone()));
    }

    if let Some(from) = query.from {
        conditions.push("date >= ?");
        bindings.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        conditions.push("date <= ?");
        bindings.push(FilterValue::Date(to));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM attendance {}", where_clause);
    debug!(sql = %count_sql, "Counting attendance records");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(v) => count_query.bind(v.clone()),
            FilterValue::Date(v) => count_query.bind(*v),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count attendance records");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, employee_id, company_code, date, clock_in, clock_out, \
         status, late_by, overtime, early_leave, total_worked, is_clocked_in, note \
         FROM attendance {} ORDER BY date DESC, employee_id LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, "Fetching attendance records");

    let mut data_query = sqlx::query_as::<_, Attendance>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(v) => data_query.bind(v.clone()),
            FilterValue::Date(v) => data_query.bind(*v),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let records = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch attendance records");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page,
        per_page,
        total,
    }))
}

/// Admin manual edit of one attendance record
#[utoipa::path(
    put,
    path = "/api/v1/attendance/records/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Record updated", body = Object, example = json!({
            "message": "Attendance record updated",
            "status": "PRESENT"
        })),
        (status = 400, description = "Invalid edit"),
        (status = 403, description = "Record belongs to another tenant"),
        (status = 404, description = "Record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAttendance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let id = path.into_inner();

    let record = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, company_code, date, clock_in, clock_out,
               status, late_by, overtime, early_leave, total_worked,
               is_clocked_in, note
        FROM attendance
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Attendance lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(record) = record else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        })));
    };

    if record.company_code != auth.company_code {
        return Err(actix_web::error::ErrorForbidden(
            "Record belongs to another tenant",
        ));
    }

    let clock_in = payload.clock_in.or(record.clock_in);
    let clock_out = payload.clock_out.or(record.clock_out);
    let times_changed = payload.clock_in.is_some() || payload.clock_out.is_some();

    if times_changed && clock_out.is_some() && clock_in.is_none() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "clock_out requires a clock_in"
        })));
    }
    if let (Some(cin), Some(cout)) = (clock_in, clock_out) {
        if cout < cin {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "clock_out cannot precede clock_in"
            })));
        }
    }

    // Recompute whenever a clock time changes; otherwise honor an explicit
    // status override (e.g. marking a day WEEKEND).
    let (status, late_by, total_worked, overtime, early_leave) = if let (true, Some(cin)) =
        (times_changed, clock_in)
    {
        let shift =
            shift_cache::for_company(pool.get_ref(), &auth.company_code, config.default_shift)
                .await;
        let outcome = derive_status(cin, clock_out, &shift);
        (
            outcome.status.to_string(),
            format_duration(outcome.late_by),
            format_duration(outcome.total_worked),
            format_duration(outcome.overtime),
            format_duration(outcome.early_leave),
        )
    } else {
        (
            payload
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| record.status.clone()),
            record.late_by.clone(),
            record.total_worked.clone(),
            record.overtime.clone(),
            record.early_leave.clone(),
        )
    };

    let note = payload.note.clone().or(record.note);
    let is_clocked_in = clock_in.is_some() && clock_out.is_none();

    sqlx::query(
        r#"
        UPDATE attendance
        SET clock_in = ?, clock_out = ?, status = ?, late_by = ?,
            total_worked = ?, overtime = ?, early_leave = ?,
            is_clocked_in = ?, note = ?
        WHERE id = ?
        "#,
    )
    .bind(clock_in)
    .bind(clock_out)
    .bind(&status)
    .bind(&late_by)
    .bind(&total_worked)
    .bind(&overtime)
    .bind(&early_leave)
    .bind(is_clocked_in)
    .bind(&note)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Attendance update failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record updated",
        "status": status
    })))
}

/// Admin delete of one attendance record (the only deletion path)
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/records/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "message": "Attendance record deleted"
        })),
        (status = 403, description = "Record belongs to another tenant"),
        (status = 404, description = "Record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let id = path.into_inner();

    let owner = sqlx::query_scalar::<_, String>(
        r#"SELECT company_code FROM attendance WHERE id = ?"#,
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Attendance lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(owner) = owner else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        })));
    };

    if owner != auth.company_code {
        return Err(actix_web::error::ErrorForbidden(
            "Record belongs to another tenant",
        ));
    }

    sqlx::query(r#"DELETE FROM attendance WHERE id = ?"#)
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Attendance delete failed");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted"
    })))
}
