use crate::api::attendance::{
    AttendanceFilter, AttendanceListResponse, MonthQuery, UpdateAttendance,
};
use crate::auth::handlers::LoginResponse;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::shift::ShiftSchedule;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Core for a Multi-Tenant HR Back Office

Daily clock-in/clock-out tracking with shift-schedule based status
computation (PRESENT / LATE / HALFDAY / ABSENT / WEEKEND), plus a scheduled
absence sweep that inserts ABSENT placeholders for employees who never
clocked in on a working day.

### 🔹 Key Features
- **Clock-in / Clock-out**
  - Status and lateness/overtime/early-leave durations derived from the
    tenant's shift schedule
- **Self-service views**
  - Today's record and full-month history
- **Admin tools**
  - Tenant-scoped listing, manual corrections, deletion

### 🔐 Security
All attendance endpoints are protected with **JWT Bearer authentication**;
the token carries the caller's company code, which scopes every query to
their tenant.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::my_today,
        crate::api::attendance::my_month,
        crate::api::attendance::list_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            LoginResponse,
            Attendance,
            AttendanceStatus,
            AttendanceFilter,
            AttendanceListResponse,
            MonthQuery,
            UpdateAttendance,
            ShiftSchedule
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
