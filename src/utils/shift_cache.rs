use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::shift::{ShiftSchedule, ShiftScheduleSql};

/// Per-tenant shift schedules, keyed by company code. Entries expire so a
/// schedule change lands within ten minutes without a restart.
static SHIFT_CACHE: Lazy<Cache<String, ShiftSchedule>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(600))
        .build()
});

/// Resolve the shift schedule for a tenant.
///
/// Tenants without a `company_shift_schedules` row use the configured
/// default. A lookup failure also falls back to the default so that
/// clock-in/out keeps working while the DB hiccups; the error is logged.
pub async fn for_company(
    pool: &MySqlPool,
    company_code: &str,
    default: ShiftSchedule,
) -> ShiftSchedule {
    if let Some(hit) = SHIFT_CACHE.get(company_code).await {
        return hit;
    }

    let row = sqlx::query_as::<_, ShiftScheduleSql>(
        r#"
        SELECT shift_start, grace_end, late_end, half_day_start, shift_end
        FROM company_shift_schedules
        WHERE company_code = ?
        "#,
    )
    .bind(company_code)
    .fetch_optional(pool)
    .await;

    let schedule = match row {
        Ok(Some(row)) => ShiftSchedule::from(row),
        Ok(None) => default,
        Err(e) => {
            log::warn!(
                "Failed to load shift schedule for {}: {}, using default",
                company_code,
                e
            );
            return default;
        }
    };

    SHIFT_CACHE
        .insert(company_code.to_string(), schedule)
        .await;
    schedule
}
