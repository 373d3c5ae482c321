//! Absence sweep: guarantees one attendance row per active employee per
//! working day by inserting ABSENT placeholders where nobody clocked in.
//!
//! Two triggers converge on [`sweep_absences`]: a daily timer (same-day
//! sweep, after the half-day cutoff has passed) and a one-shot backfill over
//! the trailing days on startup, covering downtime. Idempotence comes from
//! the `uq_attendance_day` unique key, not from a check-then-insert: every
//! run simply inserts and treats a duplicate-key error as "already covered".
//! That also makes concurrent service instances safe to run.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use futures_util::StreamExt;
use sqlx::MySqlPool;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::is_unique_violation;
use crate::model::attendance::AttendanceStatus;
use crate::model::company::Company;
use crate::model::employee::Employee;
use crate::utils::{shift_cache, time_window::is_weekend};

/// Note stamped onto sweep-created rows so they are distinguishable from
/// clock-in activity.
pub const SWEEP_NOTE: &str = "Auto-generated by absence sweep";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepScope {
    /// Today's sweep; only due once the half-day cutoff has passed.
    SameDay,
    /// Startup catch-up over past days; never touches today.
    Backfill,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub inserted: u64,
    pub already_covered: u64,
    pub failed: u64,
}

/// Whether a sweep should mark absences for `reference_date` at all.
///
/// Weekends are never swept. A same-day sweep is due only for today and only
/// once the tenant's half-day cutoff has passed (employees get until then to
/// clock in). A backfill sweep covers strictly-past dates within the
/// trailing window; today is left to the same-day sweep.
pub fn sweep_due(
    reference_date: NaiveDate,
    scope: SweepScope,
    now: NaiveDateTime,
    half_day_start: NaiveTime,
    backfill_days: u32,
) -> bool {
    if is_weekend(reference_date) {
        return false;
    }
    let today = now.date();
    match scope {
        SweepScope::SameDay => reference_date == today && now.time() >= half_day_start,
        SweepScope::Backfill => {
            reference_date < today && reference_date >= today - Duration::days(backfill_days as i64)
        }
    }
}

/// Next wall-clock instant at which the daily sweep should fire.
pub fn next_fire(now: NaiveDateTime, fire_at: NaiveTime) -> NaiveDateTime {
    if now.time() < fire_at {
        now.date().and_time(fire_at)
    } else {
        (now.date() + Duration::days(1)).and_time(fire_at)
    }
}

async fn insert_absent(
    pool: &MySqlPool,
    employee_id: u64,
    company_code: &str,
    date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, company_code, date, status, is_clocked_in, note)
        VALUES (?, ?, ?, ?, FALSE, ?)
        "#,
    )
    .bind(employee_id)
    .bind(company_code)
    .bind(date)
    .bind(AttendanceStatus::Absent.to_string())
    .bind(SWEEP_NOTE)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run one sweep for `reference_date`.
///
/// Iterates active employees of every active tenant and inserts an ABSENT
/// row where the day is uncovered. A failure for one employee is logged and
/// the iteration continues; the sweep is not transactional, and a partial
/// run is corrected by the next one thanks to the unique key.
pub async fn sweep_absences(
    pool: &MySqlPool,
    reference_date: NaiveDate,
    scope: SweepScope,
    now: NaiveDateTime,
    config: &Config,
) -> Result<SweepStats> {
    let mut stats = SweepStats::default();

    if is_weekend(reference_date) {
        info!(%reference_date, "Skipping absence sweep: weekend");
        return Ok(stats);
    }

    let companies = sqlx::query_as::<_, Company>(
        r#"SELECT code, name, is_active FROM companies WHERE is_active = TRUE"#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to enumerate active companies")?;

    for company in companies {
        let company_code = company.code;
        let shift = shift_cache::for_company(pool, &company_code, config.default_shift).await;
        if !sweep_due(
            reference_date,
            scope,
            now,
            shift.half_day_start,
            config.backfill_days,
        ) {
            continue;
        }

        let mut employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_code, first_name, last_name, email, status
            FROM employees
            WHERE company_code = ? AND status = 'active'
            "#,
        )
        .bind(&company_code)
        .fetch(pool);

        while let Some(row) = employees.next().await {
            let employee = match row {
                Ok(employee) => employee,
                Err(e) => {
                    warn!(error = %e, company_code, "Failed to read employee row during sweep");
                    stats.failed += 1;
                    continue;
                }
            };

            match insert_absent(pool, employee.id, &company_code, reference_date).await {
                Ok(true) => stats.inserted += 1,
                Ok(false) => stats.already_covered += 1,
                Err(e) => {
                    warn!(
                        error = %e,
                        employee_id = employee.id,
                        employee_email = %employee.email,
                        company_code,
                        %reference_date,
                        "Failed to insert absence record, continuing"
                    );
                    stats.failed += 1;
                }
            }
        }
    }

    info!(
        %reference_date,
        ?scope,
        inserted = stats.inserted,
        already_covered = stats.already_covered,
        failed = stats.failed,
        "Absence sweep finished"
    );
    Ok(stats)
}

/// Spawn the two sweep triggers: a one-shot backfill over the trailing
/// `backfill_days`, and a daily loop firing at `config.sweep_time`.
pub fn spawn(pool: MySqlPool, config: Config) {
    let backfill_pool = pool.clone();
    let backfill_cfg = config.clone();
    actix_web::rt::spawn(async move {
        let now = Local::now().naive_local();
        for days_back in 1..=backfill_cfg.backfill_days as i64 {
            let date = now.date() - Duration::days(days_back);
            if let Err(e) =
                sweep_absences(&backfill_pool, date, SweepScope::Backfill, now, &backfill_cfg)
                    .await
            {
                error!(error = %e, %date, "Backfill sweep failed");
            }
        }
    });

    actix_web::rt::spawn(async move {
        loop {
            let now = Local::now().naive_local();
            let wait = (next_fire(now, config.sweep_time) - now)
                .to_std()
                .unwrap_or_default();
            actix_web::rt::time::sleep(wait).await;

            let now = Local::now().naive_local();
            if let Err(e) =
                sweep_absences(&pool, now.date(), SweepScope::SameDay, now, &config).await
            {
                error!(error = %e, "Daily absence sweep failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn half_day() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        d(2026, 1, 5).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_sweep_waits_for_half_day_cutoff() {
        let today = d(2026, 1, 5);
        assert!(!sweep_due(
            today,
            SweepScope::SameDay,
            monday_at(9, 59),
            half_day(),
            30
        ));
        assert!(sweep_due(
            today,
            SweepScope::SameDay,
            monday_at(10, 0),
            half_day(),
            30
        ));
        assert!(sweep_due(
            today,
            SweepScope::SameDay,
            monday_at(10, 30),
            half_day(),
            30
        ));
    }

    #[test]
    fn same_day_sweep_only_covers_today() {
        let now = monday_at(10, 30);
        assert!(!sweep_due(d(2026, 1, 2), SweepScope::SameDay, now, half_day(), 30));
        assert!(!sweep_due(d(2026, 1, 6), SweepScope::SameDay, now, half_day(), 30));
    }

    #[test]
    fn weekends_are_never_swept() {
        let saturday = d(2026, 1, 3);
        let sunday = d(2026, 1, 4);
        let now = monday_at(10, 30);
        for scope in [SweepScope::SameDay, SweepScope::Backfill] {
            assert!(!sweep_due(saturday, scope, now, half_day(), 30));
            assert!(!sweep_due(sunday, scope, now, half_day(), 30));
        }
    }

    #[test]
    fn backfill_covers_trailing_window_but_never_today() {
        let now = monday_at(10, 30);
        let today = now.date();
        assert!(!sweep_due(today, SweepScope::Backfill, now, half_day(), 30));
        // Friday before, inside the window
        assert!(sweep_due(d(2026, 1, 2), SweepScope::Backfill, now, half_day(), 30));
        // exactly 30 days back (2025-12-06 is a Saturday, use Friday the 5th
        // with a 31-day window to stay off the weekend)
        assert!(sweep_due(
            d(2025, 12, 5),
            SweepScope::Backfill,
            now,
            half_day(),
            31
        ));
        // outside the window
        assert!(!sweep_due(
            d(2025, 12, 4),
            SweepScope::Backfill,
            now,
            half_day(),
            30
        ));
    }

    #[test]
    fn backfill_ignores_time_of_day() {
        let early = monday_at(0, 5);
        assert!(sweep_due(d(2026, 1, 2), SweepScope::Backfill, early, half_day(), 30));
    }

    #[test]
    fn next_fire_rolls_to_tomorrow_after_the_slot() {
        let fire_at = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(
            next_fire(monday_at(9, 0), fire_at),
            d(2026, 1, 5).and_time(fire_at)
        );
        assert_eq!(
            next_fire(monday_at(10, 30), fire_at),
            d(2026, 1, 6).and_time(fire_at)
        );
        assert_eq!(
            next_fire(monday_at(23, 59), fire_at),
            d(2026, 1, 6).and_time(fire_at)
        );
    }
}
