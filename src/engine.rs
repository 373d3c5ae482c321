//! Pure attendance status computation.
//!
//! No I/O and no clock reads: the caller passes timestamps in, which keeps
//! every rule deterministic and unit-testable. Both the clock-in and the
//! clock-out paths go through [`derive_status`] so the boundary windows are
//! defined exactly once.
//!
//! The inequalities below intentionally mirror the payroll rules in
//! production: arrivals strictly before the grace end are on time (including
//! the 09:00-09:10 span), the late window is inclusive on both ends, and the
//! gap between the late window and the half-day cutoff counts as half-day.

use chrono::{Duration, NaiveDateTime};

use crate::model::{attendance::AttendanceStatus, shift::ShiftSchedule};

/// Minimum worked seconds for a full day's credit.
const FULL_DAY_SECS: i64 = 9 * 3600;
/// Minimum worked seconds for half-day credit.
const HALF_DAY_SECS: i64 = 5 * 3600;

/// Which shift window the clock-in time landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalWindow {
    /// Before the grace window ends (early arrivals included).
    OnTime,
    /// Within [grace_end, late_end], both ends inclusive.
    Late,
    /// Strictly between late_end and half_day_start.
    LateGap,
    /// At or after half_day_start.
    HalfDay,
}

/// Status plus the derived durations for one attendance record.
///
/// With no clock-out yet, the worked/overtime/early-leave durations are zero
/// and only `status` and `late_by` are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOutcome {
    pub status: AttendanceStatus,
    pub late_by: Duration,
    pub total_worked: Duration,
    pub overtime: Duration,
    pub early_leave: Duration,
}

/// Classify the clock-in time against the shift windows. First match wins.
pub fn arrival_window(clock_in: NaiveDateTime, shift: &ShiftSchedule) -> ArrivalWindow {
    let t = clock_in.time();
    if t >= shift.half_day_start {
        ArrivalWindow::HalfDay
    } else if t >= shift.grace_end && t <= shift.late_end {
        ArrivalWindow::Late
    } else if t > shift.late_end && t < shift.half_day_start {
        ArrivalWindow::LateGap
    } else {
        ArrivalWindow::OnTime
    }
}

/// Derive the status and durations for a record.
///
/// The status is always keyed off the clock-IN time; a clock-out only adds
/// the total-hours gate on top of the arrival window. The `LateGap` arm
/// deliberately credits HALFDAY for both the `>= 9h` and `>= 5h` gates — a
/// quirk inherited from the existing payroll semantics that must not be
/// "fixed" without sign-off (a test pins it).
pub fn derive_status(
    clock_in: NaiveDateTime,
    clock_out: Option<NaiveDateTime>,
    shift: &ShiftSchedule,
) -> StatusOutcome {
    let window = arrival_window(clock_in, shift);
    let shift_start = clock_in.date().and_time(shift.shift_start);
    let late_by = match window {
        ArrivalWindow::OnTime => Duration::zero(),
        _ => (clock_in - shift_start).max(Duration::zero()),
    };

    let Some(out) = clock_out else {
        let status = match window {
            ArrivalWindow::OnTime => AttendanceStatus::Present,
            ArrivalWindow::Late => AttendanceStatus::Late,
            ArrivalWindow::LateGap | ArrivalWindow::HalfDay => AttendanceStatus::HalfDay,
        };
        return StatusOutcome {
            status,
            late_by,
            total_worked: Duration::zero(),
            overtime: Duration::zero(),
            early_leave: Duration::zero(),
        };
    };

    let shift_end = clock_in.date().and_time(shift.shift_end);
    let total_worked = (out - clock_in).max(Duration::zero());
    let overtime = (out - shift_end).max(Duration::zero());
    let early_leave = (shift_end - out).max(Duration::zero());
    let worked_secs = total_worked.num_seconds();

    let status = match window {
        ArrivalWindow::HalfDay => AttendanceStatus::HalfDay,
        ArrivalWindow::Late => {
            if worked_secs >= FULL_DAY_SECS {
                AttendanceStatus::Late
            } else if worked_secs >= HALF_DAY_SECS {
                AttendanceStatus::HalfDay
            } else {
                AttendanceStatus::Absent
            }
        }
        ArrivalWindow::LateGap => {
            if worked_secs >= FULL_DAY_SECS {
                AttendanceStatus::HalfDay
            } else if worked_secs >= HALF_DAY_SECS {
                AttendanceStatus::HalfDay
            } else {
                AttendanceStatus::Absent
            }
        }
        ArrivalWindow::OnTime => {
            if worked_secs >= FULL_DAY_SECS {
                AttendanceStatus::Present
            } else if worked_secs >= HALF_DAY_SECS {
                AttendanceStatus::HalfDay
            } else {
                AttendanceStatus::Absent
            }
        }
    };

    StatusOutcome {
        status,
        late_by,
        total_worked,
        overtime,
        early_leave,
    }
}

/// Render a duration as zero-padded `HH:MM:SS`.
///
/// Hours do not wrap at 24; negative durations clamp to zero.
pub fn format_duration(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn shift() -> ShiftSchedule {
        ShiftSchedule {
            shift_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            grace_end: NaiveTime::from_hms_opt(9, 10, 0).unwrap(),
            late_end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            half_day_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            shift_end: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5) // a Monday
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn clock_in_before_grace_end_is_present_with_zero_lateness() {
        for t in [at(8, 30, 0), at(9, 0, 0), at(9, 5, 0), at(9, 9, 59)] {
            let out = derive_status(t, None, &shift());
            assert_eq!(out.status, AttendanceStatus::Present, "at {t}");
            assert_eq!(out.late_by, Duration::zero(), "at {t}");
        }
    }

    #[test]
    fn clock_in_late_window_is_inclusive_on_both_ends() {
        let lower = derive_status(at(9, 10, 0), None, &shift());
        assert_eq!(lower.status, AttendanceStatus::Late);
        assert_eq!(lower.late_by, Duration::minutes(10));

        let upper = derive_status(at(9, 30, 0), None, &shift());
        assert_eq!(upper.status, AttendanceStatus::Late);
        assert_eq!(upper.late_by, Duration::minutes(30));
    }

    #[test]
    fn clock_in_between_late_end_and_half_day_is_half_day() {
        for t in [at(9, 30, 1), at(9, 45, 0), at(9, 59, 59)] {
            let out = derive_status(t, None, &shift());
            assert_eq!(out.status, AttendanceStatus::HalfDay, "at {t}");
        }
    }

    #[test]
    fn clock_in_at_or_after_half_day_cutoff_is_half_day() {
        for t in [at(10, 0, 0), at(11, 30, 0), at(15, 0, 0)] {
            let out = derive_status(t, None, &shift());
            assert_eq!(out.status, AttendanceStatus::HalfDay, "at {t}");
        }
    }

    #[test]
    fn on_time_clock_out_gates_on_total_hours() {
        let clock_in = at(8, 55, 0);
        let cases = [
            (Duration::hours(9), AttendanceStatus::Present),
            (Duration::hours(6), AttendanceStatus::HalfDay),
            (Duration::hours(3), AttendanceStatus::Absent),
        ];
        for (worked, expected) in cases {
            let out = derive_status(clock_in, Some(clock_in + worked), &shift());
            assert_eq!(out.status, expected, "worked {worked}");
            assert_eq!(out.total_worked, worked);
        }
    }

    #[test]
    fn late_arrival_clock_out_gates_on_total_hours() {
        let clock_in = at(9, 15, 0);
        let cases = [
            (Duration::hours(9), AttendanceStatus::Late),
            (Duration::hours(6), AttendanceStatus::HalfDay),
            (Duration::hours(3), AttendanceStatus::Absent),
        ];
        for (worked, expected) in cases {
            let out = derive_status(clock_in, Some(clock_in + worked), &shift());
            assert_eq!(out.status, expected, "worked {worked}");
            assert_eq!(out.late_by, Duration::minutes(15));
        }
    }

    // Pins the inherited quirk: in the gap between 09:30 and 10:00 a full
    // 9-hour day still only earns HALFDAY. Do not change without sign-off
    // from the payroll owner.
    #[test]
    fn late_gap_arrival_never_earns_more_than_half_day() {
        let clock_in = at(9, 45, 0);
        let cases = [
            (Duration::hours(9), AttendanceStatus::HalfDay),
            (Duration::hours(6), AttendanceStatus::HalfDay),
            (Duration::hours(3), AttendanceStatus::Absent),
        ];
        for (worked, expected) in cases {
            let out = derive_status(clock_in, Some(clock_in + worked), &shift());
            assert_eq!(out.status, expected, "worked {worked}");
        }
    }

    #[test]
    fn half_day_arrival_is_half_day_regardless_of_hours() {
        let clock_in = at(10, 30, 0);
        let out = derive_status(clock_in, Some(clock_in + Duration::hours(9)), &shift());
        assert_eq!(out.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn full_day_with_early_leave() {
        let out = derive_status(at(9, 5, 0), Some(at(18, 30, 0)), &shift());
        assert_eq!(out.status, AttendanceStatus::Present);
        assert_eq!(format_duration(out.late_by), "00:00:00");
        assert_eq!(format_duration(out.total_worked), "09:25:00");
        assert_eq!(format_duration(out.overtime), "00:00:00");
        assert_eq!(format_duration(out.early_leave), "00:30:00");
    }

    #[test]
    fn overtime_past_shift_end() {
        let out = derive_status(at(9, 0, 0), Some(at(20, 15, 0)), &shift());
        assert_eq!(format_duration(out.overtime), "01:15:00");
        assert_eq!(format_duration(out.early_leave), "00:00:00");
    }

    #[test]
    fn format_duration_pads_and_never_wraps_days() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
        assert_eq!(format_duration(Duration::milliseconds(3_661_000)), "01:01:01");
        assert_eq!(
            format_duration(Duration::hours(25) + Duration::seconds(61)),
            "25:01:01"
        );
        assert_eq!(format_duration(Duration::seconds(-30)), "00:00:00");
    }
}
