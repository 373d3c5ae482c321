use chrono::{Datelike, NaiveDate, Weekday};

/// Saturday and Sunday are non-working days for every tenant.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Half-open `[first, next_first)` date range for a calendar month.
/// Returns `None` for a month outside 1-12.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(d(2026, 1, 3))); // Saturday
        assert!(is_weekend(d(2026, 1, 4))); // Sunday
        assert!(!is_weekend(d(2026, 1, 5))); // Monday
    }

    #[test]
    fn month_bounds_handles_year_rollover() {
        assert_eq!(
            month_bounds(2026, 12),
            Some((d(2026, 12, 1), d(2027, 1, 1)))
        );
        assert_eq!(month_bounds(2026, 2), Some((d(2026, 2, 1), d(2026, 3, 1))));
        assert_eq!(month_bounds(2026, 13), None);
        assert_eq!(month_bounds(2026, 0), None);
    }
}
