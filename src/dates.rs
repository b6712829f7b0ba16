//! Calendar arithmetic and formatting for the contract date fields.
//!
//! Payment schedules are expressed as month offsets from the entry date;
//! adding months clamps the day-of-month to the shorter month instead of
//! spilling into the next one. Long-form dates render as
//! `"DD MONTHNAME YYYY"` with the month name upper-cased in the configured
//! locale (the contract is issued in es-MX).

use chrono::{Datelike, Months, NaiveDate};

/// Month names used by [`format_long`]. Default is es-MX.
#[derive(Debug, Clone)]
pub struct Locale {
    pub month_names: [&'static str; 12],
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            month_names: [
                "ENERO",
                "FEBRERO",
                "MARZO",
                "ABRIL",
                "MAYO",
                "JUNIO",
                "JULIO",
                "AGOSTO",
                "SEPTIEMBRE",
                "OCTUBRE",
                "NOVIEMBRE",
                "DICIEMBRE",
            ],
        }
    }
}

/// Add `n` months to `date`, clamping the day-of-month to the last valid
/// day of the target month (Jan 31 + 1 month is Feb 28/29, never Mar 2/3).
/// Negative offsets subtract with the same clamping.
pub fn add_months_clamped(date: NaiveDate, n: i32) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n as u32))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    // Only reachable at the edges of the supported year range; keeping the
    // anchor date degrades the schedule instead of aborting assembly.
    shifted.unwrap_or(date)
}

/// Map each offset through [`add_months_clamped`]. Monotonically
/// non-decreasing whenever `offsets` is non-decreasing.
pub fn sequence(anchor: NaiveDate, offsets: &[i32]) -> Vec<NaiveDate> {
    offsets
        .iter()
        .map(|&n| add_months_clamped(anchor, n))
        .collect()
}

/// Render `date` as `"DD MONTHNAME YYYY"`.
pub fn format_long(date: NaiveDate, locale: &Locale) -> String {
    let month = locale.month_names[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn clamps_to_short_month() {
        assert_eq!(add_months_clamped(d(2025, 1, 31), 1), d(2025, 2, 28));
    }

    #[test]
    fn clamps_to_leap_february() {
        assert_eq!(add_months_clamped(d(2024, 1, 31), 1), d(2024, 2, 29));
    }

    #[test]
    fn plain_addition_keeps_day() {
        assert_eq!(add_months_clamped(d(2025, 3, 15), 2), d(2025, 5, 15));
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(add_months_clamped(d(2025, 11, 30), 3), d(2026, 2, 28));
    }

    #[test]
    fn negative_offsets_subtract() {
        assert_eq!(add_months_clamped(d(2025, 3, 31), -1), d(2025, 2, 28));
    }

    #[test]
    fn sequence_is_monotone_for_monotone_offsets() {
        let dates = sequence(d(2025, 1, 31), &[0, 1, 2, 3, 4, 5]);
        for pair in dates.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn long_format_uses_uppercase_month() {
        let locale = Locale::default();
        assert_eq!(format_long(d(2025, 8, 3), &locale), "03 AGOSTO 2025");
        assert_eq!(format_long(d(2024, 12, 25), &locale), "25 DICIEMBRE 2024");
    }
}
