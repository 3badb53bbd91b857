//! Julian to proleptic Gregorian date conversion.
//!
//! Dates go through their Julian day number. Years are astronomical
//! (1 BCE is year 0); all divisions floor, so negative years work.

/// A calendar date with an astronomical year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    /// Astronomical year.
    pub year: i64,
    /// Month, 1 to 12.
    pub month: u8,
    /// Day of month, 1 to 31.
    pub day: u8,
}

impl Date {
    /// Creates a date.
    #[must_use]
    pub fn new(year: i64, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

/// Julian day number of a date in the proleptic Julian calendar.
///
/// Computed in `i128` so that any `i64` year fits.
#[must_use]
pub fn julian_day_from_julian(date: Date) -> i128 {
    let month = i128::from(date.month);
    let a = (14 - month).div_euclid(12);
    let y = i128::from(date.year) + 4800 - a;
    let m = month + 12 * a - 3;
    i128::from(date.day) + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - 32083
}

/// Proleptic Gregorian date of a Julian day number, or `None` when the
/// year does not fit an `i64`.
#[must_use]
pub fn gregorian_from_julian_day(jdn: i128) -> Option<Date> {
    let a = jdn.checked_add(32044)?;
    let b = a.checked_mul(4)?.checked_add(3)?.div_euclid(146_097);
    let c = a - b.checked_mul(146_097)?.div_euclid(4);
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2).div_euclid(153);
    let day = e - (153 * m + 2).div_euclid(5) + 1;
    let month = m + 3 - 12 * m.div_euclid(10);
    let year = b.checked_mul(100)?.checked_add(d - 4800 + m.div_euclid(10))?;
    Some(Date::new(
        i64::try_from(year).ok()?,
        u8::try_from(month).ok()?,
        u8::try_from(day).ok()?,
    ))
}

/// Converts a proleptic Julian date to the proleptic Gregorian calendar.
/// `None` when the converted year leaves the `i64` range.
#[must_use]
pub fn julian_to_gregorian(date: Date) -> Option<Date> {
    gregorian_from_julian_day(julian_day_from_julian(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gregorian_reform() {
        assert_eq!(
            julian_to_gregorian(Date::new(1582, 10, 5)),
            Some(Date::new(1582, 10, 15))
        );
    }

    #[test]
    fn russian_calendar_switch() {
        assert_eq!(
            julian_to_gregorian(Date::new(1918, 1, 31)),
            Some(Date::new(1918, 2, 13))
        );
    }

    #[test]
    fn crosses_gregorian_only_leap_difference() {
        assert_eq!(julian_to_gregorian(Date::new(1700, 2, 18)), Some(Date::new(1700, 2, 28)));
        assert_eq!(julian_to_gregorian(Date::new(1700, 2, 19)), Some(Date::new(1700, 3, 1)));
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(julian_to_gregorian(Date::new(1642, 12, 25)), Some(Date::new(1643, 1, 4)));
    }

    #[test]
    fn negative_years() {
        // Ides of March, 44 BCE (astronomical year -43).
        assert_eq!(julian_to_gregorian(Date::new(-43, 3, 15)), Some(Date::new(-43, 3, 13)));
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        let far = julian_to_gregorian(Date::new(9_999_999_999_999_999, 1, 1));
        assert!(far.is_some_and(|d| d.year > 9_999_999_999_999_000));
        assert_eq!(julian_to_gregorian(Date::new(i64::MAX, 12, 31)), None);
        assert!(julian_to_gregorian(Date::new(i64::MIN, 1, 1)).is_none());
    }
}
