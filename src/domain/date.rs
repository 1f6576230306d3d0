use chrono::{Local, Months, NaiveDate};

/// Canonical calendar day format. Zero-padded, so string order equals date order.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a canonical `YYYY-MM-DD` day.
///
/// Only the zero-padded form is accepted ("2025-1-5" is rejected).
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, DAY_FORMAT).ok()
}

/// Render a day in canonical `YYYY-MM-DD` form.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// The local calendar day right now, read from the local wall clock (not UTC).
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The same day one calendar month earlier, clamped to the end of a shorter month
/// (2025-03-31 -> 2025-02-28).
pub fn one_month_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(NaiveDate::MIN)
}

/// First and last day of a calendar month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DAY_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_day_requires_zero_padding() {
        assert_eq!(parse_day("2025-01-05"), Some(day("2025-01-05")));
        assert_eq!(parse_day(" 2025-01-05 "), Some(day("2025-01-05")));
        assert_eq!(parse_day("2025-1-5"), None);
        assert_eq!(parse_day("05/01/2025"), None);
        assert_eq!(parse_day("2025-02-30"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_format_day_orders_like_dates() {
        let earlier = day("2024-12-31");
        let later = day("2025-01-01");
        assert_eq!(format_day(earlier), "2024-12-31");
        assert!(format_day(earlier) < format_day(later));
        assert!(earlier < later);
    }

    #[test]
    fn test_one_month_before() {
        assert_eq!(one_month_before(day("2025-03-15")), day("2025-02-15"));
        assert_eq!(one_month_before(day("2025-01-10")), day("2024-12-10"));
        assert_eq!(one_month_before(day("2025-03-31")), day("2025-02-28"));
        assert_eq!(one_month_before(day("2024-03-31")), day("2024-02-29"));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 2),
            Some((day("2024-02-01"), day("2024-02-29")))
        );
        assert_eq!(
            month_bounds(2024, 12),
            Some((day("2024-12-01"), day("2024-12-31")))
        );
        assert_eq!(month_bounds(2024, 13), None);
    }
}
