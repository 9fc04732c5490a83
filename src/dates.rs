use chrono::{Datelike, Local, NaiveDate};

use crate::error::{Error, Result};

const FRONT_MATTER_DATE: &str = "%Y-%m-%d";

/// Long-form en-US date, e.g. `March 5, 2021`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), FRONT_MATTER_DATE).map_err(|source| Error::Date {
        value: value.to_string(),
        source,
    })
}

/// Today's date on the server's wall clock. Read once per render.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Footer text: `© 2021 - 2026`, or `© 2026` when the site started this year.
pub fn copyright_range(since: i32, today: NaiveDate) -> String {
    let year = today.year();
    if since >= year {
        format!("© {}", year)
    } else {
        format!("© {} - {}", since, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_long_month_without_day_padding() {
        assert_eq!(format_long_date(date(2021, 3, 5)), "March 5, 2021");
        assert_eq!(format_long_date(date(2023, 12, 25)), "December 25, 2023");
    }

    #[test]
    fn formatting_is_repeatable() {
        let d = date(2022, 1, 9);
        assert_eq!(format_long_date(d), format_long_date(d));
    }

    #[test]
    fn parses_front_matter_dates() {
        assert_eq!(parse_date("2021-03-05").unwrap(), date(2021, 3, 5));
        assert_eq!(parse_date(" 2021-03-05 ").unwrap(), date(2021, 3, 5));
        assert!(matches!(parse_date("March 5"), Err(Error::Date { .. })));
    }

    #[test]
    fn copyright_range_tracks_current_year() {
        assert_eq!(copyright_range(2021, date(2026, 10, 17)), "© 2021 - 2026");
        assert_eq!(copyright_range(2026, date(2026, 1, 1)), "© 2026");
    }
}
