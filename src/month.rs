//! Calendar-month windows and date-string conversion.
//!
//! Dates cross the API boundary as "YYYY-MM-DD" strings and months as
//! "YYYY-MM" labels, while storage holds purchase dates as epoch-second
//! timestamps. All conversions use UTC date boundaries with no time-of-day
//! component retained.

use serde::Serializer;
use time::{
    Date, Month, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a "YYYY-MM-DD" date string into epoch seconds at UTC midnight.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] wrapping the original parse failure.
pub fn parse_date_string(date: &str) -> Result<i64, Error> {
    let parsed = Date::parse(date, &DATE_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), date.to_string()))?;

    Ok(parsed.midnight().assume_utc().unix_timestamp())
}

/// Format an epoch-second timestamp as its UTC "YYYY-MM-DD" date.
pub fn format_timestamp(timestamp: i64) -> Result<String, Error> {
    date_from_timestamp(timestamp)?
        .format(&DATE_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), timestamp.to_string()))
}

/// Serialize an epoch-second timestamp as a "YYYY-MM-DD" string.
///
/// Used by [Expense](crate::models::Expense) to produce its `date` field.
pub fn serialize_date_string<S>(timestamp: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = format_timestamp(*timestamp).map_err(serde::ser::Error::custom)?;

    serializer.serialize_str(&text)
}

fn date_from_timestamp(timestamp: i64) -> Result<Date, Error> {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map(|date_time| date_time.date())
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), timestamp.to_string()))
}

/// A calendar month, the unit of range queries and statistics buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    /// 1 (January) through 12 (December).
    month: u8,
}

impl MonthKey {
    /// Parse a "YYYY-MM" month label.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateFormat] wrapping the original parse
    /// failure.
    pub fn parse(month: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            Error::InvalidDateFormat(reason.to_string(), month.to_string())
        };

        let (year_text, month_text) = month
            .split_once('-')
            .ok_or_else(|| invalid("expected \"YYYY-MM\""))?;

        let year = year_text
            .parse::<i32>()
            .map_err(|error| invalid(&error.to_string()))?;
        let month_number = month_text
            .parse::<u8>()
            .map_err(|error| invalid(&error.to_string()))?;

        if !(1..=12).contains(&month_number) {
            return Err(invalid("month must be between 1 and 12"));
        }

        Ok(Self {
            year,
            month: month_number,
        })
    }

    /// The month containing the current instant (UTC).
    pub fn current() -> Self {
        let today = OffsetDateTime::now_utc().date();

        Self {
            year: today.year(),
            month: u8::from(today.month()),
        }
    }

    /// The month containing an epoch-second timestamp.
    pub fn from_timestamp(timestamp: i64) -> Result<Self, Error> {
        let date = date_from_timestamp(timestamp)?;

        Ok(Self {
            year: date.year(),
            month: u8::from(date.month()),
        })
    }

    /// The "YYYY-MM" label for this month.
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// The numeric month-of-year, 1 through 12.
    pub fn month_number(self) -> u8 {
        self.month
    }

    /// The first second of the month (epoch seconds).
    pub fn first_second(self) -> i64 {
        let start = Date::from_calendar_date(self.year, month_from_number(self.month), 1)
            .expect("invalid month start date");

        start.midnight().assume_utc().unix_timestamp()
    }

    /// The last second of the month (epoch seconds).
    pub fn last_second(self) -> i64 {
        self.next().first_second() - 1
    }

    /// The following calendar month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `months` calendar months before this one.
    pub fn minus_months(self, months: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - months as i64;

        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u8,
        }
    }
}

/// Every month from `start` through `end`, inclusive and contiguous.
///
/// Returns an empty list when `start` is after `end`.
pub fn months_through(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut current = start;

    while current <= end {
        months.push(current);
        current = current.next();
    }

    months
}

fn month_from_number(month: u8) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        12 => Month::December,
        _ => panic!("invalid month number {month}"),
    }
}


#[cfg(test)]
mod month_key_tests {
    use crate::Error;

    use super::{MonthKey, months_through};

    #[test]
    fn parses_month_label() {
        let month = MonthKey::parse("2024-03").unwrap();

        assert_eq!(month.label(), "2024-03");
        assert_eq!(month.month_number(), 3);
    }

    #[test]
    fn rejects_malformed_month_label() {
        for label in ["2024", "2024-13", "2024-00", "March 2024"] {
            let result = MonthKey::parse(label);

            assert!(
                matches!(result, Err(Error::InvalidDateFormat(_, _))),
                "expected {label} to be rejected"
            );
        }
    }

    #[test]
    fn window_covers_month_inclusive() {
        let february = MonthKey::parse("2024-02").unwrap();

        // 2024 is a leap year, so the window spans 29 full days.
        assert_eq!(february.first_second(), 1_706_745_600);
        assert_eq!(february.last_second(), 1_709_251_199);
        assert_eq!(
            february.last_second() - february.first_second() + 1,
            29 * 86_400
        );
    }

    #[test]
    fn minus_months_crosses_year_boundary() {
        let january = MonthKey::parse("2024-01").unwrap();

        assert_eq!(january.minus_months(1).label(), "2023-12");
        assert_eq!(january.minus_months(13).label(), "2022-12");
        assert_eq!(january.minus_months(0).label(), "2024-01");
    }

    #[test]
    fn months_through_is_contiguous() {
        let start = MonthKey::parse("2023-11").unwrap();
        let end = MonthKey::parse("2024-02").unwrap();

        let labels: Vec<String> = months_through(start, end)
            .into_iter()
            .map(MonthKey::label)
            .collect();

        assert_eq!(labels, ["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn months_through_is_empty_when_start_after_end() {
        let start = MonthKey::parse("2024-03").unwrap();
        let end = MonthKey::parse("2024-01").unwrap();

        assert!(months_through(start, end).is_empty());
    }
}
