//! Calendar month (year + month) used as the aggregation period.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{EngineError, ResultEngine};

/// A calendar month, independent of the day.
///
/// Internally this is the first day of the month, so ordering and equality
/// follow the calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Builds a month, rejecting month numbers outside `1..=12`.
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| EngineError::InvalidMonthFormat(format!("{year:04}-{month:02}")))
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Number of days in the month (28 to 31).
    #[must_use]
    pub fn days(self) -> u32 {
        u32::from(self.0.num_days_in_month())
    }

    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0 + Days::new(u64::from(self.days() - 1))
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn next(self) -> ResultEngine<Self> {
        self.add_months(1)
    }

    pub fn prev(self) -> ResultEngine<Self> {
        self.sub_months(1)
    }

    /// Fails with `InvalidRange` past the last representable date.
    pub fn add_months(self, count: u32) -> ResultEngine<Self> {
        self.0
            .checked_add_months(Months::new(count))
            .map(Self)
            .ok_or_else(|| out_of_calendar(self, "+", count))
    }

    /// Fails with `InvalidRange` before the first representable date.
    pub fn sub_months(self, count: u32) -> ResultEngine<Self> {
        self.0
            .checked_sub_months(Months::new(count))
            .map(Self)
            .ok_or_else(|| out_of_calendar(self, "-", count))
    }
}

fn out_of_calendar(month: YearMonth, op: &str, count: u32) -> EngineError {
    EngineError::InvalidRange(format!("{month} {op} {count} months is outside the calendar"))
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    /// Parses exactly `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidMonthFormat(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_and_display() {
        let month: YearMonth = "2024-07".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 7);
        assert_eq!(month.to_string(), "2024-07");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for raw in ["", "2024", "2024-7", "2024-13", "2024-00", "24-07", "2024/07", "2024-07-01", " 2024-07", "２０２４-07"] {
            assert_eq!(
                raw.parse::<YearMonth>(),
                Err(EngineError::InvalidMonthFormat(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn month_bounds_follow_real_day_count() {
        let feb_leap = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb_leap.last_day(), date(2024, 2, 29));
        let feb = YearMonth::new(2023, 2).unwrap();
        assert_eq!(feb.last_day(), date(2023, 2, 28));
        assert_eq!(YearMonth::new(2024, 4).unwrap().days(), 30);
        assert_eq!(YearMonth::new(2024, 12).unwrap().last_day(), date(2024, 12, 31));
    }

    #[test]
    fn contains_is_inclusive() {
        let july = YearMonth::new(2024, 7).unwrap();
        assert!(july.contains(date(2024, 7, 1)));
        assert!(july.contains(date(2024, 7, 31)));
        assert!(!july.contains(date(2024, 6, 30)));
        assert!(!july.contains(date(2024, 8, 1)));
    }

    #[test]
    fn navigation_crosses_year_boundaries() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next().unwrap(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(dec.next().unwrap().prev().unwrap(), dec);
        assert_eq!(dec.sub_months(5).unwrap(), YearMonth::new(2024, 7).unwrap());
        assert_eq!(YearMonth::of(date(2024, 2, 29)), YearMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn navigation_past_the_calendar_is_an_error() {
        let last = YearMonth::of(NaiveDate::MAX);
        assert!(matches!(last.next(), Err(EngineError::InvalidRange(_))));
        assert!(matches!(
            last.sub_months(u32::MAX),
            Err(EngineError::InvalidRange(_))
        ));
        assert_eq!(last.last_day(), NaiveDate::MAX);
        assert!(YearMonth::of(NaiveDate::MIN).prev().is_err());
    }

    #[test]
    fn serde_uses_the_string_form() {
        let month = YearMonth::new(2024, 7).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-07\"");
        assert!(serde_json::from_str::<YearMonth>("\"2024-7\"").is_err());
    }
}
