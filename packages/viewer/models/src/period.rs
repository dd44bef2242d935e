//! Selectable time periods.
//!
//! A [`TimePeriod`] is one calendar year, treated as the closed date
//! interval `[Jan 1, Dec 31]`. The set of years a user may pick from is a
//! [`SupportedPeriods`], which also carries the default selection.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single selectable calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePeriod(u16);

impl TimePeriod {
    /// Creates a period for the given calendar year.
    #[must_use]
    pub const fn year(year: u16) -> Self {
        Self(year)
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the closed date interval covered by this period.
    #[must_use]
    pub fn interval(self) -> DateInterval {
        let year = i32::from(self.0);
        // Every u16 year is inside chrono's representable range.
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        DateInterval { start, end }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Error returned when a string is not a four-digit year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid period {:?}: expected a four-digit year", self.input)
    }
}

impl std::error::Error for ParsePeriodError {}

impl FromStr for TimePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePeriodError {
                input: s.to_string(),
            });
        }
        trimmed.parse::<u16>().map(Self).map_err(|_| ParsePeriodError {
            input: s.to_string(),
        })
    }
}

/// A closed interval of calendar dates (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    /// First day of the interval.
    pub start: NaiveDate,
    /// Last day of the interval.
    pub end: NaiveDate,
}

impl DateInterval {
    /// Returns `true` if `date` falls inside the interval.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Error returned when a period is not one of the supported periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPeriodError {
    /// The rejected period.
    pub period: TimePeriod,
}

impl std::fmt::Display for InvalidPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "period {} is not a supported period", self.period)
    }
}

impl std::error::Error for InvalidPeriodError {}

/// The ordered set of periods a user may select, plus the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedPeriods {
    periods: Vec<TimePeriod>,
    default: TimePeriod,
}

impl SupportedPeriods {
    /// Builds a supported set from arbitrary periods (sorted and
    /// deduplicated) and a default selection.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] if `default` is not in `periods`
    /// (which includes the case where `periods` is empty).
    pub fn new(
        mut periods: Vec<TimePeriod>,
        default: TimePeriod,
    ) -> Result<Self, InvalidPeriodError> {
        periods.sort_unstable();
        periods.dedup();
        if periods.binary_search(&default).is_err() {
            return Err(InvalidPeriodError { period: default });
        }
        Ok(Self { periods, default })
    }

    /// Builds the inclusive year range `first..=last`, defaulting to the
    /// most recent year.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] if the range is empty.
    pub fn year_range(first: u16, last: u16) -> Result<Self, InvalidPeriodError> {
        let periods = (first..=last).map(TimePeriod::year).collect();
        Self::new(periods, TimePeriod::year(last))
    }

    /// Returns `true` if `period` is selectable.
    #[must_use]
    pub fn contains(&self, period: TimePeriod) -> bool {
        self.periods.binary_search(&period).is_ok()
    }

    /// Checks that `period` is selectable.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPeriodError`] if it is not.
    pub fn validate(&self, period: TimePeriod) -> Result<TimePeriod, InvalidPeriodError> {
        if self.contains(period) {
            Ok(period)
        } else {
            Err(InvalidPeriodError { period })
        }
    }

    /// The default selection.
    #[must_use]
    pub const fn default_period(&self) -> TimePeriod {
        self.default
    }

    /// All selectable periods, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[TimePeriod] {
        &self.periods
    }

    /// The selection-control labels, oldest first (e.g. `"2015"`).
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.periods.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_spans_calendar_year() {
        let interval = TimePeriod::year(2020).interval();
        assert_eq!(interval.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(interval.end, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert!(interval.contains(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()));
        assert!(!interval.contains(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()));
    }

    #[test]
    fn parses_four_digit_years_only() {
        assert_eq!("2020".parse::<TimePeriod>(), Ok(TimePeriod::year(2020)));
        assert_eq!(" 2023 ".parse::<TimePeriod>(), Ok(TimePeriod::year(2023)));
        assert!("20".parse::<TimePeriod>().is_err());
        assert!("20x0".parse::<TimePeriod>().is_err());
        assert!("-2020".parse::<TimePeriod>().is_err());
        assert!("".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn displays_as_year_string() {
        assert_eq!(TimePeriod::year(2015).to_string(), "2015");
    }

    #[test]
    fn year_range_defaults_to_most_recent() {
        let periods = SupportedPeriods::year_range(2015, 2023).unwrap();
        assert_eq!(periods.as_slice().len(), 9);
        assert_eq!(periods.default_period(), TimePeriod::year(2023));
        assert_eq!(periods.labels().first().map(String::as_str), Some("2015"));
        assert!(periods.contains(TimePeriod::year(2019)));
        assert!(!periods.contains(TimePeriod::year(2030)));
    }

    #[test]
    fn rejects_default_outside_set() {
        let err = SupportedPeriods::new(vec![TimePeriod::year(2015)], TimePeriod::year(2016))
            .unwrap_err();
        assert_eq!(err.period, TimePeriod::year(2016));
        assert!(SupportedPeriods::year_range(2023, 2015).is_err());
    }

    #[test]
    fn new_sorts_and_dedups() {
        let periods = SupportedPeriods::new(
            vec![
                TimePeriod::year(2017),
                TimePeriod::year(2015),
                TimePeriod::year(2017),
            ],
            TimePeriod::year(2015),
        )
        .unwrap();
        assert_eq!(
            periods.as_slice(),
            &[TimePeriod::year(2015), TimePeriod::year(2017)]
        );
    }
}
