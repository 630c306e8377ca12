//! Temporal granularity and the fixed 365-day calendar
//!
//! Daily series are exposed on a 365-day calendar (leap days are merged
//! away), so month lookups never need to know the calendar year.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Days per month of a 365-day year
pub const DAYS_IN_MONTH: [usize; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days in a normalised year
pub const DAYS_PER_YEAR: usize = 365;

/// Days in a leap year before normalisation
pub const DAYS_PER_LEAP_YEAR: usize = 366;

/// Months in a year
pub const MONTHS_PER_YEAR: usize = 12;

/// 0-based day index of Feb 1
pub const FEB_1: usize = 31;

/// 0-based day index of Feb 28
pub const FEB_28: usize = 58;

/// 0-based day index of Feb 29 in a 366-day year
pub const FEB_29: usize = 59;

/// Whether a series holds one record per day or per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    /// Whether `count` records form a valid raw (pre-normalisation) year
    pub fn accepts_raw_year(self, count: usize) -> bool {
        match self {
            Granularity::Daily => count == DAYS_PER_YEAR || count == DAYS_PER_LEAP_YEAR,
            Granularity::Monthly => count == MONTHS_PER_YEAR,
        }
    }

    /// Human readable expected count for error messages
    pub fn expected_raw_count(self) -> &'static str {
        match self {
            Granularity::Daily => "365 or 366",
            Granularity::Monthly => "12",
        }
    }

    /// Records per year once leap days are merged
    pub fn records_per_year(self) -> usize {
        match self {
            Granularity::Daily => DAYS_PER_YEAR,
            Granularity::Monthly => MONTHS_PER_YEAR,
        }
    }

    /// Name of one time slice, used in messages ("day" / "month")
    pub fn unit(self) -> &'static str {
        match self {
            Granularity::Daily => "day",
            Granularity::Monthly => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => f.write_str("Daily"),
            Granularity::Monthly => f.write_str("Monthly"),
        }
    }
}

/// 0-based month of a 0-based day index on the 365-day calendar
///
/// Day indices past the end of the year map to December.
pub fn month_of_day(day: usize) -> usize {
    let mut end = 0;
    for (month, days) in DAYS_IN_MONTH.iter().enumerate() {
        end += days;
        if day < end {
            return month;
        }
    }
    MONTHS_PER_YEAR - 1
}

/// 0-based day index of the first day of `month`
pub fn first_day_of_month(month: usize) -> usize {
    DAYS_IN_MONTH.iter().take(month).sum()
}

/// 0-based day index of the middle of `month`
pub fn mid_month_day(month: usize) -> f64 {
    first_day_of_month(month) as f64 + DAYS_IN_MONTH[month] as f64 / 2.0
}
