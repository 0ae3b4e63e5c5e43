//! Inclusive date intervals
//!
//! A resolution request runs inside exactly one ambient `TimeRange`. Methods
//! use it to annualize quantities (days in the calendar year) and to build the
//! active subtimeframe of a vehicle (acquisition to retirement).

use crate::{CarbonateError, CarbonateResult};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An inclusive interval of calendar days
///
/// Stored half-open so that an empty range (zero days) can still carry the
/// date it is anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: NaiveDate,
    until: NaiveDate,
}

impl TimeRange {
    /// Create a range covering `start` through `end`, both inclusive
    pub fn new(start: NaiveDate, end: NaiveDate) -> CarbonateResult<Self> {
        if start > end {
            return Err(CarbonateError::InvalidTimeRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        let until = end.succ_opt().ok_or_else(|| {
            CarbonateError::InvalidTimeRange(format!("end {} is out of range", end))
        })?;
        Ok(Self { start, until })
    }

    /// The whole calendar year
    pub fn year(year: i32) -> CarbonateResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let until = year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1));
        match (start, until) {
            (Some(start), Some(until)) => Ok(Self { start, until }),
            _ => Err(CarbonateError::InvalidTimeRange(format!(
                "year {} is out of range",
                year
            ))),
        }
    }

    /// The calendar year containing today (UTC)
    pub fn current_year() -> Self {
        let today = Utc::now().date_naive();
        Self::year(today.year()).unwrap_or_else(|_| Self::empty(today))
    }

    /// A zero-length range anchored at `anchor`
    pub fn empty(anchor: NaiveDate) -> Self {
        Self {
            start: anchor,
            until: anchor,
        }
    }

    /// The portion of `within` between `acquisition` and `retirement`
    ///
    /// When acquisition postdates retirement the active interval collapses to
    /// an empty range anchored at the retirement.
    pub fn constrained(acquisition: NaiveDate, retirement: NaiveDate, within: &TimeRange) -> Self {
        let active = if acquisition > retirement {
            Self::empty(retirement)
        } else {
            Self::new(acquisition, retirement).unwrap_or_else(|_| Self::empty(retirement))
        };
        active.intersect(within)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range; the anchor for empty ranges
    pub fn end(&self) -> NaiveDate {
        if self.is_empty() {
            self.start
        } else {
            self.until.pred_opt().unwrap_or(self.start)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.until <= self.start
    }

    /// Number of days covered, inclusive of both bounds
    pub fn days(&self) -> i64 {
        (self.until - self.start).num_days().max(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.until
    }

    /// The overlapping interval of two ranges
    ///
    /// Disjoint ranges produce an empty range anchored at the later of the two
    /// starting dates.
    pub fn intersect(&self, other: &TimeRange) -> TimeRange {
        let start = self.start.max(other.start);
        let until = self.until.min(other.until);
        if until <= start {
            Self::empty(start)
        } else {
            Self { start, until }
        }
    }

    /// The calendar year that contains the midpoint of this range
    pub fn calendar_year(&self) -> i32 {
        let half = chrono::Days::new((self.days() / 2) as u64);
        self.start
            .checked_add_days(half)
            .unwrap_or(self.start)
            .year()
    }

    /// Days of this range falling in `year`, divided by the days in that year
    pub fn fractional_year_overlap(&self, year: i32) -> Decimal {
        let Ok(calendar) = Self::year(year) else {
            return Decimal::ZERO;
        };
        let overlap = self.intersect(&calendar).days();
        Decimal::from(overlap) / Decimal::from(calendar.days())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(empty at {})", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end())
        }
    }
}

impl FromStr for TimeRange {
    type Err = CarbonateError;

    /// Accepts a bare year (`2010`) or an inclusive span (`2010-01-01..2010-06-30`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once("..") {
            let parse = |text: &str| {
                NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
                    CarbonateError::InvalidTimeRange(format!("'{}': {}", text.trim(), e))
                })
            };
            return Self::new(parse(start)?, parse(end)?);
        }
        let year = s
            .parse::<i32>()
            .map_err(|_| CarbonateError::InvalidTimeRange(format!("'{}' is not a year", s)))?;
        Self::year(year)
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimeRange", 3)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end())?;
        state.serialize_field("days", &self.days())?;
        state.end()
    }
}
