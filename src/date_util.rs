use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

static RE_MONTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A calendar month, ordered chronologically.
///
/// Trend axes step through these one month at a time instead of doing day
/// arithmetic on dates, so stepping never drifts across month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month, returning `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a `YYYY-MM` key.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = RE_MONTH
            .captures(s)
            .ok_or_else(|| Error::MonthParse(format!("expected YYYY-MM, got {s:?}")))?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| Error::MonthParse(format!("invalid year: {s}")))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| Error::MonthParse(format!("invalid month: {s}")))?;
        Self::new(year, month).ok_or_else(|| Error::MonthParse(format!("month out of range: {s}")))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
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

    /// Canonical `YYYY-MM` key.
    pub fn to_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Axis label, e.g. `Jan 2024`.
    pub fn short_label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_key())
    }

    /// Dropdown label, e.g. `January 2024`.
    pub fn long_label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_key())
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_key())
    }
}

/// Every month from `start` to `end` inclusive. Empty when `start > end`.
pub fn months_between(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        months.push(cursor);
        cursor = cursor.succ();
    }
    months
}

/// Parse a milestone cell.
///
/// Blank cells are `Ok(None)`. Text that matches none of the accepted formats
/// is an error; callers decide whether that is fatal.
pub fn parse_timestamp(cell: &str) -> Result<Option<NaiveDateTime>> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.naive_utc()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Some(dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Some(d.and_time(NaiveTime::MIN)));
        }
    }

    Err(Error::TimestampParse(s.to_string()))
}
