use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Which statistic the summary chart shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    #[default]
    Mean,
    Median,
}

impl StatKind {
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Mean => "Average (days)",
            StatKind::Median => "Median (days)",
        }
    }
}

impl FromStr for StatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "average" | "avg" => Ok(StatKind::Mean),
            "median" => Ok(StatKind::Median),
            other => Err(Error::InvalidArgument(format!(
                "unknown statistic {other:?} (expected mean or median)"
            ))),
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatKind::Mean => f.write_str("mean"),
            StatKind::Median => f.write_str("median"),
        }
    }
}

/// Round to the nearest integer, halves away from zero.
pub fn round_half_up(value: f64) -> i64 {
    value.round() as i64
}

/// Arithmetic mean rounded to the nearest day, or `None` when there is nothing to average.
pub fn mean_of(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some(round_half_up(sum as f64 / values.len() as f64))
}

/// Median rounded to the nearest day, or `None` for an empty slice.
pub fn median_of(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    #[allow(clippy::manual_is_multiple_of)]
    let median = if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        round_half_up((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    };
    Some(median)
}

/// Reduce `values` to one statistic. An empty slice yields 0.
pub fn calculate_stat(values: &[i64], kind: StatKind) -> i64 {
    let stat = match kind {
        StatKind::Mean => mean_of(values),
        StatKind::Median => median_of(values),
    };
    stat.unwrap_or(0)
}
