use serde::Serialize;

use crate::metrics::{values_for, MetricName, MetricRecord};
use crate::stats::round_half_up;

/// Upper bound (inclusive) of the fast bucket, in days.
pub const FAST_MAX_DAYS: f64 = 1.0;
/// Upper bound (inclusive) of the medium bucket, in days.
pub const MEDIUM_MAX_DAYS: f64 = 3.0;

pub const BUCKET_LABELS: [&str; 3] = ["24h or less", "24-72h", "More than 72h"];

/// How many values fall in each speed bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DistributionCounts {
    pub fast: u64,
    pub medium: u64,
    pub slow: u64,
}

/// Whole-number share of each bucket, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Percentages {
    pub fast: i64,
    pub medium: i64,
    pub slow: i64,
}

impl DistributionCounts {
    /// Bucket `values`: fast `<= 1`, medium `(1, 3]`, slow `> 3`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut counts = Self::default();
        for v in values {
            if v <= FAST_MAX_DAYS {
                counts.fast += 1;
            } else if v <= MEDIUM_MAX_DAYS {
                counts.medium += 1;
            } else {
                counts.slow += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.fast + self.medium + self.slow
    }

    /// Percentages rounded to nearest; all zero when there are no values.
    pub fn percentages(&self) -> Percentages {
        let total = self.total();
        if total == 0 {
            return Percentages::default();
        }
        let pct = |count: u64| round_half_up(count as f64 / total as f64 * 100.0);
        Percentages {
            fast: pct(self.fast),
            medium: pct(self.medium),
            slow: pct(self.slow),
        }
    }

    /// Counts paired with their display labels, fast first.
    pub fn labelled(&self) -> [(&'static str, u64); 3] {
        [
            (BUCKET_LABELS[0], self.fast),
            (BUCKET_LABELS[1], self.medium),
            (BUCKET_LABELS[2], self.slow),
        ]
    }
}

/// Distribution of one metric across a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDistribution {
    pub metric: MetricName,
    pub counts: DistributionCounts,
    pub percentages: Percentages,
}

pub fn distribution_for(records: &[MetricRecord], metric: MetricName) -> MetricDistribution {
    let counts =
        DistributionCounts::from_values(values_for(records, metric).into_iter().map(|v| v as f64));
    MetricDistribution {
        metric,
        counts,
        percentages: counts.percentages(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let counts = DistributionCounts::from_values([0.5, 1.0, 2.0, 4.0]);
        assert_eq!(
            counts,
            DistributionCounts {
                fast: 2,
                medium: 1,
                slow: 1
            }
        );
        assert_eq!(
            counts.percentages(),
            Percentages {
                fast: 50,
                medium: 25,
                slow: 25
            }
        );
    }

    #[test]
    fn test_three_is_medium() {
        let counts = DistributionCounts::from_values([3.0, 3.5, 0.0, -1.0]);
        assert_eq!(counts.fast, 2);
        assert_eq!(counts.medium, 1);
        assert_eq!(counts.slow, 1);
    }

    #[test]
    fn test_empty_percentages_are_zero() {
        let counts = DistributionCounts::from_values(std::iter::empty());
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.percentages(), Percentages::default());
    }

    #[test]
    fn test_percentages_round() {
        let counts = DistributionCounts {
            fast: 1,
            medium: 1,
            slow: 1,
        };
        assert_eq!(
            counts.percentages(),
            Percentages {
                fast: 33,
                medium: 33,
                slow: 33
            }
        );

        let counts = DistributionCounts {
            fast: 2,
            medium: 1,
            slow: 0,
        };
        assert_eq!(counts.percentages().fast, 67);
        assert_eq!(counts.percentages().medium, 33);
    }

    #[test]
    fn test_labelled() {
        let counts = DistributionCounts {
            fast: 4,
            medium: 0,
            slow: 2,
        };
        assert_eq!(
            counts.labelled(),
            [("24h or less", 4), ("24-72h", 0), ("More than 72h", 2)]
        );
    }
}
