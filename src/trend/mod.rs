use serde::Serialize;

use crate::date_util::{months_between, YearMonth};
use crate::metrics::{MetricName, MetricRecord};
use crate::stats::mean_of;

/// Metrics plotted on the monthly trend chart. The two cycle-level totals are left out.
pub const TRENDED_METRICS: [MetricName; 7] = [
    MetricName::Backlog,
    MetricName::Development,
    MetricName::PullRequest,
    MetricName::DesignReview,
    MetricName::TesterAssignment,
    MetricName::Testing,
    MetricName::PoValidation,
];

/// Monthly means for one metric, aligned with [`TrendSeries::months`].
/// `None` marks a month with no data, which is not the same as a mean of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricTrend {
    pub metric: MetricName,
    pub label: &'static str,
    pub points: Vec<Option<i64>>,
}

/// A continuous month axis shared by every tracked metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub months: Vec<YearMonth>,
    pub labels: Vec<String>,
    pub series: Vec<MetricTrend>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn get(&self, metric: MetricName) -> Option<&MetricTrend> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

/// Earliest and latest month any of `metrics` lands in, across all records.
fn observed_span(records: &[MetricRecord], metrics: &[MetricName]) -> Option<(YearMonth, YearMonth)> {
    let mut months = records
        .iter()
        .flat_map(|r| metrics.iter().filter_map(move |&m| r.get(m)))
        .map(|d| d.month);
    let first = months.next()?;
    Some(months.fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m))))
}

/// Build per-month mean series for `metrics`, filling every month between the
/// first and last observation so that gaps stay visible.
pub fn compute_trend(records: &[MetricRecord], metrics: &[MetricName]) -> TrendSeries {
    let Some((first, last)) = observed_span(records, metrics) else {
        return TrendSeries {
            series: metrics
                .iter()
                .map(|&metric| MetricTrend {
                    metric,
                    label: metric.label(),
                    points: Vec::new(),
                })
                .collect(),
            ..TrendSeries::default()
        };
    };

    let months = months_between(first, last);
    let series = metrics
        .iter()
        .map(|&metric| {
            let points = months
                .iter()
                .map(|&month| {
                    let values: Vec<i64> = records
                        .iter()
                        .filter_map(|r| r.get(metric))
                        .filter(|d| d.month == month)
                        .map(|d| d.value)
                        .collect();
                    mean_of(&values)
                })
                .collect();
            MetricTrend {
                metric,
                label: metric.label(),
                points,
            }
        })
        .collect();

    log::debug!(
        "Trend spans {} months ({first} to {last}) over {} records",
        months.len(),
        records.len()
    );

    TrendSeries {
        labels: months.iter().map(YearMonth::short_label).collect(),
        months,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_durations;
    use crate::table::{Milestone, Milestones};
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn backlog(start: NaiveDateTime, end: NaiveDateTime) -> MetricRecord {
        compute_durations(
            &Milestones::default()
                .with(Milestone::ToDo, start)
                .with(Milestone::DevStart, end),
        )
    }

    #[test]
    fn test_empty_records_give_empty_axis() {
        let trend = compute_trend(&[], &TRENDED_METRICS);
        assert!(trend.is_empty());
        assert_eq!(trend.series.len(), 7);
        assert!(trend.series.iter().all(|s| s.points.is_empty()));
    }

    #[test]
    fn test_missing_month_is_a_gap() {
        let records = vec![
            backlog(day(2024, 1, 1), day(2024, 1, 5)),
            backlog(day(2024, 3, 1), day(2024, 3, 3)),
        ];
        let trend = compute_trend(&records, &TRENDED_METRICS);
        assert_eq!(trend.months, vec![ym(2024, 1), ym(2024, 2), ym(2024, 3)]);
        assert_eq!(trend.labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);

        let series = trend.get(MetricName::Backlog).unwrap();
        assert_eq!(series.points, vec![Some(4), None, Some(2)]);

        let untouched = trend.get(MetricName::Testing).unwrap();
        assert_eq!(untouched.points, vec![None, None, None]);
    }

    #[test]
    fn test_zero_mean_is_not_a_gap() {
        let records = vec![backlog(day(2024, 5, 1), day(2024, 5, 1))];
        let trend = compute_trend(&records, &TRENDED_METRICS);
        assert_eq!(trend.get(MetricName::Backlog).unwrap().points, vec![Some(0)]);
    }

    #[test]
    fn test_monthly_mean_rounds() {
        let records = vec![
            backlog(day(2024, 1, 1), day(2024, 1, 2)),
            backlog(day(2024, 1, 1), day(2024, 1, 3)),
        ];
        let trend = compute_trend(&records, &TRENDED_METRICS);
        assert_eq!(trend.get(MetricName::Backlog).unwrap().points, vec![Some(2)]);
    }

    #[test]
    fn test_axis_spans_year_boundary() {
        let records = vec![
            backlog(day(2023, 11, 1), day(2023, 11, 20)),
            backlog(day(2024, 1, 1), day(2024, 2, 1)),
        ];
        let trend = compute_trend(&records, &TRENDED_METRICS);
        assert_eq!(
            trend.months,
            vec![ym(2023, 11), ym(2023, 12), ym(2024, 1), ym(2024, 2)]
        );
        assert_eq!(
            trend.get(MetricName::Backlog).unwrap().points,
            vec![Some(19), None, None, Some(31)]
        );
    }

    #[test]
    fn test_untracked_metrics_do_not_widen_axis() {
        // Full cycle ends in June but is not trended; only the March backlog counts.
        let record = compute_durations(
            &Milestones::default()
                .with(Milestone::ToDo, day(2024, 3, 1))
                .with(Milestone::DevStart, day(2024, 3, 2))
                .with(Milestone::Resolved, day(2024, 6, 30)),
        );
        let trend = compute_trend(&[record], &TRENDED_METRICS);
        assert_eq!(trend.months, vec![ym(2024, 3)]);
        assert!(trend.get(MetricName::FullCycle).is_none());
    }

    #[test]
    fn test_series_follow_requested_order() {
        let records = vec![backlog(day(2024, 1, 1), day(2024, 1, 5))];
        let wanted = [MetricName::Testing, MetricName::Backlog];
        let trend = compute_trend(&records, &wanted);
        let order: Vec<MetricName> = trend.series.iter().map(|s| s.metric).collect();
        assert_eq!(order, wanted.to_vec());
    }
}
