pub mod types;

pub use types::*;

use chrono::NaiveDateTime;

use crate::date_util::YearMonth;
use crate::stats::round_half_up;
use crate::table::Milestones;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days between two instants, rounded to nearest (halves away from zero).
pub fn duration_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    round_half_up((end - start).num_milliseconds() as f64 / MILLIS_PER_DAY)
}

/// Measure one metric, or `None` when its start or every end candidate is missing.
pub fn compute_metric(milestones: &Milestones, metric: MetricName) -> Option<DurationMetric> {
    let span = metric.span();
    let start = milestones.get(span.start)?;
    let end = span
        .end_candidates
        .iter()
        .find_map(|&candidate| milestones.get(candidate))?;
    Some(DurationMetric {
        value: duration_days(start, end),
        month: YearMonth::of(&end),
    })
}

/// Derive all nine metrics for one ticket.
pub fn compute_durations(milestones: &Milestones) -> MetricRecord {
    let mut record = MetricRecord::default();
    for metric in MetricName::ALL {
        record.set(metric, compute_metric(milestones, metric));
    }
    record
}

/// Present values of `metric` across `records`, in record order.
pub fn values_for(records: &[MetricRecord], metric: MetricName) -> Vec<i64> {
    records
        .iter()
        .filter_map(|r| r.get(metric))
        .map(|d| d.value)
        .collect()
}
