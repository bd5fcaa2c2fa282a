use serde::Serialize;

use crate::distribution::{distribution_for, MetricDistribution};
use crate::filter::{filter_records, filter_rows, month_options, platform_options, Filters, MonthOption};
use crate::metrics::{compute_durations, values_for, MetricName, MetricRecord};
use crate::stats::{calculate_stat, StatKind};
use crate::table::{parse_row, sheet_row_number, RawTable};
use crate::trend::{compute_trend, TrendSeries, TRENDED_METRICS};

/// Metrics shown as speed distributions.
pub const DISTRIBUTION_METRICS: [MetricName; 2] =
    [MetricName::PullRequest, MetricName::TesterAssignment];

/// One bar of the summary chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricStat {
    pub metric: MetricName,
    pub label: &'static str,
    pub value: i64,
    /// Number of tickets that contributed a value.
    pub samples: usize,
}

/// Headline dev-cycle figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub average: i64,
    pub median: i64,
}

/// Everything the presentation layer needs for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub stat: StatKind,
    pub ticket_count: usize,
    pub summary: Vec<MetricStat>,
    pub dev_cycle: CycleSummary,
    pub trend: TrendSeries,
    pub distributions: Vec<MetricDistribution>,
    pub records: Vec<MetricRecord>,
}

/// Available filter values for the loaded table.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub months: Vec<MonthOption>,
}

/// Holds the loaded table and recomputes derived data on demand.
///
/// Nothing is cached between calls: every selection re-runs the whole pipeline
/// over the current table.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: RawTable,
}

impl Dashboard {
    pub fn new(table: RawTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            platforms: platform_options(&self.table),
            months: month_options(&self.table),
        }
    }

    /// Platform-filter the rows, derive durations, then month-filter the records.
    pub fn records(&self, filters: &Filters) -> Vec<MetricRecord> {
        let records = self
            .table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| filters.platform.matches(row))
            .map(|(i, row)| compute_durations(&parse_row(row, sheet_row_number(i))))
            .collect();
        filter_records(records, filters.month)
    }

    pub fn report(&self, filters: &Filters, stat: StatKind) -> DashboardReport {
        let records = self.records(filters);
        log::info!(
            "Computing report over {} of {} tickets ({stat})",
            records.len(),
            self.table.len()
        );
        build_report(records, stat)
    }
}

/// Aggregate an already filtered record set.
pub fn build_report(records: Vec<MetricRecord>, stat: StatKind) -> DashboardReport {
    let summary = MetricName::ALL
        .into_iter()
        .map(|metric| {
            let values = values_for(&records, metric);
            MetricStat {
                metric,
                label: metric.label(),
                value: calculate_stat(&values, stat),
                samples: values.len(),
            }
        })
        .collect();

    let dev_cycle_values = values_for(&records, MetricName::DevCycle);
    let dev_cycle = CycleSummary {
        average: calculate_stat(&dev_cycle_values, StatKind::Mean),
        median: calculate_stat(&dev_cycle_values, StatKind::Median),
    };

    let trend = compute_trend(&records, &TRENDED_METRICS);
    let distributions = DISTRIBUTION_METRICS
        .into_iter()
        .map(|m| distribution_for(&records, m))
        .collect();

    DashboardReport {
        stat,
        ticket_count: records.len(),
        summary,
        dev_cycle,
        trend,
        distributions,
        records,
    }
}

/// Row count that survives the platform filter alone.
pub fn platform_row_count(table: &RawTable, filters: &Filters) -> usize {
    filter_rows(table, &filters.platform).len()
}
