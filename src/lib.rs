pub mod config;
pub mod date_util;
pub mod distribution;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod source;
pub mod stats;
pub mod table;
pub mod trend;

pub use config::Config;
pub use date_util::YearMonth;
pub use distribution::{DistributionCounts, MetricDistribution, Percentages};
pub use error::{Error, Result};
pub use filter::{Filters, MonthFilter, PlatformFilter};
pub use metrics::{compute_durations, DurationMetric, MetricName, MetricRecord};
pub use report::{Dashboard, DashboardReport, FilterOptions};
pub use stats::{calculate_stat, StatKind};
pub use table::{parse_row, Milestone, Milestones, RawRow, RawTable};
pub use trend::{compute_trend, MetricTrend, TrendSeries, TRENDED_METRICS};

/// Load the table at `config.data_path` and wrap it in a [`Dashboard`].
pub async fn open_dashboard(config: &Config) -> Result<Dashboard> {
    let table = source::load_table(&config.data_path).await?;
    Ok(Dashboard::new(table))
}
