use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::date_util::YearMonth;
use crate::error::Error;
use crate::table::Milestone;

/// The nine per-ticket duration metrics, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    Backlog,
    Development,
    PullRequest,
    DesignReview,
    TesterAssignment,
    Testing,
    PoValidation,
    FullCycle,
    DevCycle,
}

impl MetricName {
    pub const ALL: [MetricName; 9] = [
        MetricName::Backlog,
        MetricName::Development,
        MetricName::PullRequest,
        MetricName::DesignReview,
        MetricName::TesterAssignment,
        MetricName::Testing,
        MetricName::PoValidation,
        MetricName::FullCycle,
        MetricName::DevCycle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricName::Backlog => "Backlog Time",
            MetricName::Development => "Development Time",
            MetricName::PullRequest => "Pull Request Time",
            MetricName::DesignReview => "Design Review Time",
            MetricName::TesterAssignment => "Tester Assignment Time",
            MetricName::Testing => "Testing Time",
            MetricName::PoValidation => "PO Validation Time",
            MetricName::FullCycle => "Full Cycle Time",
            MetricName::DevCycle => "Dev Cycle Time",
        }
    }

    /// Short machine name, as accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            MetricName::Backlog => "backlog",
            MetricName::Development => "development",
            MetricName::PullRequest => "pull_request",
            MetricName::DesignReview => "design_review",
            MetricName::TesterAssignment => "tester_assignment",
            MetricName::Testing => "testing",
            MetricName::PoValidation => "po_validation",
            MetricName::FullCycle => "full_cycle",
            MetricName::DevCycle => "dev_cycle",
        }
    }

    /// The milestone pair this metric measures.
    pub fn span(self) -> Span {
        use Milestone::*;
        match self {
            MetricName::Backlog => Span::new(ToDo, &[DevStart]),
            MetricName::Development => Span::new(DevStart, &[PrStart]),
            MetricName::PullRequest => Span::new(PrStart, &[DesignReview, ReadyForTest]),
            MetricName::DesignReview => Span::new(DesignReview, &[ReadyForTest]),
            MetricName::TesterAssignment => Span::new(ReadyForTest, &[TestStart]),
            MetricName::Testing => Span::new(TestStart, &[SignOff]),
            MetricName::PoValidation => Span::new(SignOff, &[Resolved]),
            MetricName::FullCycle => Span::new(ToDo, &[Resolved]),
            MetricName::DevCycle => Span::new(DevStart, &[Resolved]),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        MetricName::ALL
            .into_iter()
            .find(|m| m.key() == wanted || m.label().to_lowercase().replace(' ', "_") == wanted)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown metric: {s}")))
    }
}

/// Start milestone plus the ordered end candidates; the first present end wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Milestone,
    pub end_candidates: &'static [Milestone],
}

impl Span {
    const fn new(start: Milestone, end_candidates: &'static [Milestone]) -> Self {
        Self {
            start,
            end_candidates,
        }
    }
}

/// One measured duration, anchored to the month of its end milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationMetric {
    /// Whole days, rounded to nearest.
    pub value: i64,
    pub month: YearMonth,
}

/// All nine metrics for one ticket. Absent metrics are `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricRecord([Option<DurationMetric>; 9]);

impl MetricRecord {
    pub fn get(&self, metric: MetricName) -> Option<DurationMetric> {
        self.0[metric.index()]
    }

    pub(crate) fn set(&mut self, metric: MetricName, value: Option<DurationMetric>) {
        self.0[metric.index()] = value;
    }

    /// Present metrics, in display order.
    pub fn present(&self) -> impl Iterator<Item = (MetricName, DurationMetric)> + '_ {
        MetricName::ALL
            .into_iter()
            .filter_map(|m| self.get(m).map(|d| (m, d)))
    }

    /// Whether any metric of this ticket lands in `month`.
    pub fn touches_month(&self, month: YearMonth) -> bool {
        self.present().any(|(_, d)| d.month == month)
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetricName::ALL.len()))?;
        for metric in MetricName::ALL {
            map.serialize_entry(metric.key(), &self.get(metric))?;
        }
        map.end()
    }
}
