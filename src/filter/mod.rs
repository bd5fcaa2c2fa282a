use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::date_util::{parse_timestamp, YearMonth};
use crate::error::Error;
use crate::metrics::MetricRecord;
use crate::table::{RawRow, RawTable};

/// Milestone columns scanned when listing selectable months. The To Do column is not one of them.
const MONTH_OPTION_COLUMNS: std::ops::RangeInclusive<usize> = 3..=9;

const ALL: &str = "all";

/// Platform selection: everything, or one exact platform string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(String),
}

impl PlatformFilter {
    pub fn matches(&self, row: &RawRow) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(platform) => row.platform() == platform,
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(PlatformFilter::All)
        } else {
            Ok(PlatformFilter::Only(s.to_string()))
        }
    }
}

/// Month selection: everything, or records with at least one metric in that month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Only(YearMonth),
}

impl MonthFilter {
    pub fn matches(&self, record: &MetricRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(month) => record.touches_month(*month),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(MonthFilter::All)
        } else {
            YearMonth::parse(s).map(MonthFilter::Only)
        }
    }
}

/// The current dashboard selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub platform: PlatformFilter,
    pub month: MonthFilter,
}

/// Rows whose platform passes the filter. Applied before durations are computed.
pub fn filter_rows<'a>(table: &'a RawTable, platform: &PlatformFilter) -> Vec<&'a RawRow> {
    table.rows().iter().filter(|r| platform.matches(r)).collect()
}

/// Records that pass the month filter. Applied after durations are computed.
pub fn filter_records(records: Vec<MetricRecord>, month: MonthFilter) -> Vec<MetricRecord> {
    match month {
        MonthFilter::All => records,
        MonthFilter::Only(_) => records.into_iter().filter(|r| month.matches(r)).collect(),
    }
}

/// Distinct platforms in first-seen order.
pub fn platform_options(table: &RawTable) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for row in table.rows() {
        let platform = row.platform();
        if !seen.iter().any(|p| p == platform) {
            seen.push(platform.to_string());
        }
    }
    seen
}

/// A selectable month plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub month: YearMonth,
    pub label: String,
}

/// Distinct months found in the milestone columns, ascending.
pub fn month_options(table: &RawTable) -> Vec<MonthOption> {
    let months: BTreeSet<YearMonth> = table
        .rows()
        .iter()
        .flat_map(|row| MONTH_OPTION_COLUMNS.map(move |c| row.cell(c)))
        .filter_map(|cell| parse_timestamp(cell).ok().flatten())
        .map(|at| YearMonth::of(&at))
        .collect();
    months
        .into_iter()
        .map(|month| MonthOption {
            month,
            label: month.long_label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_durations;
    use crate::table::parse_row;

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn table() -> RawTable {
        RawTable::from_cells(vec![
            vec!["Key", "Platform", "To Do", "Dev", "PR", "DR", "RFT", "Test", "Sign-off", "Resolved"],
            vec!["T-1", "iOS", "2023-12-20", "2024-01-03", "2024-01-10"],
            vec!["T-2", "Web", "2024-01-01", "2024-02-03", "", "", "", "", "", "not yet"],
            vec!["T-3", "iOS", "", "2024-03-01", "2024-03-04"],
            vec!["T-4", "Android"],
        ])
        .unwrap()
    }

    #[test]
    fn test_platform_all() {
        let t = table();
        assert_eq!(filter_rows(&t, &PlatformFilter::All).len(), 4);
    }

    #[test]
    fn test_platform_exact_match() {
        let t = table();
        let rows = filter_rows(&t, &"iOS".parse().unwrap());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.platform() == "iOS"));
        assert!(filter_rows(&t, &"ios".parse().unwrap()).is_empty());
    }

    #[test]
    fn test_month_filter_matches_any_metric() {
        let t = table();
        let records: Vec<MetricRecord> = t
            .rows()
            .iter()
            .map(|r| compute_durations(&parse_row(r, 0)))
            .collect();

        let jan = filter_records(records.clone(), MonthFilter::Only(ym(2024, 1)));
        assert_eq!(jan.len(), 1);

        let feb = filter_records(records.clone(), MonthFilter::Only(ym(2024, 2)));
        assert_eq!(feb.len(), 1);

        let apr = filter_records(records.clone(), MonthFilter::Only(ym(2024, 4)));
        assert!(apr.is_empty());

        assert_eq!(filter_records(records, MonthFilter::All).len(), 4);
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("all".parse::<PlatformFilter>().unwrap(), PlatformFilter::All);
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "2024-02".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(ym(2024, 2))
        );
        assert!("Feb".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_platform_options_first_seen_order() {
        assert_eq!(platform_options(&table()), vec!["iOS", "Web", "Android"]);
    }

    #[test]
    fn test_month_options_skip_todo_column_and_garbage() {
        let options = month_options(&table());
        let months: Vec<YearMonth> = options.iter().map(|o| o.month).collect();
        // December only appears in the To Do column.
        assert_eq!(months, vec![ym(2024, 1), ym(2024, 2), ym(2024, 3)]);
        assert_eq!(options[0].label, "January 2024");
    }
}
