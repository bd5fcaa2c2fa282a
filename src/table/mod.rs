//! The input boundary: a sheet of string cells and the per-row milestone parser.
//!
//! Column layout (0-based): 1 = platform, 2..=9 = the eight milestones in
//! lifecycle order. Row 0 is a header and is never parsed.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::date_util::parse_timestamp;
use crate::error::{Error, Result};

/// Number of columns in the fixed layout (sheet range A:J).
pub const COLUMN_COUNT: usize = 10;
pub const PLATFORM_COLUMN: usize = 1;
pub const FIRST_MILESTONE_COLUMN: usize = 2;

/// One row of raw cells, exactly as the sheet returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell text, or `""` for cells the sheet trimmed off the end of the row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn platform(&self) -> &str {
        self.cell(PLATFORM_COLUMN)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A validated table: header plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    header: Option<RawRow>,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Split off the header and validate the data rows against the column layout.
    ///
    /// Rows shorter than the layout are accepted because the Sheets API drops
    /// trailing empty cells. Rows wider than the layout are rejected.
    pub fn from_rows(mut rows: Vec<RawRow>) -> Result<Self> {
        if rows.is_empty() {
            return Ok(Self::default());
        }
        let header = rows.remove(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() > COLUMN_COUNT {
                return Err(Error::Table {
                    row: sheet_row_number(i),
                    message: format!(
                        "expected at most {COLUMN_COUNT} columns, found {}",
                        row.len()
                    ),
                });
            }
        }
        Ok(Self {
            header: Some(header),
            rows,
        })
    }

    /// Convenience for building a table from string literals.
    pub fn from_cells<R, S>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_rows(rows.into_iter().map(|r| r.into_iter().collect()).collect())
    }

    pub fn header(&self) -> Option<&RawRow> {
        self.header.as_ref()
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 1-based sheet row number of the `index`-th data row (the header is row 1).
pub fn sheet_row_number(index: usize) -> usize {
    index + 2
}

/// The eight lifecycle milestones, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Milestone {
    ToDo,
    DevStart,
    PrStart,
    DesignReview,
    ReadyForTest,
    TestStart,
    SignOff,
    Resolved,
}

impl Milestone {
    pub const ALL: [Milestone; 8] = [
        Milestone::ToDo,
        Milestone::DevStart,
        Milestone::PrStart,
        Milestone::DesignReview,
        Milestone::ReadyForTest,
        Milestone::TestStart,
        Milestone::SignOff,
        Milestone::Resolved,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn column(self) -> usize {
        FIRST_MILESTONE_COLUMN + self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Milestone::ToDo => "To Do",
            Milestone::DevStart => "Dev Start",
            Milestone::PrStart => "PR Start",
            Milestone::DesignReview => "Design Review",
            Milestone::ReadyForTest => "Ready For Test",
            Milestone::TestStart => "Test Start",
            Milestone::SignOff => "Sign Off",
            Milestone::Resolved => "Resolved",
        }
    }
}

/// Fixed-shape record of the eight optional milestone instants for one ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Milestones([Option<NaiveDateTime>; 8]);

impl Milestones {
    pub fn get(&self, milestone: Milestone) -> Option<NaiveDateTime> {
        self.0[milestone.index()]
    }

    pub fn set(&mut self, milestone: Milestone, at: Option<NaiveDateTime>) {
        self.0[milestone.index()] = at;
    }

    pub fn with(mut self, milestone: Milestone, at: NaiveDateTime) -> Self {
        self.set(milestone, Some(at));
        self
    }
}

/// Parse the milestone columns of one data row.
///
/// `row_number` is only used for log context. Unparseable cells are logged
/// and treated as absent; they never abort the row.
pub fn parse_row(row: &RawRow, row_number: usize) -> Milestones {
    let mut milestones = Milestones::default();
    for milestone in Milestone::ALL {
        let cell = row.cell(milestone.column());
        let parsed = match parse_timestamp(cell) {
            Ok(at) => at,
            Err(e) => {
                log::warn!("Row {row_number}: ignoring {} cell: {e}", milestone.name());
                None
            }
        };
        milestones.set(milestone, parsed);
    }
    milestones
}
