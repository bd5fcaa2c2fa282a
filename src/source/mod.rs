//! Loading the raw sheet. Fetching it from Google is somebody else's job; this
//! reads the JSON body of a Sheets `values.get` response from disk or stdin.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::error::Result;
use crate::table::{RawRow, RawTable};

/// Path value meaning "read from stdin".
pub const STDIN: &str = "-";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SheetDocument {
    ValueRange {
        #[serde(default)]
        range: Option<String>,
        #[serde(default)]
        values: Vec<Vec<Value>>,
    },
    Bare(Vec<Vec<Value>>),
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse a Sheets response body (or a bare array of rows) into a validated table.
pub fn parse_sheet_json(body: &str) -> Result<RawTable> {
    let values = match serde_json::from_str::<SheetDocument>(body)? {
        SheetDocument::ValueRange { range, values } => {
            if let Some(range) = range {
                log::debug!("Loaded sheet range {range}");
            }
            values
        }
        SheetDocument::Bare(values) => values,
    };
    let rows: Vec<RawRow> = values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect();
    RawTable::from_rows(rows)
}

/// Read and parse the sheet at `path`, or stdin when `path` is `-`.
pub async fn load_table(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let body = if path.as_os_str() == STDIN {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path).await?
    };
    let table = parse_sheet_json(&body)?;
    log::info!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_parse_values_response() {
        let body = r#"{
            "range": "Data!A1:J3",
            "majorDimension": "ROWS",
            "values": [
                ["Key", "Platform", "To Do"],
                ["T-1", "iOS", "2024-01-01"],
                ["T-2", "Web"]
            ]
        }"#;
        let table = parse_sheet_json(body).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].cell(2), "2024-01-01");
        assert_eq!(table.rows()[1].platform(), "Web");
    }

    #[test]
    fn test_missing_values_is_empty() {
        let table = parse_sheet_json(r#"{"range": "Data!A:J", "majorDimension": "ROWS"}"#).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_bare_array_and_non_string_cells() {
        let body = r#"[["Key", "Platform"], [42, null, "2024-01-01", true]]"#;
        let table = parse_sheet_json(body).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.cell(0), "42");
        assert_eq!(row.cell(1), "");
        assert_eq!(row.cell(2), "2024-01-01");
        assert_eq!(row.cell(3), "true");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_sheet_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_wide_row_rejected() {
        let body = r#"[["h"], ["a","b","c","d","e","f","g","h","i","j","k"]]"#;
        assert!(matches!(
            parse_sheet_json(body),
            Err(Error::Table { row: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_load_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"values": [["Key","Platform"],["T-1","Android","2024-05-01","2024-05-02"]]}}"#
        )
        .unwrap();
        let table = load_table(file.path()).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].platform(), "Android");
    }

    #[tokio::test]
    async fn test_load_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_table(dir.path().join("nope.json")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
