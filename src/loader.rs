//! Load cash-flow series from CSV
//!
//! One series per row, no header, rows may have different lengths. A run of
//! blank cells at the end of a row is ignored; a blank cell between two
//! flows is an error, since dropping it would shift every later period.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cash flows of one CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowRow {
    /// 1-based line in the source file
    pub line: u64,
    pub flows: Vec<f64>,
}

impl AsRef<[f64]> for CashFlowRow {
    fn as_ref(&self) -> &[f64] {
        &self.flows
    }
}

/// Parse every row of `reader` into cash flows
pub fn read_cash_flow_rows<R: Read>(reader: R) -> Result<Vec<CashFlowRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", index + 1))?;
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);

        let cells: Vec<&str> = record.iter().collect();
        let filled = cells
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |last| last + 1);

        let mut flows = Vec::with_capacity(filled);
        for (column, cell) in cells[..filled].iter().enumerate() {
            if cell.is_empty() {
                bail!("Line {}, column {}: missing cash flow", line, column + 1);
            }
            let value = cell.parse::<f64>().with_context(|| {
                format!("Line {}, column {}: '{}' is not a number", line, column + 1, cell)
            })?;
            flows.push(value);
        }

        if !flows.is_empty() {
            rows.push(CashFlowRow { line, flows });
        }
    }

    Ok(rows)
}

/// Load cash-flow rows from a CSV file
pub fn load_cash_flow_file(path: &Path) -> Result<Vec<CashFlowRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_cash_flow_rows(file).with_context(|| format!("Failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flows(rows: &[CashFlowRow]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| row.flows.clone()).collect()
    }

    #[test]
    fn test_variable_width_rows() {
        let data = "# project A, project B\n-100, 110\n-100,50,50,50,\n\n-1000, 0, 0, 1331\n";
        let rows = read_cash_flow_rows(data.as_bytes()).unwrap();
        assert_eq!(
            flows(&rows),
            vec![
                vec![-100.0, 110.0],
                vec![-100.0, 50.0, 50.0, 50.0],
                vec![-1000.0, 0.0, 0.0, 1331.0],
            ]
        );
    }

    #[test]
    fn test_rows_keep_source_line_numbers() {
        let data = "# header comment\n-100,110\n\n-100,121,,\n";
        let rows = read_cash_flow_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.iter().map(|row| row.line).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(rows[1].flows, vec![-100.0, 121.0]);
    }

    #[test]
    fn test_interior_blank_is_rejected() {
        // "-100,,121" is two periods; dropping the blank would make it one
        let err = read_cash_flow_rows("-100,,121\n".as_bytes()).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Line 1, column 2"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_bad_cell_reports_position() {
        let err = read_cash_flow_rows("-100,110\n-100,abc\n".as_bytes()).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Line 2, column 2"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_cash_flow_file(Path::new("/nonexistent/flows.csv")).is_err());
    }
}
