mod fields;
mod json;
mod tabular;

use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InputError;

pub use fields::{missing_columns, to_record, Field, REQUIRED_COLUMNS};
pub use json::parse_json_rows;
pub use tabular::{parse_csv_rows, read_spreadsheet_rows};

/// One spreadsheet cell, loosely typed the way spreadsheet exports are.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static RE_LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\+?([0-9]+)").expect("valid regex"));

impl Cell {
    pub fn text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Whether the cell carries a usable value. Zero and blank strings do not.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.trim().is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Integer part of a numeric cell, or the leading digits of a text cell
    /// (`"8 GB"` is 8). Negative and non-numeric values yield `None`.
    pub fn as_count(&self) -> Option<u32> {
        match self {
            Cell::Number(n) if n.is_finite() && *n >= 0.0 => {
                Some(n.trunc().min(f64::from(u32::MAX)) as u32)
            }
            Cell::Text(s) => RE_LEADING_INT
                .captures(s)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok()),
            _ => None,
        }
    }
}

/// A source row: column name to cell, in source column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, cell: Cell) {
        self.cells.push((column.into(), cell));
    }

    pub fn with(mut self, column: impl Into<String>, cell: Cell) -> Self {
        self.push(column, cell);
        self
    }

    /// Exact, case-sensitive column lookup.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| !cell.is_present())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Csv,
    Spreadsheet,
    Json,
}

pub fn detect_format(path: &Path) -> Result<InventoryFormat, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(InventoryFormat::Csv),
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(InventoryFormat::Spreadsheet),
        "json" => Ok(InventoryFormat::Json),
        _ => Err(InputError::UnsupportedFormat(ext)),
    }
}

/// Reads every non-blank data row of an inventory file. `sheet` selects a
/// worksheet for spreadsheet input; the first sheet is used otherwise.
pub fn load_rows(path: &Path, sheet: Option<&str>) -> anyhow::Result<Vec<Row>> {
    let rows = match detect_format(path)? {
        InventoryFormat::Csv => {
            let f = std::fs::File::open(path).with_context(|| format!("read {}", path.display()))?;
            parse_csv_rows(f).with_context(|| format!("parse {}", path.display()))?
        }
        InventoryFormat::Spreadsheet => read_spreadsheet_rows(path, sheet)?,
        InventoryFormat::Json => {
            let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
            parse_json_rows(&bytes).with_context(|| format!("parse {}", path.display()))?
        }
    };

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded inventory rows");
    Ok(rows)
}

/// Rejects an empty dataset, or one whose first row lacks a required column.
pub fn validate_columns(rows: &[Row]) -> Result<(), InputError> {
    let first = rows.first().ok_or(InputError::EmptyDataset)?;
    let missing = missing_columns(first.columns());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(InputError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_parsing_takes_leading_digits() {
        assert_eq!(Cell::Text("8 GB".to_string()).as_count(), Some(8));
        assert_eq!(Cell::Number(4.9).as_count(), Some(4));
        assert_eq!(Cell::Text("lots".to_string()).as_count(), None);
        assert_eq!(Cell::Number(-1.0).as_count(), None);
        assert_eq!(Cell::Empty.as_count(), None);
    }

    #[test]
    fn zero_and_blank_cells_are_not_present() {
        assert!(!Cell::Number(0.0).is_present());
        assert!(!Cell::text("  ").is_present());
        assert!(Cell::Text("0".to_string()).is_present());
    }

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(detect_format(Path::new("a.XLSX")), Ok(InventoryFormat::Spreadsheet));
        assert_eq!(detect_format(Path::new("a.csv")), Ok(InventoryFormat::Csv));
        assert_eq!(
            detect_format(Path::new("a.tf")),
            Err(InputError::UnsupportedFormat("tf".to_string()))
        );
    }

    #[test]
    fn validation_requires_rows() {
        assert_eq!(validate_columns(&[]), Err(InputError::EmptyDataset));
    }
}
