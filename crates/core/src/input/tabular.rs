use std::{io::Read, path::Path};

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};

use crate::error::InputError;

use super::{Cell, Row};

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Zips a header with one data row. Columns with a blank header are dropped.
fn build_row(headers: &[String], cells: impl IntoIterator<Item = Cell>) -> Row {
    let mut row = Row::new();
    for (header, cell) in headers.iter().zip(cells) {
        if !header.is_empty() {
            row.push(header.clone(), cell);
        }
    }
    row
}

/// CSV with a header line. Ragged lines are tolerated.
pub fn parse_csv_rows<R: Read>(reader: R) -> anyhow::Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("read csv header")?
        .iter()
        .map(clean_header)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read csv record {}", i + 1))?;
        let row = build_row(&headers, record.iter().map(Cell::text));
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Text(dt.to_string()),
        _ => Cell::Empty,
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => clean_header(s),
        other => clean_header(&other.to_string()),
    }
}

/// Rows of one worksheet (xlsx, xlsm, xls, ods); the first row is the header.
pub fn read_spreadsheet_rows(path: &Path, sheet: Option<&str>) -> anyhow::Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow::anyhow!("read {}: {}", path.display(), e))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(InputError::EmptyDataset)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| anyhow::anyhow!("read sheet {sheet_name:?} of {}: {}", path.display(), e))?;

    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(lines
        .map(|line| build_row(&headers, line.iter().map(data_to_cell)))
        .filter(|row| !row.is_blank())
        .collect())
}
