use anyhow::Context;
use serde_json::Value;

use super::{Cell, Row};

fn value_to_cell(v: &Value) -> Cell {
    match v {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        Value::String(s) => Cell::text(s),
        other => Cell::Text(other.to_string()),
    }
}

/// A JSON array of flat objects, one object per VM.
pub fn parse_json_rows(bytes: &[u8]) -> anyhow::Result<Vec<Row>> {
    let v: Value = serde_json::from_slice(bytes).context("parse json")?;
    let items = v
        .as_array()
        .context("expected a JSON array of row objects")?;

    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .with_context(|| format!("row {}: expected an object", i + 1))?;
        let row = obj
            .iter()
            .fold(Row::new(), |row, (k, v)| row.with(k.as_str(), value_to_cell(v)));
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}
