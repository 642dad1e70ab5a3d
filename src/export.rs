//! CSV export of a derived view
//!
//! The header is the field names of the first item; every row lists its values
//! in that same order. Values are written raw unless the caller asks for
//! escaping.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,
    #[error("failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("row {0} is not a record")]
    NotARecord(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escape {
    /// Values are joined as-is
    #[default]
    None,
    /// Quote values holding the delimiter, a quote or a line break
    Minimal,
    /// Quote every value
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: char,
    pub escape: Escape,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            escape: Escape::None,
        }
    }
}

/// Export with a comma delimiter and no escaping
pub fn to_csv<T: Serialize>(items: &[T]) -> Result<String, ExportError> {
    to_csv_with(items, CsvOptions::default())
}

pub fn to_csv_with<T: Serialize>(items: &[T], options: CsvOptions) -> Result<String, ExportError> {
    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| match serde_json::to_value(item)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::NotARecord(i)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = rows.first().ok_or(ExportError::Empty)?;
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut table = CsvTable::new(headers.clone());
    for row in &rows {
        table.push(headers.iter().map(|key| cell(row.get(key))).collect());
    }
    Ok(table.render(options))
}

/// Plain text for one cell; missing and null values are empty
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A table with fixed column titles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self, options: CsvOptions) -> String {
        let line = |values: &[String]| {
            values
                .iter()
                .map(|v| escape(v, options))
                .collect::<Vec<_>>()
                .join(&options.delimiter.to_string())
        };
        std::iter::once(line(&self.headers))
            .chain(self.rows.iter().map(|row| line(row)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape(value: &str, options: CsvOptions) -> String {
    let needs_quotes = match options.escape {
        Escape::None => return value.to_string(),
        Escape::Always => true,
        Escape::Minimal => {
            value.contains(options.delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r')
        }
    };
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
