use std::fmt;
use std::path::Path;
use std::str::FromStr;

use calamine::{DataType, Reader, open_workbook_auto};

use crate::sats::error::{Result, ToolError};
use crate::sats::model::{Cell, ScalarValue, Table};

/// Text values read back as missing, following the usual spreadsheet NA
/// conventions.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Which worksheet of a workbook to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// Zero-based sheet position.
    Index(usize),
    /// Sheet name.
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// Bare integers select by position, anything else by name.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value.trim().parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(value.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "#{index}"),
            SheetSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Loads one worksheet as a table. The first row supplies the headers; blank
/// headers are named `Unnamed: <position>`.
pub fn read_table(path: &Path, sheet: &SheetSelector) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let range_result = match sheet {
        SheetSelector::Index(index) => workbook.worksheet_range_at(*index),
        SheetSelector::Name(name) => workbook.worksheet_range(name),
    };
    let range = range_result
        .ok_or_else(|| {
            ToolError::InvalidWorkbook(format!(
                "missing sheet {sheet} in {}",
                path.display()
            ))
        })?
        .map_err(ToolError::from)?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(position, cell)| match cell_to_value(cell) {
                Some(value) => value.to_text(),
                None => format!("Unnamed: {position}"),
            })
            .collect(),
        None => {
            return Err(ToolError::InvalidWorkbook(format!(
                "sheet {sheet} in {} has no header row",
                path.display()
            )));
        }
    };

    let rows = rows
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_to_value(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => {
            if NA_TOKENS.contains(&value.trim()) {
                None
            } else {
                Some(ScalarValue::String(value.clone()))
            }
        }
        DataType::Float(value) => Some(ScalarValue::Number(*value)),
        DataType::Int(value) => Some(ScalarValue::Number(*value as f64)),
        DataType::Bool(value) => Some(ScalarValue::Boolean(*value)),
        DataType::DateTime(value) => Some(ScalarValue::DateTime(*value)),
        DataType::Error(_) | DataType::Empty => None,
        other => Some(ScalarValue::String(other.to_string())),
    }
}
