use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;

/// Canonical, case-insensitive column name.
///
/// Raw spreadsheet headers are trimmed and lowercased exactly once, when the
/// key is built. Every lookup in the engine goes through this type so that
/// `" Q1_Lr1 "` and `q1_lr1` address the same column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Canonicalises a raw header into a key.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A non-missing cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Plain text.
    String(String),
    /// Any numeric cell; integers are widened to `f64`.
    Number(f64),
    /// Boolean cell.
    Boolean(bool),
    /// Spreadsheet date serial number.
    DateTime(f64),
}

impl ScalarValue {
    /// Renders the value as text. Whole numbers drop their fractional part so
    /// that a numeric alias such as `12` reads back as `"12"`.
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::String(value) => value.clone(),
            ScalarValue::Number(value) | ScalarValue::DateTime(value) => format_number(*value),
            ScalarValue::Boolean(value) => value.to_string(),
        }
    }

    /// Converts the value into its JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ScalarValue::String(value) => serde_json::Value::String(value.clone()),
            ScalarValue::Number(value) | ScalarValue::DateTime(value) => {
                serde_json::Number::from_f64(*value)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
            ScalarValue::Boolean(value) => serde_json::Value::Bool(*value),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A single cell; `None` marks a missing value.
pub type Cell = Option<ScalarValue>;

/// A table as read from a spreadsheet: raw headers and rows of cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table, padding or truncating every row to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Finds a column position by header, ignoring case and surrounding
    /// whitespace.
    pub fn position(&self, header: &str) -> Option<usize> {
        let wanted = ColumnKey::new(header);
        self.columns
            .iter()
            .position(|column| ColumnKey::new(column) == wanted)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A target dataset whose headers have been canonicalised into
/// [`ColumnKey`]s.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<ColumnKey>,
    index: HashMap<ColumnKey, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Normalises the table headers. When two headers collapse onto the same
    /// key, only the first one stays addressable.
    pub fn from_table(table: Table) -> Self {
        let columns: Vec<ColumnKey> = table
            .columns
            .iter()
            .map(|column| ColumnKey::new(column))
            .collect();

        let mut index = HashMap::with_capacity(columns.len());
        for (position, key) in columns.iter().enumerate() {
            if index.contains_key(key) {
                warn!(column = %key, "duplicate column after normalisation; keeping the first");
                continue;
            }
            index.insert(key.clone(), position);
        }

        Self {
            columns,
            index,
            rows: table.rows,
        }
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the value of `key` in `row`, or `None` when the column is
    /// absent or the cell is missing.
    pub fn value<'a>(&self, row: &'a [Cell], key: &ColumnKey) -> Option<&'a ScalarValue> {
        let position = *self.index.get(key)?;
        row.get(position)?.as_ref()
    }
}
