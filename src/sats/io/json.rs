use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::sats::error::Result;
use crate::sats::model::Table;

/// Converts the table into an array of objects keyed by column name, with
/// missing cells as `null`.
pub fn table_to_records(table: &Table) -> Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    let value = cell.as_ref().map_or(Value::Null, |value| value.to_json());
                    (column.clone(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(records)
}

/// Writes the table as pretty-printed JSON records.
pub fn write_records(path: &Path, table: &Table) -> Result<()> {
    let json_string = serde_json::to_string_pretty(&table_to_records(table))?;
    fs::write(path, json_string)?;
    Ok(())
}

/// Reads a JSON document into `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
