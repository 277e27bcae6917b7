//! Wide-to-long reshape of survey exports.
//!
//! Every respondent row is unwound into one record per destination the
//! respondent answered for. City-level (`ORIGINAL_1`) and state-level
//! (`ORIGINAL_2`) destinations are unwound independently; a row contributes
//! its city records first, then its state records. Respondent-level fields
//! are repeated on every record.

mod markers;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sats::assemble::AssembledMapping;
use crate::sats::destinations::{DestinationCode, carries_destination};
use crate::sats::expand::Expansion;
use crate::sats::model::{Cell, ColumnKey, Dataset, ScalarValue, Table};

pub use markers::MarkerLabels;

/// Default column holding the survey branching markers.
pub const DEFAULT_MARKER_COLUMN: &str = "markers";
/// Default output field receiving the destination label.
pub const DEFAULT_LABEL_COLUMN: &str = "CITY_EVAL";

/// Tunables for the reshape step. Every field has a default, so a partial
/// JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeOptions {
    /// Dataset column carrying `Destination 1/…` and `State 1/…` markers.
    pub marker_column: String,
    /// Output field the destination label is written to.
    pub label_column: String,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            marker_column: DEFAULT_MARKER_COLUMN.to_string(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
        }
    }
}

/// A partially populated output record: output field → value.
pub type Record = HashMap<String, Cell>;

/// Projects a partial record onto `columns`, filling absent fields with the
/// missing marker.
pub fn project(record: &Record, columns: &[String]) -> Vec<Cell> {
    columns
        .iter()
        .map(|column| record.get(column).cloned().flatten())
        .collect()
}

/// Output schema: the mapping's field order plus the label field, which is
/// appended unless the mapping already declares it.
pub fn output_columns(final_order: &[String], label_column: &str) -> Vec<String> {
    let mut columns = final_order.to_vec();
    if !columns.iter().any(|column| column == label_column) {
        columns.push(label_column.to_string());
    }
    columns
}

/// Destinations of one group for which the row holds at least one answer,
/// in code order.
pub fn present_destinations(
    dataset: &Dataset,
    row: &[Cell],
    expansion: &Expansion,
) -> BTreeSet<DestinationCode> {
    expansion
        .iter()
        .filter(|(column, _)| dataset.value(row, column).is_some())
        .map(|(_, expanded)| expanded.destination.clone())
        .collect()
}

/// Unwinds the dataset into the long-format table.
pub fn reshape(assembled: &AssembledMapping, options: &ReshapeOptions) -> Table {
    let dataset = &assembled.dataset;
    let columns = output_columns(&assembled.final_order, &options.label_column);
    let marker_key = ColumnKey::new(&options.marker_column);

    let static_fields: Vec<(&ColumnKey, &String)> = dataset
        .columns()
        .iter()
        .filter(|column| !carries_destination(column))
        .filter_map(|column| {
            assembled
                .unified
                .get(column)
                .map(|final_field| (column, final_field))
        })
        .collect();

    let groups = [&assembled.groups.city, &assembled.groups.state];
    let mut rows = Vec::new();

    for row in dataset.rows() {
        let labels = dataset
            .value(row, &marker_key)
            .map(|markers| MarkerLabels::parse(&markers.to_text()))
            .unwrap_or_default();

        let mut respondent = Record::new();
        for (column, final_field) in &static_fields {
            respondent.insert((*final_field).clone(), dataset.value(row, column).cloned());
        }

        for (expansion, label) in groups.iter().zip([&labels.city, &labels.state]) {
            for destination in present_destinations(dataset, row, expansion) {
                let mut record = respondent.clone();
                for (_, expanded) in expansion.iter() {
                    let source = expanded.template.column_for(&destination);
                    if let Some(value) = dataset.value(row, &source) {
                        record.insert(expanded.final_field.clone(), Some(value.clone()));
                    }
                }
                record.insert(
                    options.label_column.clone(),
                    label.clone().map(ScalarValue::String),
                );
                rows.push(project(&record, &columns));
            }
        }
    }

    debug!(
        input_rows = dataset.rows().len(),
        output_rows = rows.len(),
        "reshaped survey rows"
    );
    Table { columns, rows }
}
