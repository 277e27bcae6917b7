use tracing::debug;

use super::{MappingSpec, PatternAlias, is_templated};
use crate::sats::error::{Result, ToolError};
use crate::sats::model::{ColumnKey, Table};

/// Header naming the output field.
pub const FINAL_COLUMN: &str = "FINAL";
/// Alias headers, in group order.
pub const ORIGINAL_COLUMNS: [&str; 2] = ["ORIGINAL_1", "ORIGINAL_2"];

/// Marks an alias cell as a comment rather than a real column name.
const COMMENT_PREFIX: char = '[';

/// Classifies every alias in the mapping sheet.
///
/// Rows without a `FINAL` value are skipped. Each `ORIGINAL_n` cell is
/// ignored when missing or when it starts with `[`; otherwise it becomes a
/// pattern of group `n` if it carries a destination placeholder, or an exact
/// alias. Exact aliases share one map regardless of group; the last row wins
/// on duplicate names.
pub fn parse_mapping(table: &Table) -> Result<MappingSpec> {
    let final_position = table
        .position(FINAL_COLUMN)
        .ok_or_else(|| ToolError::MissingColumn {
            column: FINAL_COLUMN.to_string(),
            source_name: "mapping sheet".to_string(),
        })?;
    let original_positions = ORIGINAL_COLUMNS.map(|header| table.position(header));

    let mut spec = MappingSpec::default();

    for row in &table.rows {
        let Some(final_field) = row
            .get(final_position)
            .and_then(Option::as_ref)
            .map(|value| value.to_text().trim().to_string())
            .filter(|value| !value.is_empty())
        else {
            continue;
        };

        if !spec.final_order.contains(&final_field) {
            spec.final_order.push(final_field.clone());
        }

        for (group, &position) in original_positions.iter().enumerate() {
            let Some(raw) = position
                .and_then(|position| row.get(position))
                .and_then(Option::as_ref)
                .map(|value| value.to_text())
            else {
                continue;
            };
            if raw.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let alias = raw.trim();
            if alias.is_empty() {
                continue;
            }

            if is_templated(alias) {
                let pattern = PatternAlias {
                    pattern: alias.to_string(),
                    final_field: final_field.clone(),
                };
                if group == 0 {
                    spec.patterns_1.push(pattern);
                } else {
                    spec.patterns_2.push(pattern);
                }
            } else {
                spec.exact
                    .insert(ColumnKey::new(alias), final_field.clone());
            }
        }
    }

    debug!(
        exact = spec.exact.len(),
        patterns_1 = spec.patterns_1.len(),
        patterns_2 = spec.patterns_2.len(),
        finals = spec.final_order.len(),
        "parsed mapping sheet"
    );
    Ok(spec)
}
