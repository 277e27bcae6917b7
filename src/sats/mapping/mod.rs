//! Mapping specification types.
//!
//! A mapping specification is a sheet with a `FINAL` column naming the output
//! field and up to two `ORIGINAL_n` alias columns naming where that field can
//! be found in the survey export. Aliases are either literal column names or
//! destination templates such as `Q12_LrNr` that expand into one column per
//! destination code.

mod parser;
mod template;

use indexmap::IndexMap;

use crate::sats::model::ColumnKey;

pub use parser::{FINAL_COLUMN, ORIGINAL_COLUMNS, parse_mapping};
pub use template::{AliasTemplate, is_templated};

/// A templated alias waiting for destination expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternAlias {
    /// Trimmed alias text, e.g. `Q12_LrNrr1`.
    pub pattern: String,
    /// Output field the alias feeds.
    pub final_field: String,
}

/// Everything the mapping sheet declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingSpec {
    /// Literal source column → output field.
    pub exact: ColumnMap<String>,
    /// Templated aliases from `ORIGINAL_1` (city-level answers).
    pub patterns_1: Vec<PatternAlias>,
    /// Templated aliases from `ORIGINAL_2` (state-level answers).
    pub patterns_2: Vec<PatternAlias>,
    /// Distinct output fields in first-seen order.
    pub final_order: Vec<String>,
}

/// Insertion-ordered map keyed by canonical column name.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position, which is the overlay rule used everywhere mappings are merged.
pub type ColumnMap<V> = IndexMap<ColumnKey, V>;
