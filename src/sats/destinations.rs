//! Discovery of destination codes embedded in survey column names.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::sats::model::ColumnKey;

static DESTINATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)_lr(\d+)").expect("invalid destination regex"));
static DESTINATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lr\d+").expect("invalid destination token regex"));

/// Normalised destination code such as `lr3`.
///
/// Codes order lexicographically (`lr1 < lr10 < lr2`), matching the order
/// used when the destination universe is reported and when records are
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DestinationCode(String);

impl DestinationCode {
    /// Builds a code from the digits following `lr`.
    pub fn from_digits(digits: &str) -> Self {
        Self(format!("lr{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the destination code from a column name, using the first
/// `_lr<digits>` occurrence.
pub fn destination_in(column: &str) -> Option<DestinationCode> {
    DESTINATION_SUFFIX
        .captures(column)
        .map(|captures| DestinationCode::from_digits(&captures[1]))
}

/// Returns `true` when the column name mentions any `lr<digits>` token, i.e.
/// it holds a destination-specific answer rather than a respondent-level one.
pub fn carries_destination(column: &ColumnKey) -> bool {
    DESTINATION_TOKEN.is_match(column.as_str())
}

/// Returns the sorted, de-duplicated destination codes present in `columns`.
pub fn discover_destinations<'a, I>(columns: I) -> Vec<DestinationCode>
where
    I: IntoIterator<Item = &'a ColumnKey>,
{
    columns
        .into_iter()
        .filter_map(|column| destination_in(column.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
