//! Expansion of templated aliases into concrete column names.

use tracing::debug;

use crate::sats::destinations::DestinationCode;
use crate::sats::mapping::{AliasTemplate, ColumnMap, PatternAlias};

/// A concrete column produced by expanding a template for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedColumn {
    pub template: AliasTemplate,
    pub destination: DestinationCode,
    pub final_field: String,
}

/// Concrete column → expansion, in first-insertion order.
pub type Expansion = ColumnMap<ExpandedColumn>;

/// Expands every usable pattern against every destination.
///
/// Patterns that do not have the `Q<digits>_Lr<Nr|{N}>` shape are dropped.
/// When two expansions name the same concrete column the later one wins.
pub fn expand_patterns(patterns: &[PatternAlias], destinations: &[DestinationCode]) -> Expansion {
    let mut expanded = Expansion::new();

    for alias in patterns {
        let Some(template) = AliasTemplate::parse(&alias.pattern) else {
            debug!(pattern = %alias.pattern, "dropping malformed template alias");
            continue;
        };

        for destination in destinations {
            expanded.insert(
                template.column_for(destination),
                ExpandedColumn {
                    template: template.clone(),
                    destination: destination.clone(),
                    final_field: alias.final_field.clone(),
                },
            );
        }
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sats::model::ColumnKey;

    fn alias(pattern: &str, final_field: &str) -> PatternAlias {
        PatternAlias {
            pattern: pattern.to_string(),
            final_field: final_field.to_string(),
        }
    }

    fn codes(digits: &[&str]) -> Vec<DestinationCode> {
        digits.iter().map(|d| DestinationCode::from_digits(d)).collect()
    }

    #[test]
    fn each_destination_yields_one_column() {
        let expanded = expand_patterns(
            &[alias("Q7_LrNrr2", "RATING")],
            &codes(&["1", "10", "2"]),
        );

        let keys: Vec<&str> = expanded.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["q7_lr1r2", "q7_lr10r2", "q7_lr2r2"]);
        assert!(expanded.iter().all(|(_, column)| column.final_field == "RATING"));
    }

    #[test]
    fn malformed_patterns_are_skipped() {
        let expanded = expand_patterns(
            &[alias("Visit_LrNr", "BROKEN"), alias("Q3_Lr{N}", "OK")],
            &codes(&["4"]),
        );

        assert_eq!(expanded.len(), 1);
        assert_eq!(
            expanded.get(&ColumnKey::new("q3_lr4")).map(|c| c.final_field.as_str()),
            Some("OK")
        );
    }

    #[test]
    fn colliding_expansions_keep_the_last_final() {
        let expanded = expand_patterns(
            &[alias("Q1_LrNr", "FIRST"), alias("q1_lrnr_extra", "SECOND")],
            &codes(&["1"]),
        );

        assert_eq!(expanded.len(), 1);
        assert_eq!(
            expanded.get(&ColumnKey::new("q1_lr1")).map(|c| c.final_field.as_str()),
            Some("SECOND")
        );
    }
}
