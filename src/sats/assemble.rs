//! Combines the mapping sheet with a concrete survey export.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::sats::destinations::{DestinationCode, discover_destinations};
use crate::sats::error::Result;
use crate::sats::expand::{Expansion, expand_patterns};
use crate::sats::io::excel_read::{self, SheetSelector};
use crate::sats::mapping::{ColumnMap, MappingSpec, parse_mapping};
use crate::sats::model::{ColumnKey, Dataset};

/// Concrete columns for each destination group. They are kept apart because
/// the two groups are reshaped into separate records.
#[derive(Debug, Clone, Default)]
pub struct DestinationGroups {
    /// Expansion of `ORIGINAL_1` templates.
    pub city: Expansion,
    /// Expansion of `ORIGINAL_2` templates.
    pub state: Expansion,
}

/// Everything the reshape step needs.
#[derive(Debug, Clone)]
pub struct AssembledMapping {
    /// Source column → output field, overlaying exact aliases, then city
    /// expansions, then state expansions.
    pub unified: ColumnMap<String>,
    /// Destination universe discovered in the dataset.
    pub destinations: Vec<DestinationCode>,
    /// The dataset with canonical column names.
    pub dataset: Dataset,
    /// Output field order.
    pub final_order: Vec<String>,
    pub groups: DestinationGroups,
}

impl AssembledMapping {
    /// Canonical column names of the dataset, in sheet order.
    pub fn columns(&self) -> &[ColumnKey] {
        self.dataset.columns()
    }
}

/// Resolves a parsed mapping sheet against a dataset.
pub fn assemble(spec: MappingSpec, dataset: Dataset) -> AssembledMapping {
    let destinations = discover_destinations(dataset.columns());
    let city = expand_patterns(&spec.patterns_1, &destinations);
    let state = expand_patterns(&spec.patterns_2, &destinations);

    let mut unified = spec.exact;
    unified.extend(
        city.iter()
            .chain(state.iter())
            .map(|(key, column)| (key.clone(), column.final_field.clone())),
    );

    debug!(
        destinations = destinations.len(),
        city_columns = city.len(),
        state_columns = state.len(),
        unified = unified.len(),
        "mapping assembled"
    );

    AssembledMapping {
        unified,
        destinations,
        dataset,
        final_order: spec.final_order,
        groups: DestinationGroups { city, state },
    }
}

/// Loads the mapping sheet and the survey export, then assembles them.
#[instrument(
    level = "info",
    skip_all,
    fields(mapping = %mapping_path.display(), dataset = %dataset_path.display())
)]
pub fn build_full_mapping(
    mapping_path: &Path,
    mapping_sheet: &SheetSelector,
    dataset_path: &Path,
    dataset_sheet: &SheetSelector,
) -> Result<AssembledMapping> {
    let mapping_table = excel_read::read_table(mapping_path, mapping_sheet)?;
    let spec = parse_mapping(&mapping_table)?;

    let dataset_table = excel_read::read_table(dataset_path, dataset_sheet)?;
    info!(
        rows = dataset_table.row_count(),
        columns = dataset_table.columns.len(),
        "loaded survey export"
    );
    let assembled = assemble(spec, Dataset::from_table(dataset_table));
    info!(
        destinations = assembled.destinations.len(),
        "detected destination codes"
    );
    Ok(assembled)
}
