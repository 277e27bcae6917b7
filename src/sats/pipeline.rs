use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::sats::assemble::{AssembledMapping, build_full_mapping};
use crate::sats::destinations::DestinationCode;
use crate::sats::error::Result;
use crate::sats::io::excel_read::SheetSelector;
use crate::sats::io::{excel_write, json};
use crate::sats::model::{ColumnKey, Table};
use crate::sats::reshape::{ReshapeOptions, output_columns, reshape};

/// Number of unified mapping entries echoed at debug level.
const MAPPING_SAMPLE: usize = 15;

/// Inputs of a full transformation run.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub mapping: PathBuf,
    pub mapping_sheet: SheetSelector,
    pub input: PathBuf,
    pub input_sheet: SheetSelector,
    pub output: PathBuf,
    pub options: ReshapeOptions,
}

/// Output serialisation, chosen from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Excel,
    Json,
}

impl OutputFormat {
    /// `.json` selects JSON records; anything else is written as a workbook.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Excel,
        }
    }
}

/// Row and column counts of a written output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputShape {
    pub rows: usize,
    pub columns: usize,
}

/// Builds the mapping, reshapes the survey export and writes the result.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %request.input.display(), output = %request.output.display())
)]
pub fn transform(request: &TransformRequest) -> Result<OutputShape> {
    let assembled = build_full_mapping(
        &request.mapping,
        &request.mapping_sheet,
        &request.input,
        &request.input_sheet,
    )?;
    info!(destinations = ?assembled.destinations, "destination universe");
    for (column, final_field) in assembled.unified.iter().take(MAPPING_SAMPLE) {
        debug!(%column, %final_field, "column mapping");
    }

    let table = reshape(&assembled, &request.options);
    let shape = OutputShape {
        rows: table.rows.len(),
        columns: table.columns.len(),
    };
    info!(rows = shape.rows, columns = shape.columns, "reshaped data");

    write_output(&request.output, &table)?;
    info!("output written");
    Ok(shape)
}

/// Writes the table in the format implied by `output`.
#[instrument(level = "debug", skip(table), fields(output = %output.display()))]
pub fn write_output(output: &Path, table: &Table) -> Result<()> {
    match OutputFormat::detect(output) {
        OutputFormat::Excel => excel_write::write_table(output, table, excel_write::OUTPUT_SHEET),
        OutputFormat::Json => json::write_records(output, table),
    }
}

/// Summary of a resolved mapping, printed by the `inspect` command.
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport {
    pub destinations: Vec<DestinationCode>,
    pub dataset_rows: usize,
    pub dataset_columns: usize,
    pub city_columns: usize,
    pub state_columns: usize,
    pub output_columns: Vec<String>,
    pub mappings: Vec<MappingEntry>,
    /// Dataset columns no alias resolves to.
    pub unmapped_columns: Vec<ColumnKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingEntry {
    pub source: ColumnKey,
    pub target: String,
}

impl MappingReport {
    pub fn from_assembled(assembled: &AssembledMapping, options: &ReshapeOptions) -> Self {
        Self {
            destinations: assembled.destinations.clone(),
            dataset_rows: assembled.dataset.rows().len(),
            dataset_columns: assembled.columns().len(),
            city_columns: assembled.groups.city.len(),
            state_columns: assembled.groups.state.len(),
            output_columns: output_columns(&assembled.final_order, &options.label_column),
            mappings: assembled
                .unified
                .iter()
                .map(|(source, target)| MappingEntry {
                    source: source.clone(),
                    target: target.clone(),
                })
                .collect(),
            unmapped_columns: assembled
                .columns()
                .iter()
                .filter(|column| !assembled.unified.contains_key(*column))
                .cloned()
                .collect(),
        }
    }
}

/// Resolves the mapping without reshaping.
#[instrument(
    level = "info",
    skip_all,
    fields(mapping = %mapping.display(), input = %input.display())
)]
pub fn inspect(
    mapping: &Path,
    mapping_sheet: &SheetSelector,
    input: &Path,
    input_sheet: &SheetSelector,
    options: &ReshapeOptions,
) -> Result<MappingReport> {
    let assembled = build_full_mapping(mapping, mapping_sheet, input, input_sheet)?;
    Ok(MappingReport::from_assembled(&assembled, options))
}
