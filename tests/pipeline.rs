use std::fs;
use std::path::Path;

use sats_reshape::ToolError;
use sats_reshape::io::excel_read::{self, SheetSelector};
use sats_reshape::io::excel_write;
use sats_reshape::io::json::load_json;
use sats_reshape::model::{Cell, ScalarValue, Table};
use sats_reshape::pipeline::{self, OutputShape, TransformRequest};
use sats_reshape::reshape::ReshapeOptions;
use tempfile::tempdir;

fn text(value: &str) -> Cell {
    Some(ScalarValue::String(value.to_string()))
}

fn num(value: f64) -> Cell {
    Some(ScalarValue::Number(value))
}

fn write_sheet(path: &Path, columns: &[&str], rows: Vec<Vec<Cell>>) {
    let table = Table::new(columns.iter().map(|c| c.to_string()).collect(), rows);
    excel_write::write_table(path, &table, "Data").expect("workbook written");
}

fn write_mapping(path: &Path) {
    write_sheet(
        path,
        &["FINAL", "ORIGINAL_1", "ORIGINAL_2", "NOTES"],
        vec![
            vec![text("RESPONDENT"), text("record"), None, text("respondent id")],
            vec![text("AGE"), text("Age"), text("[derived]"), None],
            vec![text("SATISFACTION"), text("Q10_LrNr"), text("Q20_LrNr"), None],
            vec![None, text("ignored"), None, text("no FINAL")],
        ],
    );
}

fn write_survey(path: &Path) {
    write_sheet(
        path,
        &["record", "AGE ", "Q10_Lr1", "Q10_Lr2", "Q20_Lr1", "Markers"],
        vec![
            vec![
                text("1001"),
                num(34.0),
                num(4.0),
                None,
                num(5.0),
                text("Destination 1/Paris, State 1/Île-de-France"),
            ],
            vec![text("1002"), num(58.0), None, None, None, text("Destination 1/Lyon")],
            vec![text("1003"), None, num(2.0), num(3.0), None, None],
        ],
    );
}

fn request(dir: &Path, output: &str) -> TransformRequest {
    TransformRequest {
        mapping: dir.join("mapping.xlsx"),
        mapping_sheet: SheetSelector::default(),
        input: dir.join("survey.xlsx"),
        input_sheet: SheetSelector::Name("Data".to_string()),
        output: dir.join(output),
        options: ReshapeOptions::default(),
    }
}

#[test]
fn transform_writes_long_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    write_mapping(&temp_dir.path().join("mapping.xlsx"));
    write_survey(&temp_dir.path().join("survey.xlsx"));

    let request = request(temp_dir.path(), "long.xlsx");
    let shape = pipeline::transform(&request).expect("transform succeeded");
    assert_eq!(shape, OutputShape { rows: 4, columns: 4 });

    let written = excel_read::read_table(&request.output, &SheetSelector::default())
        .expect("output read");

    assert_eq!(
        written.columns,
        vec!["RESPONDENT", "AGE", "SATISFACTION", "CITY_EVAL"]
    );
    assert_eq!(
        written.rows,
        vec![
            vec![text("1001"), num(34.0), num(4.0), text("Paris")],
            vec![text("1001"), num(34.0), num(5.0), text("Île-de-France")],
            vec![text("1003"), None, num(2.0), None],
            vec![text("1003"), None, num(3.0), None],
        ]
    );
}

#[test]
fn transform_writes_json_records() {
    let temp_dir = tempdir().expect("temporary directory");
    write_mapping(&temp_dir.path().join("mapping.xlsx"));
    write_survey(&temp_dir.path().join("survey.xlsx"));

    let request = request(temp_dir.path(), "long.json");
    pipeline::transform(&request).expect("transform succeeded");

    let written = fs::read_to_string(&request.output).expect("JSON output read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");

    let records = parsed.as_array().expect("array of records");
    assert_eq!(records.len(), 4);
    assert_eq!(
        records[0],
        serde_json::json!({
            "RESPONDENT": "1001",
            "AGE": 34.0,
            "SATISFACTION": 4.0,
            "CITY_EVAL": "Paris"
        })
    );
    assert_eq!(records[2]["CITY_EVAL"], serde_json::Value::Null);
}

#[test]
fn repeated_runs_produce_identical_output() {
    let temp_dir = tempdir().expect("temporary directory");
    write_mapping(&temp_dir.path().join("mapping.xlsx"));
    write_survey(&temp_dir.path().join("survey.xlsx"));

    let first = request(temp_dir.path(), "first.json");
    let second = request(temp_dir.path(), "second.json");
    pipeline::transform(&first).expect("first run");
    pipeline::transform(&second).expect("second run");

    let first_bytes = fs::read(&first.output).expect("first output");
    let second_bytes = fs::read(&second.output).expect("second output");
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn inspect_reports_destinations_and_mappings() {
    let temp_dir = tempdir().expect("temporary directory");
    let request = request(temp_dir.path(), "unused.xlsx");
    write_mapping(&request.mapping);
    write_survey(&request.input);

    let report = pipeline::inspect(
        &request.mapping,
        &request.mapping_sheet,
        &request.input,
        &request.input_sheet,
        &request.options,
    )
    .expect("inspection succeeded");

    let destinations: Vec<String> = report.destinations.iter().map(ToString::to_string).collect();
    assert_eq!(destinations, vec!["lr1", "lr2"]);
    assert_eq!(report.city_columns, 2);
    assert_eq!(report.state_columns, 2);
    assert_eq!(report.dataset_rows, 3);
    assert_eq!(
        report
            .unmapped_columns
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>(),
        vec!["markers"]
    );
    assert!(
        report
            .mappings
            .iter()
            .any(|entry| entry.source.as_str() == "q20_lr2" && entry.target == "SATISFACTION")
    );
}

#[test]
fn mapping_without_final_column_is_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let request = request(temp_dir.path(), "long.xlsx");
    write_sheet(
        &request.mapping,
        &["TARGET", "ORIGINAL_1"],
        vec![vec![text("AGE"), text("Age")]],
    );
    write_survey(&request.input);

    let error = pipeline::transform(&request).expect_err("missing FINAL must fail");

    assert!(matches!(error, ToolError::MissingColumn { ref column, .. } if column == "FINAL"));
    assert!(!request.output.exists());
}

#[test]
fn unknown_sheet_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("survey.xlsx");
    write_survey(&path);

    let error = excel_read::read_table(&path, &SheetSelector::Name("Responses".to_string()))
        .expect_err("sheet does not exist");

    assert!(matches!(error, ToolError::InvalidWorkbook(_)));
}

#[test]
fn sheet_selector_parses_positions_and_names() {
    assert_eq!("2".parse::<SheetSelector>(), Ok(SheetSelector::Index(2)));
    assert_eq!(
        "Wave 2".parse::<SheetSelector>(),
        Ok(SheetSelector::Name("Wave 2".to_string()))
    );
}

#[test]
fn na_text_cells_do_not_count_as_answers() {
    let temp_dir = tempdir().expect("temporary directory");
    let request = request(temp_dir.path(), "long.xlsx");
    write_mapping(&request.mapping);
    write_sheet(
        &request.input,
        &["record", "Q10_Lr1", "Q10_Lr2", "Q10_Lr3"],
        vec![vec![text("2001"), text("NA"), text(" #N/A "), num(4.0)]],
    );

    let survey = excel_read::read_table(&request.input, &request.input_sheet)
        .expect("survey read");
    assert_eq!(survey.rows, vec![vec![text("2001"), None, None, num(4.0)]]);

    let shape = pipeline::transform(&request).expect("transform succeeded");
    assert_eq!(shape, OutputShape { rows: 1, columns: 4 });

    let written = excel_read::read_table(&request.output, &SheetSelector::default())
        .expect("output read");
    assert_eq!(written.rows, vec![vec![text("2001"), None, num(4.0), None]]);
}

#[test]
fn partial_config_keeps_default_marker_column() {
    let temp_dir = tempdir().expect("temporary directory");
    let config_path = temp_dir.path().join("options.json");
    fs::write(&config_path, r#"{"label_column": "X"}"#).expect("config written");

    let options: ReshapeOptions = load_json(&config_path).expect("config parsed");

    assert_eq!(
        options,
        ReshapeOptions {
            marker_column: "markers".to_string(),
            label_column: "X".to_string(),
        }
    );
}
