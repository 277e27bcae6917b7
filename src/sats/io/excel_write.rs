use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::sats::error::{Result, ToolError};
use crate::sats::model::{ScalarValue, Table};

/// Sheet name used for the reshaped output.
pub const OUTPUT_SHEET: &str = "Sheet1";

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the table to a single-sheet workbook. Missing cells stay blank.
pub fn write_table(path: &Path, table: &Table, sheet_name: &str) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook_writer.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, column_index(col_idx)?, header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = column_index(col_idx)?;
            match cell {
                Some(ScalarValue::String(value)) => {
                    worksheet.write_string(excel_row, excel_col, value)?;
                }
                Some(ScalarValue::Number(value)) => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                Some(ScalarValue::Boolean(value)) => {
                    worksheet.write_boolean(excel_row, excel_col, *value)?;
                }
                Some(ScalarValue::DateTime(value)) => {
                    worksheet.write_number_with_format(excel_row, excel_col, *value, &date_format)?;
                }
                None => {}
            }
        }
    }

    if !table.columns.is_empty() {
        let col_end = column_index(table.columns.len() - 1)?;
        worksheet.autofilter(0, 0, table.rows.len() as u32, col_end)?;
        worksheet.set_freeze_panes(1, 0)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn column_index(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| {
        ToolError::InvalidWorkbook(format!(
            "column {col_idx} exceeds the worksheet column limit"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_column_index_is_rejected() {
        assert_eq!(column_index(16_383).expect("in range"), 16_383);
        assert!(matches!(
            column_index(70_000),
            Err(ToolError::InvalidWorkbook(_))
        ));
    }
}
