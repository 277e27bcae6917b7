//! Spreadsheet and JSON adapters around the in-memory [`Table`](crate::sats::model::Table).

pub mod excel_read;
pub mod excel_write;
pub mod json;
