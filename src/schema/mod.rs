//! Record schema and row encoder.

pub mod columns;
pub mod encoder;

pub use columns::{column_index, Column, COLUMNS, COLUMN_COUNT};
pub use encoder::{encode, header, write_header, write_record, DELIMITER};
