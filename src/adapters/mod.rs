// Adapters layer: concrete data sources for the student tables.

pub mod csv_source;
pub mod sheet_source;

pub use csv_source::CsvFileSource;
pub use sheet_source::SheetCsvSource;
