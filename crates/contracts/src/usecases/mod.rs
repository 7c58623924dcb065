pub mod common;
pub mod u501_import_csv;
pub mod u502_import_from_drive;
