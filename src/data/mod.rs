//! Data layer for reading label metadata.
//!
//! Loads a user CSV (schema defined by its header) into records, one per label.

mod loader;
mod models;

pub use loader::{load_csv, CsvOptions};
#[cfg(test)]
pub use loader::read_csv;
pub use models::{Dataset, Record};
