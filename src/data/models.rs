//! Data models for uploaded label metadata.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

/// Maximum characters to show in a record's display name before truncating
const DISPLAY_NAME_MAX_LEN: usize = 16;

/// One row of the metadata CSV; one record becomes one label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,
    pub values: HashMap<String, String>,
}

impl Record {
    pub fn new(line: u64, values: HashMap<String, String>) -> Self {
        Record { line, values }
    }

    /// Value of a column, or `None` when the record has no such column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Short name for list panels, derived from the given key column
    pub fn display_name(&self, key_column: Option<&str>) -> String {
        let name = key_column
            .and_then(|c| self.get(c))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("line {}", self.line));

        if name.chars().count() > DISPLAY_NAME_MAX_LEN {
            let truncated: String = name.chars().take(DISPLAY_NAME_MAX_LEN).collect();
            format!("{truncated}...")
        } else {
            name
        }
    }
}

/// A loaded CSV: header order plus records in file order
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Look up a record by its 1-based row index
    pub fn record(&self, row: usize) -> Result<&Record> {
        row.checked_sub(1)
            .and_then(|idx| self.records.get(idx))
            .ok_or(LabelError::RowOutOfRange {
                row,
                rows: self.records.len(),
            })
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            source: self.source.display().to_string(),
            columns: self.columns.clone(),
            rows: self.records.len(),
        }
    }
}

/// Column and row overview printed by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} rows", self.source, self.rows)?;
        for (idx, column) in self.columns.iter().enumerate() {
            writeln!(f, "  {:>2}. {column}", idx + 1)?;
        }
        Ok(())
    }
}
