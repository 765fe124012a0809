//! CSV loading for label metadata.
//!
//! The header row defines the schema; every following row becomes one
//! [`Record`]. Rows whose field count differs from the header are rejected
//! by the csv reader with their line number.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::models::{Dataset, Record};
use crate::error::{LabelError, Result};

/// Options for reading a metadata CSV
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions { delimiter: b',' }
    }
}

/// Load a metadata CSV from disk
pub fn load_csv(path: &Path, options: CsvOptions) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let dataset = read_csv(file, path, options)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns.len(),
        "Loaded metadata CSV"
    );
    Ok(dataset)
}

/// Parse metadata CSV from any reader; `source` is only used for reporting
pub fn read_csv<R: Read>(reader: R, source: &Path, options: CsvOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(LabelError::EmptyHeader(source.to_path_buf()));
    }

    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(LabelError::DuplicateColumn(column.clone()));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let values: HashMap<String, String> = columns
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(Record::new(line, values));
    }

    if records.is_empty() {
        return Err(LabelError::EmptyDataset(source.to_path_buf()));
    }

    debug!(columns = ?columns, "Parsed CSV header");

    Ok(Dataset {
        source: source.to_path_buf(),
        columns,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(input: &str) -> Result<Dataset> {
        read_csv(input.as_bytes(), Path::new("test.csv"), CsvOptions::default())
    }

    #[test]
    fn test_parse_records_in_file_order() {
        let dataset = parse("id,species,plot\nP-001,Oryza sativa,A1\nP-002,Zea mays,B4\n").unwrap();

        assert_eq!(dataset.columns, vec!["id", "species", "plot"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].get("species"), Some("Oryza sativa"));
        assert_eq!(dataset.records[1].get("plot"), Some("B4"));
        assert_eq!(dataset.records[0].line, 2);
        assert_eq!(dataset.records[1].line, 3);
    }

    #[test]
    fn test_header_names_are_trimmed_and_bom_ignored() {
        let dataset = parse("\u{feff}id , species\nP-001,Oryza\n").unwrap();
        assert_eq!(dataset.columns, vec!["id", "species"]);
        assert_eq!(dataset.records[0].get("id"), Some("P-001"));
    }

    #[test]
    fn test_empty_cells_become_empty_strings() {
        let dataset = parse("id,notes\nP-001,\n").unwrap();
        assert_eq!(dataset.records[0].get("notes"), Some(""));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let err = parse("id,species\nP-001,Oryza\nP-002\n").unwrap_err();
        match &err {
            LabelError::Csv(e) => match e.kind() {
                csv::ErrorKind::UnequalLengths { pos: Some(pos), .. } => assert_eq!(pos.line(), 3),
                other => panic!("expected UnequalLengths, got {other:?}"),
            },
            other => panic!("expected Csv error, got {other:?}"),
        }
        assert!(err.to_string().contains("line: 3"), "{err}");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let input: &[u8] = b"id,species\nP-001,Ory\xffza\n";
        let err = read_csv(input, Path::new("test.csv"), CsvOptions::default()).unwrap_err();
        match &err {
            LabelError::Csv(e) => assert!(
                matches!(e.kind(), csv::ErrorKind::Utf8 { .. }),
                "got {e:?}"
            ),
            other => panic!("expected Csv error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let err = parse("id,species,id\nP-001,Oryza,x\n").unwrap_err();
        assert!(matches!(err, LabelError::DuplicateColumn(ref c) if c == "id"));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let err = parse("id,species\n").unwrap_err();
        assert!(matches!(err, LabelError::EmptyDataset(_)));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, LabelError::EmptyHeader(_)));
    }

    #[test]
    fn test_tab_delimiter() {
        let dataset = read_csv(
            "id\tspecies\nP-001\tOryza, wild type\n".as_bytes(),
            Path::new("test.tsv"),
            CsvOptions { delimiter: b'\t' },
        )
        .unwrap();
        assert_eq!(dataset.records[0].get("species"), Some("Oryza, wild type"));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,species").unwrap();
        writeln!(file, "P-001,Oryza").unwrap();

        let dataset = load_csv(file.path(), CsvOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.source, file.path());
    }
}
