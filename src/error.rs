//! Error types shared by the data, design and render layers.

use std::path::PathBuf;

use thiserror::Error;

/// Role a column plays in a label design, used to point at the offending setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Visible,
    Qr,
    Highlight,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Visible => write!(f, "visible"),
            ColumnRole::Qr => write!(f, "QR code"),
            ColumnRole::Highlight => write!(f, "highlight"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no data rows: {0:?}")]
    EmptyDataset(PathBuf),

    #[error("CSV header is empty: {0:?}")]
    EmptyHeader(PathBuf),

    #[error("Duplicate column name in CSV header: {0:?}")]
    DuplicateColumn(String),

    #[error("Unknown {role} column: {column:?}")]
    UnknownColumn { column: String, role: ColumnRole },

    #[error("Row {row} is out of range (dataset has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Invalid label design: {0}")]
    InvalidDesign(String),

    #[error("Unknown label preset: {0:?} (see `plantid-labels presets`)")]
    UnknownPreset(String),

    #[error("Cannot encode {value:?} as a QR code: {source}")]
    QrEncode {
        value: String,
        source: qrcode::types::QrError,
    },

    #[error("Label of {width_mm} x {height_mm} mm does not fit on a {page} page")]
    LayoutOverflow {
        width_mm: f64,
        height_mm: f64,
        page: String,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to parse design file {path:?}: {source}")]
    DesignFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize design: {0}")]
    DesignSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, LabelError>;
