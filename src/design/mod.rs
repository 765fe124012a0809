//! Label design: size, visible fields, QR code and highlight settings.
//!
//! A design is independent of any particular CSV until it is validated
//! against a dataset's columns. Designs round-trip through TOML files so a
//! layout can be reused across sample sheets.

mod presets;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ColumnRole, LabelError, Result};

pub use presets::{find_preset, preset_keys, CUSTOM_PRESET, DEFAULT_PRESET, PRESETS};

/// Allowed custom label width/height in millimetres
pub const CUSTOM_SIZE_RANGE_MM: (f64, f64) = (5.0, 140.0);
/// Smallest QR code that still scans reliably on a label, in millimetres
pub const MIN_QR_SIZE_MM: f64 = 8.0;
pub const DEFAULT_QR_SIZE_MM: f64 = 18.0;
pub const ROW_HEIGHT_FACTOR_RANGE: (f64, f64) = (0.1, 1.5);
pub const HIGHLIGHT_PADDING_RANGE_PT: (f64, f64) = (0.0, 20.0);
pub const SIDEBAR_FACTOR_RANGE: (f64, f64) = (0.05, 0.5);
/// Number of leading CSV columns shown when no selection is given
pub const DEFAULT_VISIBLE_COLUMNS: usize = 4;

/// Environment variable overriding the default design file location
pub const DESIGN_ENV_VAR: &str = "PLANTID_DESIGN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub enabled: bool,
    pub column: Option<String>,
    pub size_mm: f64,
    pub left_offset_mm: f64,
}

impl Default for QrSettings {
    fn default() -> Self {
        QrSettings {
            enabled: true,
            column: None,
            size_mm: DEFAULT_QR_SIZE_MM,
            left_offset_mm: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub column: Option<String>,
    /// Extra width of the black bar behind the highlighted value, in points
    pub padding_pt: f64,
    /// Draw the highlighted column rotated along the left edge
    pub side_strip: bool,
    /// Side strip width as a fraction of the label width
    pub sidebar_factor: f64,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        HighlightSettings {
            column: None,
            padding_pt: 2.0,
            side_strip: false,
            sidebar_factor: 0.1,
        }
    }
}

impl HighlightSettings {
    /// Whether a side strip is actually drawn (needs a highlight column)
    pub fn side_strip_active(&self) -> bool {
        self.side_strip && self.column.is_some()
    }
}

/// Complete set of user choices that turn a record into a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelDesign {
    pub preset: String,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Columns printed on the label, in order; `None` until chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_columns: Option<Vec<String>>,
    pub show_column_names: bool,
    pub show_border: bool,
    pub row_height_factor: f64,
    pub qr: QrSettings,
    pub highlight: HighlightSettings,
}

impl Default for LabelDesign {
    fn default() -> Self {
        LabelDesign {
            preset: DEFAULT_PRESET.to_string(),
            width_mm: 70.0,
            height_mm: 35.0,
            visible_columns: None,
            show_column_names: true,
            show_border: true,
            row_height_factor: 0.9,
            qr: QrSettings::default(),
            highlight: HighlightSettings::default(),
        }
    }
}

impl LabelDesign {
    /// Default design for a dataset: first four columns shown, QR from the first column
    pub fn for_columns(columns: &[String]) -> Self {
        let mut design = LabelDesign::default();
        design.complete(columns);
        design
    }

    /// Fill in column choices left unset (e.g. by a partial design file).
    ///
    /// An explicitly empty column list is kept.
    pub fn complete(&mut self, columns: &[String]) {
        if self.visible_columns.is_none() {
            self.visible_columns = Some(
                columns
                    .iter()
                    .take(DEFAULT_VISIBLE_COLUMNS)
                    .cloned()
                    .collect(),
            );
        }
        if self.qr.column.is_none() {
            self.qr.column = columns.first().cloned();
        }
    }

    /// Largest QR code that fits the label height, in millimetres
    pub fn max_qr_size_mm(&self) -> f64 {
        MIN_QR_SIZE_MM.max(self.height_mm - 2.0)
    }

    /// Largest QR left offset (half the label width), in millimetres
    pub fn max_qr_offset_mm(&self) -> f64 {
        (self.width_mm / 2.0).floor().max(0.0)
    }

    pub fn is_custom_size(&self) -> bool {
        self.preset.eq_ignore_ascii_case(CUSTOM_PRESET)
    }

    /// Switch to a named preset (or `custom`), re-fitting the QR code
    pub fn apply_preset(&mut self, key: &str) -> Result<()> {
        if key.eq_ignore_ascii_case(CUSTOM_PRESET) {
            self.preset = CUSTOM_PRESET.to_string();
            return Ok(());
        }
        let preset = find_preset(key)?;
        self.preset = preset.key.to_string();
        self.width_mm = preset.width_mm;
        self.height_mm = preset.height_mm;
        self.fit_qr();
        debug!(preset = preset.key, "Applied label preset");
        Ok(())
    }

    /// Use an explicit size; switches the design to the custom preset
    pub fn set_custom_size(&mut self, width_mm: f64, height_mm: f64) -> Result<()> {
        check_range("label width (mm)", width_mm, CUSTOM_SIZE_RANGE_MM)?;
        check_range("label height (mm)", height_mm, CUSTOM_SIZE_RANGE_MM)?;
        self.preset = CUSTOM_PRESET.to_string();
        self.width_mm = width_mm;
        self.height_mm = height_mm;
        self.fit_qr();
        Ok(())
    }

    /// Clamp QR size and offset into the ranges allowed by the current label size
    pub fn fit_qr(&mut self) {
        self.qr.size_mm = self.qr.size_mm.clamp(MIN_QR_SIZE_MM, self.max_qr_size_mm());
        self.qr.left_offset_mm = self.qr.left_offset_mm.clamp(0.0, self.max_qr_offset_mm());
    }

    /// Add a column to the visible set, or remove it if already shown
    pub fn toggle_visible(&mut self, column: &str) {
        let shown = self.visible_columns.get_or_insert_with(Vec::new);
        if let Some(idx) = shown.iter().position(|c| c == column) {
            shown.remove(idx);
        } else {
            shown.push(column.to_string());
        }
    }

    /// Columns printed on the label
    pub fn shown_columns(&self) -> &[String] {
        self.visible_columns.as_deref().unwrap_or_default()
    }

    /// Check the design against a dataset's columns and the allowed ranges
    pub fn validate(&self, columns: &[String]) -> Result<()> {
        let known = |column: &str, role: ColumnRole| {
            if columns.iter().any(|c| c == column) {
                Ok(())
            } else {
                Err(LabelError::UnknownColumn {
                    column: column.to_string(),
                    role,
                })
            }
        };

        if self.is_custom_size() {
            check_range("label width (mm)", self.width_mm, CUSTOM_SIZE_RANGE_MM)?;
            check_range("label height (mm)", self.height_mm, CUSTOM_SIZE_RANGE_MM)?;
        } else {
            let preset = find_preset(&self.preset)?;
            if preset.width_mm != self.width_mm || preset.height_mm != self.height_mm {
                return Err(LabelError::InvalidDesign(format!(
                    "size {} x {} mm does not match preset {:?}; use the custom preset",
                    self.width_mm, self.height_mm, preset.key
                )));
            }
        }

        let shown = self.shown_columns();
        for (idx, column) in shown.iter().enumerate() {
            known(column, ColumnRole::Visible)?;
            if shown[..idx].contains(column) {
                return Err(LabelError::InvalidDesign(format!(
                    "column {column:?} is listed twice"
                )));
            }
        }

        check_range("row height factor", self.row_height_factor, ROW_HEIGHT_FACTOR_RANGE)?;

        if self.qr.enabled {
            let column = self.qr.column.as_deref().ok_or_else(|| {
                LabelError::InvalidDesign("QR code is enabled but no QR column is set".into())
            })?;
            known(column, ColumnRole::Qr)?;
            check_range(
                "QR code size (mm)",
                self.qr.size_mm,
                (MIN_QR_SIZE_MM, self.max_qr_size_mm()),
            )?;
            check_range(
                "QR left offset (mm)",
                self.qr.left_offset_mm,
                (0.0, self.max_qr_offset_mm()),
            )?;
        }

        if let Some(column) = self.highlight.column.as_deref() {
            known(column, ColumnRole::Highlight)?;
            check_range(
                "highlight padding",
                self.highlight.padding_pt,
                HIGHLIGHT_PADDING_RANGE_PT,
            )?;
            if self.highlight.side_strip {
                check_range(
                    "sidebar size factor",
                    self.highlight.sidebar_factor,
                    SIDEBAR_FACTOR_RANGE,
                )?;
            }
        }

        Ok(())
    }

    /// Read a design from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let design = toml::from_str(&text).map_err(|source| LabelError::DesignFile {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded label design");
        Ok(design)
    }

    /// Write the design as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Saved label design");
        Ok(())
    }

    /// Default design file: `$PLANTID_DESIGN`, else `<config dir>/plantid-labels/design.toml`
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(DESIGN_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("plantid-labels").join("design.toml"))
    }
}

fn check_range(what: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LabelError::InvalidDesign(format!(
            "{what} must be between {min} and {max}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        ["id", "species", "plot", "sown", "genotype"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_defaults_for_columns() {
        let design = LabelDesign::for_columns(&columns());
        assert_eq!(design.shown_columns(), &["id", "species", "plot", "sown"]);
        assert_eq!(design.qr.column.as_deref(), Some("id"));
        assert_eq!(design.preset, DEFAULT_PRESET);
        assert_eq!((design.width_mm, design.height_mm), (70.0, 35.0));
        assert_eq!(design.qr.size_mm, 18.0);
        assert!(design.validate(&columns()).is_ok());
    }

    #[test]
    fn test_unknown_column_reports_role() {
        let mut design = LabelDesign::for_columns(&columns());
        design.highlight.column = Some("treatment".to_string());
        match design.validate(&columns()) {
            Err(LabelError::UnknownColumn { column, role }) => {
                assert_eq!(column, "treatment");
                assert_eq!(role, ColumnRole::Highlight);
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }

        let mut design = LabelDesign::for_columns(&columns());
        design.qr.column = Some("barcode".to_string());
        assert!(matches!(
            design.validate(&columns()),
            Err(LabelError::UnknownColumn { role: ColumnRole::Qr, .. })
        ));
    }

    #[test]
    fn test_disabled_qr_ignores_qr_column() {
        let mut design = LabelDesign::for_columns(&columns());
        design.qr.enabled = false;
        design.qr.column = Some("barcode".to_string());
        assert!(design.validate(&columns()).is_ok());
    }

    #[test]
    fn test_preset_change_refits_qr_and_keeps_fields() {
        let mut design = LabelDesign::for_columns(&columns());
        design.qr.left_offset_mm = 30.0;
        let fields = design.visible_columns.clone();

        design.apply_preset("cryovial").unwrap();

        assert_eq!((design.width_mm, design.height_mm), (25.0, 12.0));
        assert_eq!(design.max_qr_size_mm(), 10.0);
        assert_eq!(design.qr.size_mm, 10.0);
        assert_eq!(design.qr.left_offset_mm, 12.0);
        assert_eq!(design.visible_columns, fields);
        assert!(design.validate(&columns()).is_ok());
    }

    #[test]
    fn test_tiny_label_keeps_minimum_qr() {
        let mut design = LabelDesign::for_columns(&columns());
        design.set_custom_size(20.0, 6.0).unwrap();
        assert_eq!(design.max_qr_size_mm(), MIN_QR_SIZE_MM);
        assert_eq!(design.qr.size_mm, MIN_QR_SIZE_MM);
        assert_eq!(design.preset, CUSTOM_PRESET);
    }

    #[test]
    fn test_custom_size_range() {
        let mut design = LabelDesign::default();
        assert!(design.set_custom_size(4.0, 30.0).is_err());
        assert!(design.set_custom_size(60.0, 141.0).is_err());
        assert!(design.set_custom_size(140.0, 5.0).is_ok());
    }

    #[test]
    fn test_preset_size_mismatch_is_invalid() {
        let mut design = LabelDesign::for_columns(&columns());
        design.width_mm = 80.0;
        assert!(matches!(
            design.validate(&columns()),
            Err(LabelError::InvalidDesign(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_are_invalid() {
        let mut design = LabelDesign::for_columns(&columns());
        design.row_height_factor = 2.0;
        assert!(design.validate(&columns()).is_err());

        let mut design = LabelDesign::for_columns(&columns());
        design.qr.size_mm = 40.0;
        assert!(design.validate(&columns()).is_err());

        let mut design = LabelDesign::for_columns(&columns());
        design.highlight.column = Some("plot".to_string());
        design.highlight.side_strip = true;
        design.highlight.sidebar_factor = 0.9;
        assert!(design.validate(&columns()).is_err());
    }

    #[test]
    fn test_duplicate_visible_column_is_invalid() {
        let mut design = LabelDesign::for_columns(&columns());
        design.visible_columns.get_or_insert_with(Vec::new).push("id".to_string());
        assert!(matches!(
            design.validate(&columns()),
            Err(LabelError::InvalidDesign(_))
        ));
    }

    #[test]
    fn test_toggle_visible_preserves_order() {
        let mut design = LabelDesign::for_columns(&columns());
        design.toggle_visible("species");
        assert_eq!(design.shown_columns(), &["id", "plot", "sown"]);
        design.toggle_visible("species");
        assert_eq!(design.shown_columns(), &["id", "plot", "sown", "species"]);
    }

    #[test]
    fn test_side_strip_needs_highlight_column() {
        let mut highlight = HighlightSettings::default();
        highlight.side_strip = true;
        assert!(!highlight.side_strip_active());
        highlight.column = Some("plot".to_string());
        assert!(highlight.side_strip_active());
    }

    #[test]
    fn test_save_and_load_design_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("design.toml");

        let mut design = LabelDesign::for_columns(&columns());
        design.apply_preset("large-field").unwrap();
        design.highlight.column = Some("genotype".to_string());
        design.highlight.side_strip = true;
        design.save(&path).unwrap();

        let loaded = LabelDesign::load(&path).unwrap();
        assert_eq!(loaded, design);
    }

    #[test]
    fn test_partial_design_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.toml");
        std::fs::write(&path, "show_border = false\n\n[qr]\nenabled = false\n").unwrap();

        let mut design = LabelDesign::load(&path).unwrap();
        design.complete(&columns());

        assert!(!design.show_border);
        assert!(!design.qr.enabled);
        assert_eq!(design.row_height_factor, 0.9);
        assert_eq!(design.shown_columns().len(), DEFAULT_VISIBLE_COLUMNS);
    }

    #[test]
    fn test_malformed_design_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.toml");
        std::fs::write(&path, "width_mm = \"wide\"\n").unwrap();
        assert!(matches!(
            LabelDesign::load(&path),
            Err(LabelError::DesignFile { .. })
        ));
    }

    #[test]
    fn test_empty_column_list_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.toml");

        let mut design = LabelDesign::for_columns(&columns());
        design.visible_columns = Some(Vec::new());
        design.save(&path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("visible_columns = []"));

        let mut loaded = LabelDesign::load(&path).unwrap();
        loaded.complete(&columns());
        assert_eq!(loaded.visible_columns, Some(Vec::new()));
        assert!(loaded.shown_columns().is_empty());
        assert!(loaded.validate(&columns()).is_ok());
    }

    #[test]
    fn test_toggling_last_column_leaves_empty_list() {
        let mut design = LabelDesign::for_columns(&columns()[..1]);
        design.toggle_visible("id");
        assert_eq!(design.visible_columns, Some(Vec::new()));
        design.complete(&columns());
        assert!(design.shown_columns().is_empty());
    }
}
