//! Command-line interface argument parsing for plantid-labels.
//!
//! - `plantid-labels generate plants.csv -o labels.pdf --preset cryovial`
//! - `plantid-labels label plants.csv --row 3 -o label.pdf`
//! - `plantid-labels preview plants.csv --highlight genotype`
//! - `plantid-labels inspect plants.csv --json`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::data::CsvOptions;
use crate::design::LabelDesign;
use crate::error::LabelError;
use crate::render::{Orientation, PageSize, SheetOptions};

/// Design and print plant sample labels from CSV metadata.
///
/// Every CSV row becomes one label with an optional QR code and highlighted field.
#[derive(Parser, Debug)]
#[command(name = "plantid-labels")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every CSV row as a label on printable sheets
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output PDF path
        #[arg(short, long, default_value = "labels.pdf")]
        output: PathBuf,

        #[command(flatten)]
        design: DesignArgs,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Render a single CSV row as a PDF the size of one label
    Label {
        #[command(flatten)]
        input: InputArgs,

        /// 1-based row to render (header excluded)
        #[arg(short, long, default_value_t = 1)]
        row: usize,

        /// Output PDF path
        #[arg(short, long, default_value = "label.pdf")]
        output: PathBuf,

        #[command(flatten)]
        design: DesignArgs,
    },

    /// Launch the terminal preview to tune the design and export sheets
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// PDF path written by the export key
        #[arg(short, long, default_value = "labels.pdf")]
        output: PathBuf,

        /// Seconds between checks for changes to the CSV file
        #[arg(short, long, default_value = "2")]
        interval: u64,

        #[command(flatten)]
        design: DesignArgs,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// List the built-in label size presets
    Presets,

    /// Show the columns and row count of a CSV
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Metadata CSV with a header row
    pub csv: PathBuf,

    /// Field delimiter (use '\t' for tab-separated files)
    #[arg(long, default_value = ",")]
    pub delimiter: String,
}

impl InputArgs {
    pub fn csv_options(&self) -> Result<CsvOptions> {
        let delimiter = match self.delimiter.as_str() {
            "\\t" | "tab" => b'\t',
            d if d.len() == 1 && d.is_ascii() => d.as_bytes()[0],
            other => bail!("Delimiter must be a single ASCII character, got {other:?}"),
        };
        Ok(CsvOptions { delimiter })
    }
}

/// Label design overrides; anything not given comes from the design file
#[derive(Args, Debug, Clone, Default)]
pub struct DesignArgs {
    /// TOML design file (defaults to $PLANTID_DESIGN or the user config dir)
    #[arg(long)]
    pub design: Option<PathBuf>,

    /// Write the resolved design to this TOML file
    #[arg(long)]
    pub save_design: Option<PathBuf>,

    /// Label size preset (see `presets`), or "custom"
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Custom label width in mm (5-140)
    #[arg(long, requires = "height")]
    pub width: Option<f64>,

    /// Custom label height in mm (5-140)
    #[arg(long, requires = "width")]
    pub height: Option<f64>,

    /// Comma-separated columns to show on the label, in order
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Column encoded in the QR code
    #[arg(long)]
    pub qr_column: Option<String>,

    /// Leave the QR code off
    #[arg(long)]
    pub no_qr: bool,

    /// QR code size in mm
    #[arg(long)]
    pub qr_size: Option<f64>,

    /// Distance from the left label edge to the QR code in mm
    #[arg(long)]
    pub qr_offset: Option<f64>,

    /// Column whose value is printed white on black
    #[arg(long)]
    pub highlight: Option<String>,

    /// Extra width of the highlight bar in points (0-20)
    #[arg(long)]
    pub highlight_padding: Option<f64>,

    /// Draw the highlighted column as a rotated strip along the left edge
    #[arg(long)]
    pub side_strip: bool,

    /// Side strip width as a fraction of the label width (0.05-0.5)
    #[arg(long)]
    pub sidebar_factor: Option<f64>,

    /// Row spacing factor (0.1-1.5)
    #[arg(long)]
    pub row_height_factor: Option<f64>,

    /// Print values without their column names
    #[arg(long)]
    pub hide_column_names: bool,

    /// Do not draw the light grey label outline
    #[arg(long)]
    pub no_border: bool,
}

impl DesignArgs {
    /// Apply explicit flags on top of a base design
    pub fn apply(&self, design: &mut LabelDesign) -> std::result::Result<(), LabelError> {
        if let Some(preset) = &self.preset {
            design.apply_preset(preset)?;
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            design.set_custom_size(width, height)?;
        }
        if let Some(columns) = &self.columns {
            design.visible_columns = Some(
                columns
                    .iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            );
        }
        if let Some(column) = &self.qr_column {
            design.qr.column = Some(column.clone());
        }
        if self.no_qr {
            design.qr.enabled = false;
        }
        if let Some(size) = self.qr_size {
            design.qr.size_mm = size;
        }
        if let Some(offset) = self.qr_offset {
            design.qr.left_offset_mm = offset;
        }
        if let Some(column) = &self.highlight {
            design.highlight.column = Some(column.clone());
        }
        if let Some(padding) = self.highlight_padding {
            design.highlight.padding_pt = padding;
        }
        if self.side_strip {
            design.highlight.side_strip = true;
        }
        if let Some(factor) = self.sidebar_factor {
            design.highlight.sidebar_factor = factor;
        }
        if let Some(factor) = self.row_height_factor {
            design.row_height_factor = factor;
        }
        if self.hide_column_names {
            design.show_column_names = false;
        }
        if self.no_border {
            design.show_border = false;
        }
        Ok(())
    }

    /// Design file to read: explicit flag, else the default location if it exists
    pub fn design_path(&self) -> Option<PathBuf> {
        self.design
            .clone()
            .or_else(|| LabelDesign::default_path().filter(|p| p.exists()))
    }

    /// Build the final design for a dataset: defaults, then design file, then flags
    pub fn resolve(&self, columns: &[String]) -> Result<LabelDesign> {
        let mut design = match self.design_path() {
            Some(path) => {
                let mut design = LabelDesign::load(&path)
                    .with_context(|| format!("Failed to load design file {path:?}"))?;
                design.complete(columns);
                design
            }
            None => LabelDesign::for_columns(columns),
        };
        self.apply(&mut design)?;
        design.validate(columns)?;
        debug!(?design, "Resolved label design");

        if let Some(path) = &self.save_design {
            design
                .save(path)
                .with_context(|| format!("Failed to save design file {path:?}"))?;
        }
        Ok(design)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SheetArgs {
    /// Paper size: a4 or letter
    #[arg(long, default_value = "a4")]
    pub page: PageSize,

    /// Page orientation: auto, portrait or landscape
    #[arg(long, default_value = "auto")]
    pub orientation: Orientation,

    /// Margin around the page edge and between labels in mm
    #[arg(long, default_value_t = crate::render::sheet::DEFAULT_MARGIN_MM)]
    pub margin: f64,
}

impl SheetArgs {
    pub fn options(&self) -> Result<SheetOptions> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            bail!("Margin must be a non-negative number of mm, got {}", self.margin);
        }
        Ok(SheetOptions {
            page: self.page,
            orientation: self.orientation,
            margin_mm: self.margin,
        })
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration for the preview application derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub csv_options: CsvOptions,
    pub output: PathBuf,
    pub refresh_interval_secs: u64,
    pub design_args: DesignArgs,
    pub sheet: SheetOptions,
    /// Where the `w` key saves the design
    pub design_path: Option<PathBuf>,
}

impl AppConfig {
    /// Create AppConfig from the `preview` command's arguments
    pub fn from_preview_command(
        input: InputArgs,
        output: PathBuf,
        interval: u64,
        design_args: DesignArgs,
        sheet: SheetArgs,
    ) -> Result<Self> {
        let design_path = design_args
            .save_design
            .clone()
            .or_else(|| design_args.design.clone())
            .or_else(LabelDesign::default_path);

        Ok(AppConfig {
            csv_options: input.csv_options()?,
            csv_path: input.csv,
            output,
            refresh_interval_secs: interval.max(1),
            sheet: sheet.options()?,
            design_args,
            design_path,
        })
    }
}
