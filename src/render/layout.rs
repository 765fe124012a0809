//! Geometry of a single label.
//!
//! A label is laid out once into backend-neutral [`Primitive`]s in PDF
//! points (origin bottom-left, y up). The PDF writer and the terminal
//! preview both draw from the same primitives.

use crate::data::Record;
use crate::design::LabelDesign;
use crate::error::{ColumnRole, LabelError, Result};

use super::font::{string_width, Font};
use super::qr::QrMatrix;

/// Points per millimetre
pub const MM: f64 = 72.0 / 25.4;

/// Inner padding between the label edge and its content
pub const LABEL_PADDING_MM: f64 = 4.0;
/// Gap between the QR code and the text block
pub const TEXT_GAP_MM: f64 = 4.0;
/// Gap between the side strip's column name and its value bar
pub const SIDE_GAP_MM: f64 = 1.0;

pub const TEXT_SIZE_PT: f64 = 7.0;
pub const SIDE_TEXT_SIZE_PT: f64 = 6.0;
pub const BORDER_WIDTH_PT: f64 = 0.5;
/// Height of the black bar behind a highlighted value and its drop below the baseline
const HIGHLIGHT_BAR_HEIGHT_PT: f64 = 8.0;
const HIGHLIGHT_BAR_DROP_PT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle; `(x, y)` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }
}

/// Device RGB colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const LIGHT_GREY: Rgb = Rgb(0.827, 0.827, 0.827);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Rgb),
    Stroke { color: Rgb, width: f64 },
}

/// Horizontal alignment of a text run relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
    pub size: f64,
    pub color: Rgb,
    pub anchor: Point,
    pub align: Align,
    /// Rotated 90° counter-clockwise around the anchor (reads bottom to top)
    pub rotated: bool,
}

impl TextRun {
    pub fn width(&self) -> f64 {
        string_width(&self.text, self.font, self.size)
    }

    /// Distance from the anchor back to the start of the baseline
    pub fn align_offset(&self) -> f64 {
        match self.align {
            Align::Center => self.width() / 2.0,
            Align::Right => self.width(),
        }
    }

    /// Start of the baseline in page coordinates
    pub fn start(&self) -> Point {
        let offset = self.align_offset();
        if self.rotated {
            Point::new(self.anchor.x, self.anchor.y - offset)
        } else {
            Point::new(self.anchor.x - offset, self.anchor.y)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect { rect: Rect, paint: Paint },
    Text(TextRun),
    Qr { rect: Rect, matrix: QrMatrix },
}

/// All primitives of one label, in drawing order
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub bounds: Rect,
    pub primitives: Vec<Primitive>,
}

#[cfg(test)]
impl LabelLayout {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn has_qr(&self) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::Qr { .. }))
    }
}

fn cell<'r>(record: &'r Record, column: &str, role: ColumnRole) -> Result<&'r str> {
    record.get(column).ok_or_else(|| LabelError::UnknownColumn {
        column: column.to_string(),
        role,
    })
}

/// Lay out one record's label with its bottom-left corner at `origin`
pub fn layout_label(record: &Record, design: &LabelDesign, origin: Point) -> Result<LabelLayout> {
    let Point { x, y } = origin;
    let label_w = design.width_mm * MM;
    let label_h = design.height_mm * MM;
    let pad = LABEL_PADDING_MM * MM;
    let bounds = Rect::new(x, y, label_w, label_h);
    let mut primitives = Vec::new();

    if design.show_border {
        primitives.push(Primitive::Rect {
            rect: bounds,
            paint: Paint::Stroke {
                color: Rgb::LIGHT_GREY,
                width: BORDER_WIDTH_PT,
            },
        });
    }

    let row_count = design.shown_columns().len().max(1);
    let row_height = ((label_h - 2.0 * pad) / row_count as f64) * design.row_height_factor;
    let first_baseline = y + label_h - pad - row_height * 0.1;

    let mut strip_width = 0.0;
    if let (true, Some(column)) = (
        design.highlight.side_strip_active(),
        design.highlight.column.as_deref(),
    ) {
        strip_width = label_w * design.highlight.sidebar_factor;
        let value = cell(record, column, ColumnRole::Highlight)?;
        side_strip(
            &mut primitives,
            column,
            value,
            design.highlight.padding_pt,
            Rect::new(x, y, strip_width, label_h),
        );
    }

    let text_x = if design.qr.enabled {
        let column = design.qr.column.as_deref().ok_or_else(|| {
            LabelError::InvalidDesign("QR code is enabled but no QR column is set".into())
        })?;
        let value = cell(record, column, ColumnRole::Qr)?;
        let qr_size = design.qr.size_mm * MM;
        let qr_x = x + strip_width + design.qr.left_offset_mm * MM;
        let qr_y = y + (label_h - qr_size) / 2.0;
        primitives.push(Primitive::Qr {
            rect: Rect::new(qr_x, qr_y, qr_size, qr_size),
            matrix: QrMatrix::encode(value)?,
        });
        qr_x + qr_size + TEXT_GAP_MM * MM
    } else {
        x + strip_width + pad
    };

    let available = label_w - (text_x - x) - pad;
    let name_x = text_x + available / 3.0;
    let value_x = text_x + available * 2.0 / 3.0;

    for (idx, column) in design.shown_columns().iter().enumerate() {
        let value = cell(record, column, ColumnRole::Visible)?;
        let baseline = first_baseline - idx as f64 * row_height;

        if design.show_column_names {
            primitives.push(Primitive::Text(TextRun {
                text: format!("{column}:"),
                font: Font::Oblique,
                size: TEXT_SIZE_PT,
                color: Rgb::BLACK,
                anchor: Point::new(name_x, baseline),
                align: Align::Right,
                rotated: false,
            }));
        }

        let highlighted = design.highlight.column.as_deref() == Some(column.as_str());
        if highlighted {
            let bar_width =
                string_width(value, Font::Bold, TEXT_SIZE_PT) + design.highlight.padding_pt;
            primitives.push(Primitive::Rect {
                rect: Rect::new(
                    value_x - bar_width / 2.0,
                    baseline - HIGHLIGHT_BAR_DROP_PT,
                    bar_width,
                    HIGHLIGHT_BAR_HEIGHT_PT,
                ),
                paint: Paint::Fill(Rgb::BLACK),
            });
        }

        primitives.push(Primitive::Text(TextRun {
            text: value.to_string(),
            font: if highlighted { Font::Bold } else { Font::Regular },
            size: TEXT_SIZE_PT,
            color: if highlighted { Rgb::WHITE } else { Rgb::BLACK },
            anchor: Point::new(value_x, baseline),
            align: Align::Center,
            rotated: false,
        }));
    }

    Ok(LabelLayout { bounds, primitives })
}

/// Rotated `name:` followed by the value on a black bar, centred vertically in `strip`
fn side_strip(
    primitives: &mut Vec<Primitive>,
    column: &str,
    value: &str,
    padding: f64,
    strip: Rect,
) {
    let name = format!("{column}:");
    let name_len = string_width(&name, Font::Oblique, SIDE_TEXT_SIZE_PT);
    let value_len = string_width(value, Font::Bold, SIDE_TEXT_SIZE_PT) + padding;
    let gap = SIDE_GAP_MM * MM;
    let bottom = strip.y + (strip.height - (name_len + gap + value_len)) / 2.0;
    let center_x = strip.x + strip.width / 2.0;

    primitives.push(Primitive::Text(TextRun {
        text: name,
        font: Font::Oblique,
        size: SIDE_TEXT_SIZE_PT,
        color: Rgb::BLACK,
        anchor: Point::new(center_x, bottom + name_len / 2.0),
        align: Align::Center,
        rotated: true,
    }));

    let bar_y = bottom + name_len + gap;
    primitives.push(Primitive::Rect {
        rect: Rect::new(strip.x, bar_y, strip.width, value_len),
        paint: Paint::Fill(Rgb::BLACK),
    });
    primitives.push(Primitive::Text(TextRun {
        text: value.to_string(),
        font: Font::Bold,
        size: SIDE_TEXT_SIZE_PT,
        color: Rgb::WHITE,
        anchor: Point::new(center_x, bar_y + value_len / 2.0),
        align: Align::Center,
        rotated: true,
    }));
}
