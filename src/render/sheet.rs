//! Placement of labels on printable pages.
//!
//! Labels are laid out on a fixed grid, left to right and top to bottom,
//! with the same margin around the page edge and between labels. A new page
//! starts only when the grid is full.

use std::str::FromStr;

use tracing::debug;

use super::layout::{Point, MM};
use crate::error::{LabelError, Result};

pub const DEFAULT_MARGIN_MM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Portrait width and height in points
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0 * MM, 297.0 * MM),
            PageSize::Letter => (612.0, 792.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(format!("unknown page size {other:?} (expected a4 or letter)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Portrait, falling back to landscape when a label does not fit
    #[default]
    Auto,
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Orientation::Auto),
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "unknown orientation {other:?} (expected auto, portrait or landscape)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetOptions {
    pub page: PageSize,
    pub orientation: Orientation,
    pub margin_mm: f64,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            page: PageSize::A4,
            orientation: Orientation::Auto,
            margin_mm: DEFAULT_MARGIN_MM,
        }
    }
}

/// Where every label goes: one list of bottom-left corners per page
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub page_width: f64,
    pub page_height: f64,
    pub columns: usize,
    pub rows: usize,
    pub pages: Vec<Vec<Point>>,
}

/// Labels that fit along one page dimension
fn fit_count(page_len: f64, label_len: f64, margin: f64) -> usize {
    let count = ((page_len - margin) / (label_len + margin)).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

impl SheetPlan {
    /// Plan `count` labels of `label_w` x `label_h` points
    pub fn new(count: usize, label_w: f64, label_h: f64, options: SheetOptions) -> Result<Self> {
        let margin = options.margin_mm * MM;
        let (portrait_w, portrait_h) = options.page.dimensions();

        let candidates: &[(f64, f64)] = match options.orientation {
            Orientation::Portrait => &[(portrait_w, portrait_h)],
            Orientation::Landscape => &[(portrait_h, portrait_w)],
            Orientation::Auto => &[(portrait_w, portrait_h), (portrait_h, portrait_w)],
        };

        let (page_width, page_height, columns, rows) = candidates
            .iter()
            .map(|&(w, h)| (w, h, fit_count(w, label_w, margin), fit_count(h, label_h, margin)))
            .find(|&(_, _, cols, rows)| cols > 0 && rows > 0)
            .ok_or_else(|| LabelError::LayoutOverflow {
                width_mm: (label_w / MM * 100.0).round() / 100.0,
                height_mm: (label_h / MM * 100.0).round() / 100.0,
                page: options.page.name().to_string(),
            })?;

        let per_page = columns * rows;
        let mut pages: Vec<Vec<Point>> = Vec::with_capacity(count.div_ceil(per_page));
        for idx in 0..count {
            let slot = idx % per_page;
            if slot == 0 {
                pages.push(Vec::with_capacity(per_page.min(count - idx)));
            }
            let (row, col) = (slot / columns, slot % columns);
            let origin = Point::new(
                margin + col as f64 * (label_w + margin),
                page_height - margin - label_h - row as f64 * (label_h + margin),
            );
            if let Some(page) = pages.last_mut() {
                page.push(origin);
            }
        }

        debug!(
            labels = count,
            pages = pages.len(),
            columns,
            rows,
            landscape = page_width > page_height,
            "Planned label sheet"
        );

        Ok(SheetPlan {
            page_width,
            page_height,
            columns,
            rows,
            pages,
        })
    }

    pub fn per_page(&self) -> usize {
        self.columns * self.rows
    }

    pub fn label_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(count: usize, w_mm: f64, h_mm: f64, options: SheetOptions) -> Result<SheetPlan> {
        SheetPlan::new(count, w_mm * MM, h_mm * MM, options)
    }

    #[test]
    fn test_standard_labels_on_a4() {
        let sheet = plan(30, 70.0, 35.0, SheetOptions::default()).unwrap();
        assert_eq!((sheet.columns, sheet.rows), (2, 7));
        assert_eq!(sheet.per_page(), 14);
        assert_eq!(sheet.pages.len(), 3);
        assert_eq!(sheet.pages[2].len(), 2);
        assert_eq!(sheet.label_count(), 30);
    }

    #[test]
    fn test_every_record_gets_a_label() {
        for count in [1, 13, 14, 15, 28, 101] {
            let sheet = plan(count, 70.0, 35.0, SheetOptions::default()).unwrap();
            assert_eq!(sheet.label_count(), count);
            assert_eq!(sheet.pages.len(), count.div_ceil(14));
        }
    }

    #[test]
    fn test_zero_labels_has_no_pages() {
        let sheet = plan(0, 70.0, 35.0, SheetOptions::default()).unwrap();
        assert!(sheet.pages.is_empty());
    }

    #[test]
    fn test_grid_fills_rows_first() {
        let sheet = plan(3, 70.0, 35.0, SheetOptions::default()).unwrap();
        let margin = DEFAULT_MARGIN_MM * MM;
        let page = &sheet.pages[0];

        assert!((page[0].x - margin).abs() < 1e-9);
        assert!((page[0].y - (sheet.page_height - margin - 35.0 * MM)).abs() < 1e-9);
        assert!((page[1].x - (2.0 * margin + 70.0 * MM)).abs() < 1e-9);
        assert_eq!(page[1].y, page[0].y);
        assert_eq!(page[2].x, page[0].x);
        assert!((page[0].y - page[2].y - (35.0 * MM + margin)).abs() < 1e-9);
    }

    #[test]
    fn test_labels_stay_inside_page() {
        let sheet = plan(40, 51.0, 51.0, SheetOptions::default()).unwrap();
        for origin in sheet.pages.iter().flatten() {
            assert!(origin.x >= 0.0 && origin.y >= 0.0);
            assert!(origin.x + 51.0 * MM <= sheet.page_width);
            assert!(origin.y + 51.0 * MM <= sheet.page_height);
        }
    }

    #[test]
    fn test_wide_label_switches_to_landscape() {
        let sheet = plan(7, 254.0, 25.0, SheetOptions::default()).unwrap();
        assert!(sheet.page_width > sheet.page_height);
        assert_eq!(sheet.columns, 1);
        assert_eq!(sheet.rows, 6);
        assert_eq!(sheet.pages.len(), 2);
    }

    #[test]
    fn test_forced_portrait_overflows() {
        let options = SheetOptions {
            orientation: Orientation::Portrait,
            ..SheetOptions::default()
        };
        let err = plan(1, 254.0, 25.0, options).unwrap_err();
        assert!(matches!(
            err,
            LabelError::LayoutOverflow { width_mm, .. } if width_mm == 254.0
        ));
    }

    #[test]
    fn test_label_larger_than_page_overflows() {
        assert!(matches!(
            plan(1, 300.0, 300.0, SheetOptions::default()),
            Err(LabelError::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn test_letter_page() {
        let options = SheetOptions {
            page: PageSize::Letter,
            ..SheetOptions::default()
        };
        let sheet = plan(1, 70.0, 35.0, options).unwrap();
        assert_eq!((sheet.page_width, sheet.page_height), (612.0, 792.0));
    }

    #[test]
    fn test_parse_page_options() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!("letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("a3".parse::<PageSize>().is_err());
        assert_eq!(
            "Landscape".parse::<Orientation>().unwrap(),
            Orientation::Landscape
        );
    }
}
