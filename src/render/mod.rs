//! Label rendering: per-label layout, sheet placement and PDF output.

mod font;
mod layout;
mod pdf;
mod qr;
pub mod sheet;

pub use font::Font;
pub use layout::{layout_label, LabelLayout, Paint, Point, Primitive, Rect, Rgb, TextRun};
pub use pdf::{render_sheet, render_single};
pub use sheet::{Orientation, PageSize, SheetOptions};
