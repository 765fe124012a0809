//! Terminal preview of a single label, drawn from the same layout as the PDF.

use ratatui::{
    layout::Rect as Area,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Points, Rectangle},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use super::theme::Theme;
use crate::render::{LabelLayout, Paint, Primitive, Rect, TextRun};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;
/// Blank space kept around the label, in points
const FRAME_MARGIN_PT: f64 = 4.0;

pub struct LabelPreview<'a> {
    layout: &'a Result<LabelLayout, String>,
    title: String,
    theme: &'a Theme,
}

impl<'a> LabelPreview<'a> {
    pub fn new(layout: &'a Result<LabelLayout, String>, title: String, theme: &'a Theme) -> Self {
        LabelPreview {
            layout,
            title,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Area) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let layout = match self.layout {
            Ok(layout) => layout,
            Err(message) => {
                let paragraph = Paragraph::new(Span::styled(
                    format!("Cannot lay out label: {message}"),
                    self.theme.error_style(),
                ))
                .block(block)
                .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, area);
                return;
            }
        };

        let inner = block.inner(area);
        if inner.width == 0 || inner.height == 0 {
            frame.render_widget(block, area);
            return;
        }

        let view = Viewport::fit(layout.bounds, inner);
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .background_color(self.theme.bg)
            .x_bounds(view.x_bounds)
            .y_bounds(view.y_bounds)
            .paint(|ctx| {
                for primitive in &layout.primitives {
                    self.draw_primitive(ctx, primitive, &view);
                }
            });

        frame.render_widget(canvas, area);
    }

    fn draw_primitive(&self, ctx: &mut Context, primitive: &Primitive, view: &Viewport) {
        match primitive {
            Primitive::Rect {
                rect,
                paint: Paint::Stroke { .. },
            } => {
                ctx.draw(&Rectangle {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    color: self.theme.outline,
                });
            }
            Primitive::Rect {
                rect,
                paint: Paint::Fill(_),
            } => {
                let coords = fill_points(rect, view.dot_width, view.dot_height);
                ctx.draw(&Points {
                    coords: &coords,
                    color: self.theme.ink,
                });
            }
            Primitive::Qr { rect, matrix } => {
                let module = rect.width / matrix.width() as f64;
                let top = rect.y + rect.height;
                let coords: Vec<(f64, f64)> = (0..matrix.width())
                    .flat_map(|row| (0..matrix.width()).map(move |col| (row, col)))
                    .filter(|&(row, col)| matrix.is_dark(row, col))
                    .map(|(row, col)| {
                        (
                            rect.x + (col as f64 + 0.5) * module,
                            top - (row as f64 + 0.5) * module,
                        )
                    })
                    .collect();
                ctx.draw(&Points {
                    coords: &coords,
                    color: self.theme.ink,
                });
            }
            Primitive::Text(run) => self.draw_text(ctx, run, view),
        }
    }

    fn draw_text(&self, ctx: &mut Context, run: &TextRun, view: &Viewport) {
        let style = self.theme.label_text_style(run.font, run.color);
        let start = run.start();
        if run.rotated {
            // One cell per character, reading upwards
            for (i, ch) in run.text.chars().enumerate() {
                ctx.print(
                    start.x,
                    start.y + i as f64 * view.cell_height,
                    Span::styled(ch.to_string(), style),
                );
            }
        } else {
            ctx.print(start.x, start.y, Span::styled(run.text.clone(), style));
        }
    }
}

/// Canvas bounds keeping the label's proportions inside a terminal area
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    /// Size of one braille dot in points
    dot_width: f64,
    dot_height: f64,
    /// Height of one terminal row in points
    cell_height: f64,
}

impl Viewport {
    fn fit(bounds: Rect, area: Area) -> Self {
        let cols = f64::from(area.width.max(1));
        let rows = f64::from(area.height.max(1));
        let width = bounds.width + 2.0 * FRAME_MARGIN_PT;
        let height = bounds.height + 2.0 * FRAME_MARGIN_PT;

        // Points per cell width; a cell is CELL_ASPECT times taller
        let scale = (width / cols).max(height / (rows * CELL_ASPECT));
        let view_width = scale * cols;
        let view_height = scale * rows * CELL_ASPECT;
        let cx = bounds.x + bounds.width / 2.0;
        let cy = bounds.y + bounds.height / 2.0;

        Viewport {
            x_bounds: [cx - view_width / 2.0, cx + view_width / 2.0],
            y_bounds: [cy - view_height / 2.0, cy + view_height / 2.0],
            dot_width: view_width / (cols * 2.0),
            dot_height: view_height / (rows * 4.0),
            cell_height: view_height / rows,
        }
    }
}

/// Dot grid covering a filled rectangle
fn fill_points(rect: &Rect, step_x: f64, step_y: f64) -> Vec<(f64, f64)> {
    let nx = (rect.width / step_x).ceil().max(1.0) as usize;
    let ny = (rect.height / step_y).ceil().max(1.0) as usize;
    let mut coords = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let x = (rect.x + (i as f64 + 0.5) * step_x).min(rect.x + rect.width);
            let y = (rect.y + (j as f64 + 0.5) * step_y).min(rect.y + rect.height);
            coords.push((x, y));
        }
    }
    coords
}
