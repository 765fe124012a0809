//! PDF export of label sheets and single labels using lopdf.
//!
//! Pages reference the three base-14 Helvetica faces through one shared
//! resource dictionary, so nothing is embedded. The writer adds no creation
//! date or file identifier: identical input produces identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, info};

use super::font::{encode_win_ansi, Font};
use super::layout::{layout_label, LabelLayout, Paint, Point, Primitive, Rect, Rgb, TextRun, MM};
use super::qr::QrMatrix;
use super::sheet::{SheetOptions, SheetPlan};
use crate::data::{Dataset, Record};
use crate::design::LabelDesign;
use crate::error::{LabelError, Result};

const PRODUCER: &str = concat!("plantid-labels ", env!("CARGO_PKG_VERSION"));

/// Render every record of `dataset` onto paginated label sheets
pub fn render_sheet(
    dataset: &Dataset,
    design: &LabelDesign,
    options: SheetOptions,
) -> Result<Vec<u8>> {
    if dataset.is_empty() {
        return Err(LabelError::EmptyDataset(dataset.source.clone()));
    }

    let plan = SheetPlan::new(
        dataset.len(),
        design.width_mm * MM,
        design.height_mm * MM,
        options,
    )?;

    let mut writer = PdfWriter::new();
    let mut records = dataset.records.iter();
    for (page_idx, origins) in plan.pages.iter().enumerate() {
        let mut ops = Vec::new();
        for (origin, record) in origins.iter().zip(records.by_ref()) {
            let layout = layout_label(record, design, *origin)?;
            draw_layout(&mut ops, &layout);
        }
        debug!(page = page_idx + 1, labels = origins.len(), "Rendered sheet page");
        writer.add_page(plan.page_width, plan.page_height, ops)?;
    }

    let bytes = writer.finish()?;
    info!(
        labels = plan.label_count(),
        per_page = plan.per_page(),
        pages = plan.pages.len(),
        bytes = bytes.len(),
        "Rendered label sheet"
    );
    Ok(bytes)
}

/// Render one record on a page exactly the size of the label
pub fn render_single(record: &Record, design: &LabelDesign) -> Result<Vec<u8>> {
    let layout = layout_label(record, design, Point::ORIGIN)?;
    let mut ops = Vec::new();
    draw_layout(&mut ops, &layout);

    let mut writer = PdfWriter::new();
    writer.add_page(layout.bounds.width, layout.bounds.height, ops)?;
    writer.finish()
}

/// Minimal page-tree builder over a lopdf document
struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        PdfWriter {
            doc,
            pages_id,
            resources_id,
            kids: Vec::new(),
        }
    }

    fn add_page(&mut self, width: f64, height: f64, operations: Vec<Operation>) -> Result<()> {
        let content = Content { operations }.encode()?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => self.resources_id,
            "MediaBox" => vec![0.into(), 0.into(), real(width), real(height)],
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn real(value: f64) -> Object {
    (value as f32).into()
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

fn rgb_operands(color: Rgb) -> Vec<Object> {
    vec![real(color.0), real(color.1), real(color.2)]
}

fn rect_operands(rect: Rect) -> Vec<Object> {
    vec![
        real(rect.x),
        real(rect.y),
        real(rect.width),
        real(rect.height),
    ]
}

/// Append the drawing operations for one label
fn draw_layout(ops: &mut Vec<Operation>, layout: &LabelLayout) {
    for primitive in &layout.primitives {
        match primitive {
            Primitive::Rect { rect, paint } => draw_rect(ops, *rect, *paint),
            Primitive::Text(run) => draw_text(ops, run),
            Primitive::Qr { rect, matrix } => draw_qr(ops, *rect, matrix),
        }
    }
}

fn draw_rect(ops: &mut Vec<Operation>, rect: Rect, paint: Paint) {
    ops.push(op("q", vec![]));
    match paint {
        Paint::Fill(color) => {
            ops.push(op("rg", rgb_operands(color)));
            ops.push(op("re", rect_operands(rect)));
            ops.push(op("f", vec![]));
        }
        Paint::Stroke { color, width } => {
            ops.push(op("RG", rgb_operands(color)));
            ops.push(op("w", vec![real(width)]));
            ops.push(op("re", rect_operands(rect)));
            ops.push(op("S", vec![]));
        }
    }
    ops.push(op("Q", vec![]));
}

fn draw_text(ops: &mut Vec<Operation>, run: &TextRun) {
    let offset = run.align_offset();
    ops.push(op("q", vec![]));
    ops.push(op("rg", rgb_operands(run.color)));
    if run.rotated {
        ops.push(op(
            "cm",
            vec![
                0.into(),
                1.into(),
                (-1).into(),
                0.into(),
                real(run.anchor.x),
                real(run.anchor.y),
            ],
        ));
    }
    ops.push(op("BT", vec![]));
    ops.push(op(
        "Tf",
        vec![
            Object::Name(run.font.resource_name().as_bytes().to_vec()),
            real(run.size),
        ],
    ));
    let (tx, ty) = if run.rotated {
        (-offset, 0.0)
    } else {
        (run.anchor.x - offset, run.anchor.y)
    };
    ops.push(op("Td", vec![real(tx), real(ty)]));
    ops.push(op(
        "Tj",
        vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(op("ET", vec![]));
    ops.push(op("Q", vec![]));
}

/// Fill dark module runs as rectangles; matrix row 0 is the top of `rect`
fn draw_qr(ops: &mut Vec<Operation>, rect: Rect, matrix: &QrMatrix) {
    let module = rect.width / matrix.width() as f64;
    ops.push(op("q", vec![]));
    ops.push(op("rg", rgb_operands(Rgb::BLACK)));
    for (row, col, len) in matrix.dark_runs() {
        let module_rect = Rect::new(
            rect.x + col as f64 * module,
            rect.y + (matrix.width() - 1 - row) as f64 * module,
            len as f64 * module,
            module,
        );
        ops.push(op("re", rect_operands(module_rect)));
    }
    ops.push(op("f", vec![]));
    ops.push(op("Q", vec![]));
}
