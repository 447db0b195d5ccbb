// Page composition: one A4 sheet per entrance, boxes in two columns,
// entrance label at top and bottom.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::*;

use crate::error::{AppError, Result};
use crate::ident::Side;
use crate::layout::{self, LayoutConfig};
use crate::slots::DisplayBox;

pub struct PageComposer {
    doc: PdfDocumentReference,
    // Page handed out by PdfDocument::new, consumed by the first sheet.
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    font_body: IndirectFontRef,
    font_header: IndirectFontRef,
    cfg: LayoutConfig,
    pages: usize,
}

impl PageComposer {
    pub fn new(cfg: LayoutConfig) -> Result<Self> {
        let (doc, page1, layer1) = PdfDocument::new(
            "Intercom panels",
            Mm(cfg.page_width_mm),
            Mm(cfg.page_height_mm),
            "Layer 1",
        );
        let font_body = doc
            .add_builtin_font(BuiltinFont::TimesBold)
            .map_err(|e| AppError::Pdf(e.to_string()))?;
        let font_header = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Pdf(e.to_string()))?;

        Ok(Self {
            doc,
            first_page: Some((page1, layer1)),
            font_body,
            font_header,
            cfg,
            pages: 0,
        })
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Render one sheet for an entrance. An empty box list still produces
    /// a labeled sheet (used for the unknown-entrance placeholder).
    pub fn add_entrance_page(&mut self, entrance: &str, boxes: &[DisplayBox]) {
        let layer = match self.first_page.take() {
            Some((page, layer)) => self.doc.get_page(page).get_layer(layer),
            None => {
                let (page, layer) = self.doc.add_page(
                    Mm(self.cfg.page_width_mm),
                    Mm(self.cfg.page_height_mm),
                    "Layer 1",
                );
                self.doc.get_page(page).get_layer(layer)
            }
        };
        self.pages += 1;

        let cfg = &self.cfg;
        let label = format!("Oppgang {entrance}");
        let header_h = layout::pt_to_mm(cfg.header_font_pt) + cfg.header_gap_mm;

        self.draw_header(
            &layer,
            &label,
            cfg.page_height_mm - cfg.page_margin_mm - layout::pt_to_mm(cfg.header_font_pt),
        );
        self.draw_header(&layer, &label, cfg.page_margin_mm);

        let total_cols_w = 2.0 * cfg.box_w_mm + cfg.column_gap_mm;
        let inner_w = cfg.page_width_mm - 2.0 * cfg.page_margin_mm;
        let x_left = cfg.page_margin_mm + ((inner_w - total_cols_w) / 2.0).max(0.0);
        let x_right = x_left + cfg.box_w_mm + cfg.column_gap_mm;

        let y_top = cfg.page_height_mm - cfg.page_margin_mm - header_h;
        let y_reserved = cfg.page_margin_mm + header_h;

        let (left, right) = split_columns(boxes);
        self.draw_column(&layer, &left, x_left, y_top, y_reserved);
        self.draw_column(&layer, &right, x_right, y_top, y_reserved);
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| AppError::Pdf(e.to_string()))?;
        Ok(())
    }

    fn draw_header(&self, layer: &PdfLayerReference, text: &str, baseline_mm: f32) {
        let w_mm = layout::pt_to_mm(layout::string_width_pt(text, self.cfg.header_font_pt));
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.use_text(
            text,
            self.cfg.header_font_pt,
            Mm((self.cfg.page_width_mm - w_mm) / 2.0),
            Mm(baseline_mm),
            &self.font_header,
        );
    }

    /// Stack a column's boxes downward from `y_top`; a box that would
    /// cross into the bottom header reservation is not drawn.
    fn draw_column(
        &self,
        layer: &PdfLayerReference,
        boxes: &[&DisplayBox],
        x: f32,
        y_top: f32,
        y_reserved: f32,
    ) {
        let cfg = &self.cfg;
        let mut y_cursor = y_top;
        for b in boxes {
            let (top_y, bottom_y) = (y_cursor, y_cursor - cfg.box_h_mm);
            if bottom_y < y_reserved {
                break;
            }
            self.draw_box_frame(layer, x, bottom_y);
            self.draw_box_lines(layer, b, x, top_y, bottom_y);
            y_cursor = bottom_y - cfg.box_v_gap_mm;
        }
    }

    fn draw_box_frame(&self, layer: &PdfLayerReference, x: f32, y: f32) {
        let (w, h) = (self.cfg.box_w_mm, self.cfg.box_h_mm);
        layer.set_outline_color(Color::Rgb(Rgb::new(0.9, 0.9, 0.9, None)));
        layer.set_outline_thickness(0.5);
        let points = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ];
        layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    fn draw_box_lines(
        &self,
        layer: &PdfLayerReference,
        b: &DisplayBox,
        x: f32,
        top_y: f32,
        bottom_y: f32,
    ) {
        let cfg = &self.cfg;
        let content_left = x + cfg.inner_pad_mm;
        let content_right = x + cfg.box_w_mm - cfg.inner_pad_mm;
        let content_width_mm = content_right - content_left;
        let x_center = (content_left + content_right) / 2.0;

        // Baselines live in a band inset from the frame far enough that a
        // full-size line stays inside the box even with zero padding.
        let clearance = layout::pt_to_mm(cfg.body_font_max_pt) * 0.6;
        let mut band_top = top_y - cfg.top_inner_margin_mm - clearance;
        let mut band_bottom = bottom_y + cfg.bot_inner_margin_mm + clearance;
        if band_bottom >= band_top {
            let mid = (top_y + bottom_y) / 2.0;
            band_top = mid + 5.0;
            band_bottom = mid - 5.0;
        }
        let step = (band_top - band_bottom) / (b.lines.len() - 1) as f32;

        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        for (i, slot) in b.lines.iter().enumerate() {
            let Some(text) = slot else { continue };
            let baseline = band_top - i as f32 * step;
            let (size_pt, x_scale) = layout::fit_line(
                text,
                cfg.body_font_max_pt,
                cfg.body_font_min_pt,
                layout::mm_to_pt(content_width_mm),
            );
            // Baseline sits a fraction of the size below the band line.
            let y_text = baseline - layout::pt_to_mm(size_pt) * 0.35;
            let w_mm = layout::pt_to_mm(layout::string_width_pt(text, size_pt));

            if x_scale >= 1.0 {
                layer.use_text(
                    text,
                    size_pt,
                    Mm(x_center - w_mm / 2.0),
                    Mm(y_text),
                    &self.font_body,
                );
            } else {
                // Too wide even at the minimum size: squeeze horizontally
                // through the text matrix rather than truncate the name.
                let tx = layout::mm_to_pt(x_center - (w_mm * x_scale) / 2.0);
                let ty = layout::mm_to_pt(y_text);
                layer.begin_text_section();
                layer.set_font(&self.font_body, size_pt);
                layer.set_text_matrix(TextMatrix::Raw([x_scale, 0.0, 0.0, 1.0, tx, ty]));
                layer.write_text(text, &self.font_body);
                layer.end_text_section();
            }
        }
    }
}

/// Split boxes into left/right columns, each ordered top band first.
fn split_columns(boxes: &[DisplayBox]) -> (Vec<&DisplayBox>, Vec<&DisplayBox>) {
    let mut left: Vec<&DisplayBox> = boxes.iter().filter(|b| b.column == Side::Left).collect();
    let mut right: Vec<&DisplayBox> = boxes.iter().filter(|b| b.column == Side::Right).collect();
    left.sort_by_key(|b| b.order);
    right.sort_by_key(|b| b.order);
    (left, right)
}
