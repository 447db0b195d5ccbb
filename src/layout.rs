// Layout constants and text fitting, independent of the PDF backend.

const PT_PER_MM: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

/// Fixed page geometry and typography for the panel sheets.
///
/// These are print-shop parameters, not user input; the defaults match the
/// physical panel frames the sheets are cut for.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub page_margin_mm: f32,
    pub column_gap_mm: f32,
    pub box_w_mm: f32,
    pub box_h_mm: f32,
    pub box_v_gap_mm: f32,
    pub inner_pad_mm: f32,
    pub top_inner_margin_mm: f32,
    pub bot_inner_margin_mm: f32,
    /// Preferred and minimum size for panel lines, points.
    pub body_font_max_pt: f32,
    pub body_font_min_pt: f32,
    pub header_font_pt: f32,
    pub header_gap_mm: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            page_margin_mm: 15.0,
            column_gap_mm: 14.0,
            box_w_mm: 62.0,
            box_h_mm: 76.0,
            box_v_gap_mm: 16.0,
            inner_pad_mm: 2.0,
            top_inner_margin_mm: 6.0,
            bot_inner_margin_mm: 6.0,
            body_font_max_pt: 16.0,
            body_font_min_pt: 14.0,
            header_font_pt: 12.0,
            header_gap_mm: 4.0,
        }
    }
}

/// Pick a font size and horizontal scale so `text` fits `max_width_pt`.
///
/// Steps the size down from `max_pt` in half-point increments until the
/// estimated width fits or `min_pt` is reached; a string still too wide at
/// the minimum size gets squeezed horizontally instead of truncated, so
/// long double names stay legible on the panel.
pub fn fit_line(text: &str, max_pt: f32, min_pt: f32, max_width_pt: f32) -> (f32, f32) {
    let mut size = max_pt;
    while size > min_pt && string_width_pt(text, size) > max_width_pt {
        size -= 0.5;
    }
    let width = string_width_pt(text, size);
    if width <= max_width_pt {
        (size, 1.0)
    } else {
        (size, max_width_pt / width)
    }
}

/// Estimated advance width of `text` at `font_pt`, in points.
pub fn string_width_pt(text: &str, font_pt: f32) -> f32 {
    text.chars().map(char_em).sum::<f32>() * font_pt
}

/// Coarse per-character advance width in em units.
///
/// The built-in PDF fonts expose no metrics here, so fitting decisions use
/// bucketed estimates leaning on the bold serif widths. Panel lines are
/// short uppercased names, where the buckets are accurate enough.
fn char_em(c: char) -> f32 {
    match c {
        'I' | 'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.39,
        ' ' | '(' | ')' | '-' | '/' | 'f' | 't' | 'r' | 's' | 'J' => 0.47,
        'M' | 'W' | 'm' => 0.95,
        'w' => 0.75,
        '0'..='9' => 0.50,
        c if c.is_lowercase() => 0.56,
        _ => 0.72,
    }
}
