//! Bitmap text for element rendering.
//!
//! Uses the Spleen bitmap font family. Glyphs are decoded once into
//! process-wide tables and scaled with nearest neighbor to the requested
//! pixel size, so identical input always yields identical pixels.
//!
//! Cells are half as wide as they are tall, so a 16 px font advances 8 px.

use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::sync::OnceLock;

use super::color::Color;
use super::surface::Surface;

/// Largest cell height drawn. Bigger font sizes clamp to it.
pub const MAX_FONT_SIZE: f32 = 8192.0;

/// One decoded Spleen face.
struct Face {
    width: usize,
    height: usize,
    glyphs: HashMap<char, Vec<bool>>,
}

/// Characters decoded into each face: printable ASCII and Latin-1/Extended-A.
fn charset() -> impl Iterator<Item = char> {
    (0x20u32..=0x7E).chain(0xA0..=0x17F).filter_map(char::from_u32)
}

impl Face {
    fn load(data: &'static [u8], width: usize, height: usize) -> Face {
        let mut glyphs = HashMap::new();
        match PSF2Font::new(data) {
            Ok(mut font) => {
                for ch in charset() {
                    let utf8 = ch.to_string();
                    if let Some(rows) = font.glyph_for_utf8(utf8.as_bytes()) {
                        let mut bitmap = vec![false; width * height];
                        for (row_y, row) in rows.enumerate() {
                            for (col_x, on) in row.enumerate() {
                                if row_y < height && col_x < width {
                                    bitmap[row_y * width + col_x] = on;
                                }
                            }
                        }
                        glyphs.insert(ch, bitmap);
                    }
                }
            }
            Err(_) => tracing::warn!(width, height, "bitmap font failed to load, drawing boxes"),
        }
        Face {
            width,
            height,
            glyphs,
        }
    }

    fn small() -> &'static Face {
        static FACE: OnceLock<Face> = OnceLock::new();
        FACE.get_or_init(|| Face::load(FONT_6X12, 6, 12))
    }

    fn large() -> &'static Face {
        static FACE: OnceLock<Face> = OnceLock::new();
        FACE.get_or_init(|| Face::load(FONT_12X24, 12, 24))
    }

    /// The face whose native size is closest to `cell_height`.
    fn for_height(cell_height: usize) -> &'static Face {
        if cell_height <= 16 {
            Self::small()
        } else {
            Self::large()
        }
    }
}

/// How a run of text is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels (cell height).
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            bold: false,
            color,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Cell size `(width, height)` in whole pixels, from 1×2 up to
    /// [`MAX_FONT_SIZE`].
    pub fn cell(&self) -> (usize, usize) {
        let size = if self.size.is_finite() {
            self.size.clamp(0.0, MAX_FONT_SIZE)
        } else {
            0.0
        };
        let height = (size.round() as usize).max(2);
        (height / 2, height)
    }
}

/// Rendered width of `text` in pixels.
pub fn measure(text: &str, style: &TextStyle) -> usize {
    let (cell_w, _) = style.cell();
    let extra = usize::from(style.bold && !text.is_empty());
    text.chars()
        .count()
        .saturating_mul(cell_w)
        .saturating_add(extra)
}

/// Draw a single line of text with its top-left at `(x, y)`.
///
/// Characters outside the embedded tables draw as an outlined box. Bold
/// repeats each glyph one pixel to the right. Only the part of each cell
/// that lands on the surface is visited, so oversized text costs no more
/// than the surface it covers.
pub fn draw_text(surface: &mut Surface, text: &str, x: i64, y: i64, style: &TextStyle) {
    let (cell_w, cell_h) = style.cell();
    let face = Face::for_height(cell_h);
    let (cw, ch) = (cell_w as i64, cell_h as i64);
    let (sw, sh) = (surface.width() as i64, surface.height() as i64);
    let spill = i64::from(style.bold);

    // visible rows of every cell on this line
    let dy0 = y.saturating_neg().clamp(0, ch);
    let dy1 = sh.saturating_sub(y).clamp(0, ch);
    if dy0 >= dy1 {
        return;
    }

    let mut cursor_x = x;
    for c in text.chars() {
        if cursor_x >= sw {
            break;
        }
        if !c.is_whitespace() && cursor_x.saturating_add(cw + spill) > 0 {
            let glyph = face.glyphs.get(&c);
            let dx0 = cursor_x.saturating_add(spill).saturating_neg().clamp(0, cw);
            let dx1 = sw.saturating_sub(cursor_x).clamp(0, cw);
            for dy in dy0..dy1 {
                for dx in dx0..dx1 {
                    let on = match glyph {
                        Some(bitmap) => {
                            let sx = dx as usize * face.width / cell_w;
                            let sy = dy as usize * face.height / cell_h;
                            bitmap[sy * face.width + sx]
                        }
                        None => dx == 0 || dy == 0 || dx + 1 == cw || dy + 1 == ch,
                    };
                    if on {
                        let px = cursor_x + dx;
                        let py = y + dy;
                        surface.blend_pixel(px, py, style.color, 1.0);
                        if style.bold {
                            surface.blend_pixel(px + 1, py, style.color, 1.0);
                        }
                    }
                }
            }
        }
        cursor_x = cursor_x.saturating_add(cw);
    }
}
