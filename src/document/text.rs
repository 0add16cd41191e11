//! Paint logic for the Text element.

use super::graphics::stroke_frame;
use super::resolve::AssetResolver;
use super::types::{Styling, Text, TextAlign};
use crate::render::color::Color;
use crate::render::font::{self, TextStyle};
use crate::render::surface::Surface;

/// Distance from the element top to the first line.
pub const VERTICAL_PADDING: f32 = 10.0;
/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

impl Text {
    /// Content split on line breaks (`\n` or `\r\n`).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// Background, frame, then one glyph run per line.
    ///
    /// Lines start `VERTICAL_PADDING` below the element top and advance by
    /// `font_size * LINE_HEIGHT`. Anything past the element box is clipped.
    pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, _assets: &AssetResolver) {
        if let Some(background) = styling.background_color {
            layer.fill(background);
        }
        let frame = styling.border_width_px(0);
        if frame > 0 {
            stroke_frame(layer, frame, styling.border_color.unwrap_or(Color::BLACK));
        }

        let size = styling.font_size().min(font::MAX_FONT_SIZE);
        let style = TextStyle::new(size, styling.text_color.unwrap_or(Color::BLACK))
            .bold(styling.is_bold());
        let line_height = size * LINE_HEIGHT;
        let layer_w = layer.width() as i64;

        for (i, line) in self.lines().enumerate() {
            let y = (VERTICAL_PADDING + i as f32 * line_height).round() as i64;
            if y >= layer.height() as i64 {
                break;
            }
            if line.is_empty() {
                continue;
            }
            let width = i64::try_from(font::measure(line, &style)).unwrap_or(i64::MAX);
            let x = match styling.text_align() {
                TextAlign::Left => 0,
                TextAlign::Center => (layer_w - width) / 2,
                TextAlign::Right => layer_w - width,
            };
            font::draw_text(layer, line, x, y, &style);
        }
    }
}
