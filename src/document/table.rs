//! Paint logic for the Table element.

use super::graphics::{paint_label, stroke_frame};
use super::resolve::AssetResolver;
use super::types::{Styling, Table};
use crate::render::color::Color;
use crate::render::surface::Surface;

impl Table {
    /// Display label: `[Table]`, or `[Table 3x4]` when the grid size is known.
    pub fn caption(&self) -> String {
        if self.rows > 0 && self.columns > 0 {
            format!("[Table {}x{}]", self.rows, self.columns)
        } else {
            "[Table]".to_string()
        }
    }

    /// White box, 1 px frame, centered caption.
    pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, _assets: &AssetResolver) {
        layer.fill(styling.background_color.unwrap_or(Color::WHITE));
        stroke_frame(
            layer,
            styling.frame_width_px(1),
            styling.border_color.unwrap_or(Color::BLACK),
        );
        paint_label(layer, &self.caption());
    }
}
