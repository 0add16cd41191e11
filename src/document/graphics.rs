//! Paint logic for graphics elements: Image, Shape.
//!
//! Also hosts the box, frame and label helpers the other renderers share.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::{debug, warn};

use super::BorderStyle;
use super::resolve::AssetResolver;
use super::types::{Image, Shape, Styling};
use crate::render::color::Color;
use crate::render::font::{self, TextStyle};
use crate::render::surface::Surface;

/// Placeholder box fill when an image cannot be resolved.
const IMAGE_PLACEHOLDER_FILL: Color = Color::hex(0xe0e0e0);
/// Placeholder box frame when an image cannot be resolved.
const IMAGE_PLACEHOLDER_FRAME: Color = Color::hex(0x999999);
const SHAPE_FILL: Color = Color::hex(0xcccccc);

/// Label text and size for placeholder boxes.
pub(super) const LABEL_COLOR: Color = Color::hex(0x666666);
pub(super) const LABEL_SIZE: f32 = 12.0;

/// Stroke a frame along the inside edge of the whole layer.
pub(super) fn stroke_frame(layer: &mut Surface, width: u32, color: Color) {
    let (w, h) = (layer.width() as i64, layer.height() as i64);
    layer.stroke_rect(0, 0, w, h, width, color, BorderStyle::Solid);
}

/// Draw `text` centered in the layer in the placeholder label style.
pub(super) fn paint_label(layer: &mut Surface, text: &str) {
    let style = TextStyle::new(LABEL_SIZE, LABEL_COLOR);
    let (_, cell_h) = style.cell();
    let x = (layer.width() as i64 - font::measure(text, &style) as i64) / 2;
    let y = (layer.height() as i64 - cell_h as i64) / 2;
    font::draw_text(layer, text, x, y, &style);
}

/// Scale `img` to fill the layer and blend it in.
pub(super) fn paint_picture(layer: &mut Surface, img: &RgbaImage, filter: FilterType) {
    if img.dimensions() == (layer.width(), layer.height()) {
        layer.draw_image(img, 0, 0);
    } else {
        let scaled = imageops::resize(img, layer.width(), layer.height(), filter);
        layer.draw_image(&scaled, 0, 0);
    }
}

/// The bordered "image missing" box, honoring any styling overrides.
fn paint_image_placeholder(layer: &mut Surface, styling: &Styling) {
    layer.fill(styling.background_color.unwrap_or(IMAGE_PLACEHOLDER_FILL));
    stroke_frame(
        layer,
        styling.frame_width_px(1),
        styling.border_color.unwrap_or(IMAGE_PLACEHOLDER_FRAME),
    );
    paint_label(layer, "[image missing]");
}

impl Image {
    /// Paint the resolved image scaled to the element box, or a placeholder.
    ///
    /// Never fails: an unresolved source is logged and replaced.
    pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, assets: &AssetResolver) {
        let source = self
            .source_ref
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match source.map(|s| assets.image(s)) {
            Some(Ok(img)) => paint_picture(layer, img, FilterType::Lanczos3),
            Some(Err(e)) => {
                warn!(error = %e, "drawing image placeholder");
                paint_image_placeholder(layer, styling);
            }
            None => {
                debug!("image has no source, drawing placeholder");
                paint_image_placeholder(layer, styling);
            }
        }
    }
}

impl Shape {
    /// Filled rectangle, stroked when a positive border width is set.
    pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, _assets: &AssetResolver) {
        layer.fill(styling.background_color.unwrap_or(SHAPE_FILL));
        let width = styling.border_width_px(0);
        if width > 0 {
            stroke_frame(layer, width, styling.border_color.unwrap_or(Color::BLACK));
        }
    }
}
