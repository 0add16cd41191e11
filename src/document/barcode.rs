//! Paint logic for the QrCode element.

use image::imageops::FilterType;
use tracing::warn;

use super::graphics::{paint_label, paint_picture, stroke_frame};
use super::resolve::AssetResolver;
use super::types::{QrCode, Styling};
use crate::render::color::Color;
use crate::render::surface::Surface;

/// Frame width of the QR placeholder box. Not affected by styling.
const PLACEHOLDER_FRAME: u32 = 2;

impl QrCode {
    /// Paint the producer's bitmap scaled to the element box, or a placeholder.
    ///
    /// Modules are scaled with nearest neighbor so edges stay sharp.
    pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, assets: &AssetResolver) {
        match assets.qr_code(&self.payload) {
            Some(Ok(img)) => paint_picture(layer, &img, FilterType::Nearest),
            Some(Err(e)) => {
                warn!(error = %e, "drawing QR placeholder");
                self.paint_placeholder(styling, layer);
            }
            None => self.paint_placeholder(styling, layer),
        }
    }

    fn paint_placeholder(&self, styling: &Styling, layer: &mut Surface) {
        layer.fill(styling.background_color.unwrap_or(Color::WHITE));
        stroke_frame(
            layer,
            PLACEHOLDER_FRAME,
            styling.border_color.unwrap_or(Color::BLACK),
        );
        paint_label(layer, "[QR Code]");
    }
}
