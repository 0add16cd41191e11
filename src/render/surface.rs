//! RGBA pixel surface that documents and element layers are painted onto.

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use std::path::Path;

use super::color::Color;
use super::context::Affine;
use crate::document::BorderStyle;
use crate::error::CanvasError;

/// A width × height RGBA8 raster.
///
/// Coordinates taken by the drawing methods are signed; anything outside the
/// surface is clipped.
///
/// Every draw is blended with the surface's global alpha, the way a canvas
/// applies `globalAlpha` to each fill and stroke separately.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
    global_alpha: f32,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            global_alpha: 1.0,
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.to_rgba()),
            global_alpha: 1.0,
        }
    }

    /// Set the alpha multiplier for every subsequent draw, clamped to 0.0–1.0.
    pub fn with_global_alpha(mut self, alpha: f32) -> Self {
        self.global_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| Color::from(*p))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Row-major RGBA bytes, 4 per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Source-over blend of `color` at `(x, y)`, its alpha scaled by
    /// `opacity` and the global alpha.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color, opacity: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let alpha = color.a as f32 / 255.0 * (opacity * self.global_alpha).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        if alpha >= 1.0 {
            *dst = Color { a: 255, ..color }.to_rgba();
            return;
        }

        let dst_a = dst[3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        let mix = |s: u8, d: u8| {
            let v = (s as f32 * alpha + d as f32 * dst_a * (1.0 - alpha)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = image::Rgba([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.width() as i64);
        let y1 = (y + height).min(self.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, 1.0);
            }
        }
    }

    /// Fill the whole surface.
    pub fn fill(&mut self, color: Color) {
        self.fill_rect(0, 0, self.width() as i64, self.height() as i64, color);
    }

    /// Stroke a band of `thickness` pixels along the inside edges of a rectangle.
    ///
    /// A band at least half as thick as the rectangle fills it entirely.
    #[allow(clippy::too_many_arguments)]
    pub fn stroke_rect(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        thickness: u32,
        color: Color,
        style: BorderStyle,
    ) {
        if thickness == 0 || width <= 0 || height <= 0 || style == BorderStyle::None {
            return;
        }
        let t = thickness as i64;
        if t * 2 >= width || t * 2 >= height {
            self.fill_rect(x, y, width, height, color);
            return;
        }

        match style {
            BorderStyle::Solid | BorderStyle::None => self.stroke_band(x, y, width, height, t, color),
            BorderStyle::Double if t >= 3 => {
                let line = t / 3;
                self.stroke_band(x, y, width, height, line, color);
                let inset = t - line;
                self.stroke_band(x + inset, y + inset, width - 2 * inset, height - 2 * inset, line, color);
            }
            BorderStyle::Double => self.stroke_band(x, y, width, height, t, color),
            BorderStyle::Dashed => self.stroke_pattern(x, y, width, height, t, 3 * t, 2 * t, color),
            BorderStyle::Dotted => self.stroke_pattern(x, y, width, height, t, t, t, color),
        }
    }

    /// Solid band. Vertical edges stop short of the corners so no pixel is blended twice.
    fn stroke_band(&mut self, x: i64, y: i64, width: i64, height: i64, t: i64, color: Color) {
        self.fill_rect(x, y, width, t, color);
        self.fill_rect(x, y + height - t, width, t, color);
        self.fill_rect(x, y + t, t, height - 2 * t, color);
        self.fill_rect(x + width - t, y + t, t, height - 2 * t, color);
    }

    /// Band broken into `on`/`off` runs along each edge.
    #[allow(clippy::too_many_arguments)]
    fn stroke_pattern(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        t: i64,
        on: i64,
        off: i64,
        color: Color,
    ) {
        let period = (on + off).max(1) as usize;
        for s in (0..width).step_by(period) {
            let run = on.min(width - s);
            self.fill_rect(x + s, y, run, t, color);
            self.fill_rect(x + s, y + height - t, run, t, color);
        }
        let inner = height - 2 * t;
        for s in (0..inner).step_by(period) {
            let run = on.min(inner - s);
            self.fill_rect(x, y + t + s, t, run, color);
            self.fill_rect(x + width - t, y + t + s, t, run, color);
        }
    }

    /// Blend an image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, img: &RgbaImage, x: i64, y: i64) {
        for (ix, iy, p) in img.enumerate_pixels() {
            self.blend_pixel(x + ix as i64, y + iy as i64, Color::from(*p), 1.0);
        }
    }

    /// Composite an element layer mapped through `transform`.
    ///
    /// Every surface pixel whose center falls inside the transformed layer
    /// takes the layer pixel under it (nearest sample), blended source-over.
    /// Layer pixels already carry the layer's global alpha. A degenerate
    /// transform draws nothing.
    pub fn composite(&mut self, layer: &Surface, transform: &Affine) {
        if layer.width() == 0 || layer.height() == 0 {
            return;
        }
        let Some(inverse) = transform.invert() else {
            return;
        };

        let lw = layer.width() as f32;
        let lh = layer.height() as f32;
        let (min_x, min_y, max_x, max_y) = transform.bounds(lw, lh);
        let x0 = (min_x.floor() as i64).max(0);
        let y0 = (min_y.floor() as i64).max(0);
        let x1 = (max_x.ceil() as i64).min(self.width() as i64);
        let y1 = (max_y.ceil() as i64).min(self.height() as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                if u < 0.0 || v < 0.0 || u >= lw || v >= lh {
                    continue;
                }
                let src = Color::from(*layer.image.get_pixel(u as u32, v as u32));
                if src.a == 0 {
                    continue;
                }
                self.blend_pixel(px, py, src, 1.0);
            }
        }
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut png_bytes = Vec::new();
        let encoder = PngEncoder::new(&mut png_bytes);
        encoder.write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(png_bytes)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), CanvasError> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}
