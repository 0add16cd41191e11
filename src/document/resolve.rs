//! Asset resolution: decoded images and QR code bitmaps.
//!
//! `AssetResolver` handles every external-resource concern so that
//! `Document` stays a pure data model. The caller loads images up front
//! (from bytes or files) and optionally plugs in a QR producer; renderers
//! only ever look things up.

use image::RgbaImage;
use qrcode::{EcLevel, QrCode as QrMatrix};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::CanvasError;
use crate::render::color::Color;

/// Turns a QR payload into a bitmap.
///
/// The core never generates QR bits itself; it asks whatever producer the
/// caller registered. Implementations must be deterministic.
pub trait QrProducer: Send + Sync {
    fn produce(&self, payload: &str) -> Result<RgbaImage, CanvasError>;
}

/// [`QrProducer`] backed by the `qrcode` crate.
///
/// Produces one pixel per module, surrounded by a light quiet zone.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeProducer {
    pub error_level: EcLevel,
    /// Quiet zone width in modules.
    pub quiet_zone: u32,
    pub dark: Color,
    pub light: Color,
}

impl Default for QrCodeProducer {
    fn default() -> Self {
        Self {
            error_level: EcLevel::M,
            quiet_zone: 4,
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }
}

impl QrProducer for QrCodeProducer {
    fn produce(&self, payload: &str) -> Result<RgbaImage, CanvasError> {
        if payload.is_empty() {
            return Err(CanvasError::UnresolvedAsset("empty QR payload".into()));
        }
        let code = QrMatrix::with_error_correction_level(payload, self.error_level)
            .map_err(|e| CanvasError::UnresolvedAsset(format!("QR code generation failed: {}", e)))?;

        let modules = code.width();
        let quiet = self.quiet_zone as usize;
        let size = (modules + 2 * quiet) as u32;
        let mut img = RgbaImage::from_pixel(size, size, self.light.to_rgba());
        for qy in 0..modules {
            for qx in 0..modules {
                if code[(qx, qy)] == qrcode::Color::Dark {
                    img.put_pixel((qx + quiet) as u32, (qy + quiet) as u32, self.dark.to_rgba());
                }
            }
        }
        Ok(img)
    }
}

/// Images keyed by source reference, plus an optional QR producer.
#[derive(Default)]
pub struct AssetResolver {
    images: BTreeMap<String, RgbaImage>,
    qr: Option<Box<dyn QrProducer>>,
}

impl AssetResolver {
    /// A resolver with no images and no QR producer.
    pub const fn empty() -> Self {
        Self {
            images: BTreeMap::new(),
            qr: None,
        }
    }

    pub fn new() -> Self {
        Self::empty()
    }

    /// Register an already-decoded image under `source_ref`.
    pub fn insert_image(&mut self, source_ref: impl Into<String>, image: RgbaImage) {
        self.images.insert(source_ref.into(), image);
    }

    /// Decode an encoded image (PNG, JPEG, ...) and register it.
    pub fn load_image(&mut self, source_ref: impl Into<String>, bytes: &[u8]) -> Result<(), CanvasError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| CanvasError::Image(format!("Failed to decode image: {}", e)))?;
        self.insert_image(source_ref, image.to_rgba8());
        Ok(())
    }

    /// Read and decode an image file, registering it under `source_ref`.
    pub fn load_image_file(
        &mut self,
        source_ref: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), CanvasError> {
        let bytes = std::fs::read(path)?;
        self.load_image(source_ref, &bytes)
    }

    pub fn with_qr_producer(mut self, producer: impl QrProducer + 'static) -> Self {
        self.qr = Some(Box::new(producer));
        self
    }

    pub fn has_qr_producer(&self) -> bool {
        self.qr.is_some()
    }

    pub fn image(&self, source_ref: &str) -> Result<&RgbaImage, CanvasError> {
        self.images
            .get(source_ref)
            .ok_or_else(|| CanvasError::UnresolvedAsset(format!("no image registered for '{}'", source_ref)))
    }

    /// The QR bitmap for `payload`, or `None` when no producer is registered.
    pub fn qr_code(&self, payload: &str) -> Option<Result<RgbaImage, CanvasError>> {
        self.qr.as_ref().map(|producer| producer.produce(payload))
    }
}

impl fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetResolver")
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .field("qr", &self.qr.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_unknown_image_is_unresolved() {
        let assets = AssetResolver::new();
        assert!(matches!(assets.image("logo"), Err(CanvasError::UnresolvedAsset(_))));
    }

    #[test]
    fn test_load_image_from_bytes() {
        let src = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let mut assets = AssetResolver::new();
        assets.load_image("logo", &png_bytes(&src)).unwrap();
        assert_eq!(assets.image("logo").unwrap(), &src);
    }

    #[test]
    fn test_load_garbage_fails() {
        let mut assets = AssetResolver::new();
        let err = assets.load_image("x", b"not an image").unwrap_err();
        assert!(matches!(err, CanvasError::Image(_)));
    }

    #[test]
    fn test_qr_without_producer() {
        assert!(AssetResolver::new().qr_code("hello").is_none());
    }

    #[test]
    fn test_qr_producer_geometry() {
        let assets = AssetResolver::new().with_qr_producer(QrCodeProducer::default());
        let img = assets.qr_code("hello").unwrap().unwrap();
        // version 1 is 21 modules, plus 4 on each side
        assert_eq!(img.dimensions(), (29, 29));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        // top-left finder pattern corner
        assert_eq!(img.get_pixel(4, 4).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_qr_is_deterministic() {
        let p = QrCodeProducer::default();
        assert_eq!(p.produce("abc").unwrap(), p.produce("abc").unwrap());
        assert!(p.produce("").is_err());
    }
}
