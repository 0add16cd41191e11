//! # Render Configuration
//!
//! Resource bounds enforced before any pixel buffer is allocated.
//!
//! ## Presets
//!
//! | Preset | Max size | Max pixels | Max elements |
//! |--------|----------|------------|--------------|
//! | `DEFAULT` | 8192 × 8192 | 33,554,432 | 4096 |
//! | `PREVIEW` | 2048 × 2048 | 4,194,304 | 1024 |
//!
//! ## Usage
//!
//! ```
//! use certcanvas::config::RenderLimits;
//!
//! let limits = RenderLimits {
//!     max_elements: 64,
//!     ..RenderLimits::DEFAULT
//! };
//! assert!(limits.check_surface(1754, 1240).is_ok());
//! ```

use crate::error::CanvasError;

/// Upper bounds on what a single render may allocate.
///
/// ## Memory
///
/// ```text
/// surface bytes = width * height * 4 (RGBA8)
///
/// DEFAULT: 33,554,432 px * 4 = 128 MiB worst case
/// ```
///
/// The same bounds apply to each element's paint layer: an element whose
/// layer would exceed them is skipped (with a warning) instead of failing
/// the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    /// Maximum surface width in pixels
    pub max_width: u32,

    /// Maximum surface height in pixels
    pub max_height: u32,

    /// Maximum total pixel count (width * height)
    pub max_pixels: u64,

    /// Maximum number of elements in one document
    pub max_elements: usize,
}

impl RenderLimits {
    /// Generous bounds suitable for print-resolution certificates
    /// (A4 at 300 DPI is 3508 × 2480).
    pub const DEFAULT: Self = Self {
        max_width: 8192,
        max_height: 8192,
        max_pixels: 8192 * 4096,
        max_elements: 4096,
    };

    /// Tight bounds for interactive previews.
    pub const PREVIEW: Self = Self {
        max_width: 2048,
        max_height: 2048,
        max_pixels: 2048 * 2048,
        max_elements: 1024,
    };

    /// Check a surface size against the bounds.
    pub fn check_surface(&self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width > self.max_width {
            return Err(CanvasError::limit("surface width", width as u64, self.max_width as u64));
        }
        if height > self.max_height {
            return Err(CanvasError::limit("surface height", height as u64, self.max_height as u64));
        }
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(CanvasError::limit("surface pixels", pixels, self.max_pixels));
        }
        Ok(())
    }

    /// Check an element count against the bounds.
    pub fn check_elements(&self, count: usize) -> Result<(), CanvasError> {
        if count > self.max_elements {
            return Err(CanvasError::limit(
                "element count",
                count as u64,
                self.max_elements as u64,
            ));
        }
        Ok(())
    }
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
