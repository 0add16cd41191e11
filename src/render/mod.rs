//! # Rendering Module
//!
//! Rasterization of certificate documents onto an RGBA surface.
//!
//! ## Modules
//!
//! - [`color`]: RGBA colors parsed from CSS-style strings
//! - [`context`]: Affine transforms and the paint context handed to compositing
//! - [`surface`]: The pixel buffer, blending and PNG export
//! - [`font`]: Bitmap text drawing with the Spleen faces
//! - [`compositor`]: Background, border and z-ordered element painting
//!
//! ## Usage Example
//!
//! ```
//! use certcanvas::document::{Document, Element, Text};
//! use certcanvas::render;
//!
//! let mut doc = Document::new(200, 100);
//! doc.push(Element::new("title", Text::new("Certificate")).at(10.0, 10.0).sized(180.0, 30.0));
//!
//! let surface = render::render(&doc).unwrap();
//! let png = surface.to_png().unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

pub mod color;
pub mod compositor;
pub mod context;
pub mod font;
pub mod surface;

pub use color::Color;
pub use compositor::{Renderer, render, render_batch};
pub use context::{Affine, PaintContext};
pub use font::TextStyle;
pub use surface::Surface;
