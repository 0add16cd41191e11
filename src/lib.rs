//! # Certcanvas - Certificate Template Rendering Library
//!
//! Certcanvas turns a JSON certificate template into pixels. It provides:
//!
//! - **Templates**: `{{name}}` token discovery and substitution
//! - **Document model**: Typed elements with geometry, z-order and styling
//! - **Rendering**: Text, image, shape, table and QR code painters composited
//!   onto an RGBA surface
//! - **Assets**: Caller-supplied images and a pluggable QR producer
//!
//! ## Quick Start
//!
//! ```
//! use certcanvas::{Document, SubstitutionMap, render, substitute};
//!
//! let doc = Document::from_json(r##"{
//!     "width": 200,
//!     "height": 100,
//!     "backgroundColor": "#ffffff",
//!     "elements": [
//!         {
//!             "id": "t1",
//!             "type": "Text",
//!             "content": "Hi {{name}}",
//!             "position": { "x": 10, "y": 10 },
//!             "size": { "width": 180, "height": 30 }
//!         }
//!     ]
//! }"##)?;
//!
//! // Fill the template
//! let map = SubstitutionMap::new().with("name", "Ada");
//! let filled = substitute(&doc, &map);
//!
//! // Rasterize and encode
//! let surface = render(&filled)?;
//! let png = surface.to_png()?;
//! assert!(!png.is_empty());
//!
//! # Ok::<(), certcanvas::CanvasError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Token scanning and substitution |
//! | [`document`] | Document, elements, styling and assets |
//! | [`render`] | Surface, compositor and element painting |
//! | [`config`] | Render limits |
//! | [`error`] | Error types |

pub mod config;
pub mod document;
pub mod error;
pub mod render;
pub mod template;

// Re-exports for convenience
pub use config::RenderLimits;
pub use document::{AssetResolver, Document, Element, ElementKind};
pub use error::CanvasError;
pub use render::{Renderer, Surface, render, render_batch};
pub use template::{SubstitutionMap, Value, extract_placeholders, scan, substitute};
