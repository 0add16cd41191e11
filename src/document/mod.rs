//! # Certificate Document Model
//!
//! A fixed-size canvas holding typed, positioned, styled elements. The same
//! types are the Rust API and the editor's JSON interchange.
//!
//! ```
//! use certcanvas::document::*;
//!
//! // Rust construction
//! let mut doc = Document::new(800, 600);
//! doc.push(Element::new("title", Text::new("Certificate of {{course}}")).at(40.0, 40.0).sized(720.0, 60.0));
//! doc.push(Element::new("seal", Shape::default()).at(700.0, 500.0).sized(60.0, 60.0).with_z_index(2));
//!
//! // JSON deserialization
//! let json = r##"{
//!     "width": 800, "height": 600, "backgroundColor": "#fffdf5",
//!     "elements": [
//!         {"id": "title", "type": "Text", "content": "Certificate of {{course}}",
//!          "position": {"x": 40, "y": 40}, "size": {"width": 720, "height": 60}, "styling": {}}
//!     ]
//! }"##;
//! let parsed = Document::from_json(json).unwrap();
//! assert_eq!(parsed.elements[0].kind.label(), "Text");
//! ```

pub mod types;

mod barcode;
mod graphics;
pub mod resolve;
mod table;
mod text;

pub use resolve::{AssetResolver, QrCodeProducer, QrProducer};
pub use types::*;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

use crate::error::CanvasError;
use crate::render::color::Color;
use crate::render::surface::Surface;

// ============================================================================
// DOCUMENT
// ============================================================================

fn default_background() -> Color {
    Color::WHITE
}

fn default_border_color() -> Color {
    Color::BLACK
}

/// Line pattern for the document border.
///
/// Unrecognized style names fall back to `solid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Dashed,
    Dotted,
    Double,
    None,
    #[default]
    #[serde(other)]
    Solid,
}

/// A frame drawn along the inside edges of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(default = "default_border_color")]
    pub color: Color,
    /// Band width in pixels. Zero draws nothing.
    #[serde(default)]
    pub thickness: f32,
    #[serde(default)]
    pub style: BorderStyle,
}

/// A certificate template: surface size, background, border, elements.
///
/// Elements are kept in insertion order; paint order is derived from
/// `z_index` by [`Document::paint_order`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    /// Reports failures as `elements[i]: ...`.
    #[serde(default, deserialize_with = "deserialize_elements")]
    pub elements: Vec<Element>,
}

impl Document {
    /// An empty white document.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background_color: default_background(),
            border: None,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Parse and validate a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Pretty-printed JSON in the same shape [`from_json`](Self::from_json) reads.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements in paint order: ascending `z_index`, ties in insertion order.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut order: Vec<&Element> = self.elements.iter().collect();
        // sort_by_key is stable
        order.sort_by_key(|e| e.z_index);
        order
    }

    /// Check the structural invariants the renderer relies on.
    ///
    /// Rejects a zero-sized surface, a negative or non-finite border,
    /// duplicate element ids, and non-finite geometry or styling numbers.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::InvalidDocument(format!(
                "document size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if let Some(border) = &self.border
            && (!border.thickness.is_finite() || border.thickness < 0.0)
        {
            return Err(CanvasError::InvalidDocument(format!(
                "border thickness must be a non-negative number, got {}",
                border.thickness
            )));
        }

        let mut seen = HashSet::with_capacity(self.elements.len());
        for (i, element) in self.elements.iter().enumerate() {
            if !seen.insert(element.id.as_str()) {
                return Err(CanvasError::InvalidDocument(format!(
                    "elements[{}]: duplicate id '{}'",
                    i, element.id
                )));
            }
            element
                .check_finite()
                .map_err(|field| CanvasError::InvalidDocument(format!("elements[{}]: {} is not finite", i, field)))?;
        }
        Ok(())
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// One positioned element: common attributes plus a kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    /// Clockwise rotation about the element center.
    #[serde(skip_serializing_if = "is_zero")]
    pub rotation_degrees: f32,
    /// Paint order key. Higher paints later (on top).
    #[serde(skip_serializing_if = "is_zero_index")]
    pub z_index: i32,
    pub styling: Styling,
    /// Declared token name, independent of any `{{token}}` in the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn is_zero(v: &f32) -> bool {
    *v == 0.0
}

fn is_zero_index(v: &i32) -> bool {
    *v == 0
}

impl Element {
    /// A zero-sized element at the origin.
    pub fn new(id: impl Into<String>, kind: impl Into<ElementKind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: Position::default(),
            size: Size::default(),
            rotation_degrees: 0.0,
            z_index: 0,
            styling: Styling::default(),
            placeholder: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Size { width, height };
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_styling(mut self, styling: Styling) -> Self {
        self.styling = styling;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Name of the first non-finite number on this element, if any.
    fn check_finite(&self) -> Result<(), &'static str> {
        let s = &self.styling;
        let checks = [
            ("position.x", Some(self.position.x)),
            ("position.y", Some(self.position.y)),
            ("size.width", Some(self.size.width)),
            ("size.height", Some(self.size.height)),
            ("rotationDegrees", Some(self.rotation_degrees)),
            ("styling.opacity", s.opacity),
            ("styling.fontSize", s.font_size),
            ("styling.borderWidth", s.border_width),
        ];
        match checks
            .iter()
            .find(|(_, v)| v.is_some_and(|v| !v.is_finite()))
        {
            Some((field, _)) => Err(*field),
            None => Ok(()),
        }
    }

    /// Build an element from a JSON object.
    ///
    /// Common attributes are removed first; whatever remains is parsed as
    /// the [`ElementKind`] selected by `type`.
    fn from_object(mut obj: serde_json::Map<String, serde_json::Value>) -> Result<Self, String> {
        let id: String = take(&mut obj, "id")?.ok_or("missing field `id`")?;
        let position: Position = take(&mut obj, "position")?.ok_or("missing field `position`")?;
        let size: Size = take(&mut obj, "size")?.ok_or("missing field `size`")?;

        // `rotation` is the legacy editor key
        let rotation_degrees: Option<f32> = take(&mut obj, "rotationDegrees")?;
        let legacy_rotation: Option<f32> = take(&mut obj, "rotation")?;
        let z_index: Option<i32> = take(&mut obj, "zIndex")?;
        let styling: Option<Styling> = take(&mut obj, "styling")?;
        let placeholder: Option<String> = take(&mut obj, "placeholder")?;

        if !obj.contains_key("type") {
            return Err("missing field `type`".into());
        }
        let kind: ElementKind =
            serde_json::from_value(serde_json::Value::Object(obj)).map_err(|e| e.to_string())?;

        Ok(Element {
            id,
            kind,
            position,
            size,
            rotation_degrees: rotation_degrees.or(legacy_rotation).unwrap_or(0.0),
            z_index: z_index.unwrap_or(0),
            styling: styling.unwrap_or_default(),
            placeholder,
        })
    }
}

/// Remove `key` and parse it. Absent and `null` both yield `None`.
fn take<T: DeserializeOwned>(
    obj: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<T>, String> {
    obj.remove(key)
        .filter(|v| !v.is_null())
        .map(|v| serde_json::from_value(v).map_err(|e| format!("{}: {}", key, e)))
        .transpose()
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let obj = serde_json::Map::deserialize(deserializer)?;
        Element::from_object(obj).map_err(serde::de::Error::custom)
    }
}

/// Deserialize the element list, prefixing errors with the element index.
fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let obj = match v {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "elements[{}]: expected object, got {}",
                        i, other
                    )));
                }
            };
            Element::from_object(obj)
                .map_err(|e| serde::de::Error::custom(format!("elements[{}]: {}", i, e)))
        })
        .collect()
}

/// Define the ElementKind enum and all dispatch methods from a single list.
///
/// Adding a new element kind: add one line here, then define the struct in
/// `types.rs` with `impl ElementMeta` and `impl TextFields`, and give it a
/// `paint` method next to the other renderers.
macro_rules! define_elements {
    ($($variant:ident($inner:ty) = $tag:literal $(| $alias:literal)*),+ $(,)?) => {
        /// The closed set of element kinds.
        ///
        /// `#[serde(tag = "type")]` enables JSON like `{"type": "Text", "content": "Hello"}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum ElementKind {
            $(
                #[serde(rename = $tag $(, alias = $alias)*)]
                $variant($inner),
            )+
        }

        impl ElementKind {
            /// Human-readable display label (from [`ElementMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(ElementKind::$variant(_) => <$inner>::label(),)+ }
            }

            /// The JSON `type` tag.
            pub fn type_name(&self) -> &'static str {
                match self { $(ElementKind::$variant(_) => $tag,)+ }
            }

            /// Every token-bearing string of this element.
            pub fn text_fields(&self) -> Vec<&str> {
                match self { $(ElementKind::$variant(e) => e.text_fields(),)+ }
            }

            pub fn text_fields_mut(&mut self) -> Vec<&mut String> {
                match self { $(ElementKind::$variant(e) => e.text_fields_mut(),)+ }
            }

            /// Paint into an element-local layer sized to the element box.
            pub(crate) fn paint(&self, styling: &Styling, layer: &mut Surface, assets: &AssetResolver) {
                match self { $(ElementKind::$variant(e) => e.paint(styling, layer, assets),)+ }
            }
        }

        $(
            impl From<$inner> for ElementKind {
                fn from(e: $inner) -> Self {
                    ElementKind::$variant(e)
                }
            }
        )+
    };
}

define_elements! {
    Text(Text) = "Text" | "text",
    Image(Image) = "Image" | "image",
    Shape(Shape) = "Shape" | "shape",
    Table(Table) = "Table" | "table",
    QrCode(QrCode) = "QrCode" | "qrcode" | "qr_code",
}
