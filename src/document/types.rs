//! Element payload and styling types for the document model.
//!
//! All types derive `Serialize + Deserialize` so the same structs work for
//! Rust construction and for the editor's JSON interchange.
//!
//! Each payload implements [`ElementMeta`] to declare its display label and
//! [`TextFields`] to expose the strings that may carry `{{tokens}}`.

use serde::{Deserialize, Serialize};

use crate::render::color::Color;

/// Metadata every element payload provides.
///
/// Implement this next to the struct; the compiler then points at the
/// remaining exhaustive matches in `ElementKind`.
pub trait ElementMeta: Sized {
    /// Human-readable display label (e.g. "QR Code").
    fn label() -> &'static str;
}

/// Access to the token-bearing strings of an element payload.
///
/// Substitution and placeholder discovery only ever touch these fields, so
/// a payload that returns nothing here is invisible to templating.
pub trait TextFields {
    fn text_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn text_fields_mut(&mut self) -> Vec<&mut String> {
        Vec::new()
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Top-left anchor in document pixels. May be negative or off-surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Element extent in document pixels. Negative values paint as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Width and height with negatives clamped to zero.
    pub fn clamped(&self) -> (f32, f32) {
        (self.width.max(0.0), self.height.max(0.0))
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.clamped();
        w <= 0.0 || h <= 0.0
    }
}

// ============================================================================
// STYLING
// ============================================================================

/// Horizontal text anchor inside the element box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font weight as the editor writes it: a keyword or a CSS numeric weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Numeric(u16),
}

impl FontWeight {
    /// Whether glyphs should be drawn heavy.
    pub fn is_bold(&self) -> bool {
        match self {
            FontWeight::Normal => false,
            FontWeight::Bold => true,
            FontWeight::Numeric(n) => *n >= 600,
        }
    }
}

impl Serialize for FontWeight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FontWeight::Normal => serializer.serialize_str("normal"),
            FontWeight::Bold => serializer.serialize_str("bold"),
            FontWeight::Numeric(n) => serializer.serialize_u16(*n),
        }
    }
}

/// Accepts `"normal"`, `"bold"`, `"bolder"`, `"lighter"`, `700` or `"700"`.
impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WeightValue {
            Number(u16),
            Keyword(String),
        }

        match WeightValue::deserialize(deserializer)? {
            WeightValue::Number(n) => Ok(FontWeight::Numeric(n)),
            WeightValue::Keyword(s) => match s.trim().to_ascii_lowercase().as_str() {
                "normal" | "lighter" | "" => Ok(FontWeight::Normal),
                "bold" | "bolder" => Ok(FontWeight::Bold),
                other => other
                    .parse::<u16>()
                    .map(FontWeight::Numeric)
                    .map_err(|_| serde::de::Error::custom(format!("unknown font weight '{}'", s))),
            },
        }
    }
}

pub(crate) const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Per-element styling. Every field is optional; each renderer applies
/// its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styling {
    /// 0.0 (invisible) to 1.0 (opaque). Out-of-range values are clamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(alias = "color", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
}

impl Styling {
    pub fn opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Font size in pixels, 16 unless set to a positive value.
    pub fn font_size(&self) -> f32 {
        self.font_size
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|w| w.is_bold())
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }

    /// Border width in whole pixels, or the fallback when unset.
    ///
    /// Fractional widths round to the nearest pixel; negatives count as zero.
    pub fn border_width_px(&self, fallback: u32) -> u32 {
        match self.border_width {
            Some(w) => w.max(0.0).round() as u32,
            None => fallback,
        }
    }

    /// Frame width for boxes that always carry a frame: a zero, negative or
    /// unset border width uses the fallback.
    pub fn frame_width_px(&self, fallback: u32) -> u32 {
        match self.border_width_px(0) {
            0 => fallback,
            w => w,
        }
    }
}

// ============================================================================
// ELEMENT PAYLOADS
// ============================================================================

/// A block of text. Lines split on `\n`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default)]
    pub content: String,
    /// Rich markup kept alongside `content` by the editor. Templated, never painted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_content: Option<String>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            rich_content: None,
        }
    }
}

impl ElementMeta for Text {
    fn label() -> &'static str {
        "Text"
    }
}

impl TextFields for Text {
    fn text_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.content.as_str()];
        fields.extend(self.rich_content.as_deref());
        fields
    }

    fn text_fields_mut(&mut self) -> Vec<&mut String> {
        let mut fields = vec![&mut self.content];
        fields.extend(self.rich_content.as_mut());
        fields
    }
}

/// A raster image looked up by an opaque source reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Key into the render's [`AssetResolver`](super::AssetResolver).
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl Image {
    pub fn new(source_ref: impl Into<String>) -> Self {
        Self {
            source_ref: Some(source_ref.into()),
        }
    }
}

impl ElementMeta for Image {
    fn label() -> &'static str {
        "Image"
    }
}

impl TextFields for Image {}

/// A filled (and optionally stroked) rectangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {}

impl ElementMeta for Shape {
    fn label() -> &'static str {
        "Shape"
    }
}

impl TextFields for Shape {}

/// A table drawn as a labelled box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub columns: u32,
}

impl Table {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

impl ElementMeta for Table {
    fn label() -> &'static str {
        "Table"
    }
}

impl TextFields for Table {}

/// A QR code encoding `payload`, typically a verification URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    #[serde(default, alias = "content", alias = "data")]
    pub payload: String,
}

impl QrCode {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl ElementMeta for QrCode {
    fn label() -> &'static str {
        "QR Code"
    }
}

impl TextFields for QrCode {
    fn text_fields(&self) -> Vec<&str> {
        vec![self.payload.as_str()]
    }

    fn text_fields_mut(&mut self) -> Vec<&mut String> {
        vec![&mut self.payload]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_forms() {
        let parse = |s: &str| serde_json::from_str::<FontWeight>(s).unwrap();
        assert_eq!(parse("\"bold\""), FontWeight::Bold);
        assert_eq!(parse("\"Bolder\""), FontWeight::Bold);
        assert_eq!(parse("\"normal\""), FontWeight::Normal);
        assert_eq!(parse("700"), FontWeight::Numeric(700));
        assert_eq!(parse("\"300\""), FontWeight::Numeric(300));
        assert!(serde_json::from_str::<FontWeight>("\"heavy\"").is_err());
    }

    #[test]
    fn test_font_weight_boldness() {
        assert!(FontWeight::Bold.is_bold());
        assert!(FontWeight::Numeric(600).is_bold());
        assert!(!FontWeight::Numeric(500).is_bold());
        assert!(!FontWeight::Normal.is_bold());
    }

    #[test]
    fn test_styling_defaults() {
        let s = Styling::default();
        assert_eq!(s.opacity(), 1.0);
        assert_eq!(s.font_size(), 16.0);
        assert_eq!(s.text_align(), TextAlign::Left);
        assert!(!s.is_bold());
        assert_eq!(s.border_width_px(1), 1);
    }

    #[test]
    fn test_styling_clamps() {
        let s = Styling {
            opacity: Some(1.7),
            font_size: Some(-4.0),
            border_width: Some(-2.0),
            ..Default::default()
        };
        assert_eq!(s.opacity(), 1.0);
        assert_eq!(s.font_size(), 16.0);
        assert_eq!(s.border_width_px(1), 0);
        assert_eq!(s.frame_width_px(1), 1);
    }

    #[test]
    fn test_frame_width_treats_zero_as_unset() {
        let zero = Styling {
            border_width: Some(0.0),
            ..Default::default()
        };
        assert_eq!(zero.border_width_px(1), 0);
        assert_eq!(zero.frame_width_px(1), 1);
        assert_eq!(Styling::default().frame_width_px(1), 1);
        let wide = Styling {
            border_width: Some(3.0),
            ..Default::default()
        };
        assert_eq!(wide.frame_width_px(1), 3);
    }

    #[test]
    fn test_styling_json_aliases() {
        let s: Styling = serde_json::from_str(
            r##"{"color": "#ff0000", "fontWeight": "bold", "textAlign": "center", "borderWidth": 2}"##,
        )
        .unwrap();
        assert_eq!(s.text_color, Some(Color::rgb(255, 0, 0)));
        assert!(s.is_bold());
        assert_eq!(s.text_align(), TextAlign::Center);
        assert_eq!(s.border_width_px(0), 2);
    }

    #[test]
    fn test_styling_rejects_bad_color() {
        assert!(serde_json::from_str::<Styling>(r##"{"backgroundColor": "#zzz"}"##).is_err());
    }

    #[test]
    fn test_text_fields() {
        let mut t = Text {
            content: "a".into(),
            rich_content: Some("b".into()),
        };
        assert_eq!(t.text_fields(), vec!["a", "b"]);
        for f in t.text_fields_mut() {
            f.push('!');
        }
        assert_eq!(t.text_fields(), vec!["a!", "b!"]);
        assert!(Image::default().text_fields().is_empty());
        assert_eq!(QrCode::new("x").text_fields(), vec!["x"]);
    }

    #[test]
    fn test_size_clamping() {
        let s = Size {
            width: -5.0,
            height: 10.0,
        };
        assert_eq!(s.clamped(), (0.0, 10.0));
        assert!(s.is_empty());
        assert!(!Size { width: 1.0, height: 1.0 }.is_empty());
    }
}
