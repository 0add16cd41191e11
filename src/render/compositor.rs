//! Document compositor: background, border, then every element in z-order.

use rayon::prelude::*;
use tracing::{debug, debug_span, warn};

use super::context::PaintContext;
use super::surface::Surface;
use crate::config::RenderLimits;
use crate::document::{AssetResolver, Document, Element};
use crate::error::CanvasError;
use crate::template::{self, SubstitutionMap};

static NO_ASSETS: AssetResolver = AssetResolver::empty();

/// Rasterizes documents under a set of limits, resolving assets from a
/// caller-supplied [`AssetResolver`].
///
/// ```
/// use certcanvas::config::RenderLimits;
/// use certcanvas::document::{Document, Element, Shape};
/// use certcanvas::render::Renderer;
///
/// let mut doc = Document::new(64, 32);
/// doc.push(Element::new("bar", Shape::default()).at(0.0, 8.0).sized(64.0, 16.0));
///
/// let surface = Renderer::new().with_limits(RenderLimits::PREVIEW).render(&doc).unwrap();
/// assert_eq!((surface.width(), surface.height()), (64, 32));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    limits: RenderLimits,
    assets: &'a AssetResolver,
}

impl Renderer<'static> {
    /// Default limits, no images, no QR producer.
    pub fn new() -> Self {
        Self {
            limits: RenderLimits::DEFAULT,
            assets: &NO_ASSETS,
        }
    }
}

impl Default for Renderer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Renderer<'a> {
    pub fn with_limits(self, limits: RenderLimits) -> Self {
        Self { limits, ..self }
    }

    pub fn with_assets<'b>(self, assets: &'b AssetResolver) -> Renderer<'b> {
        Renderer {
            limits: self.limits,
            assets,
        }
    }

    pub fn limits(&self) -> &RenderLimits {
        &self.limits
    }

    /// Rasterize `doc` to a fresh surface of exactly `width × height`.
    ///
    /// Fails only for an invalid document or one over the limits. Problems
    /// with individual elements (unresolved images, oversized layers) are
    /// logged and the element is drawn as a placeholder or skipped.
    pub fn render(&self, doc: &Document) -> Result<Surface, CanvasError> {
        doc.validate()?;
        self.limits.check_surface(doc.width, doc.height)?;
        self.limits.check_elements(doc.elements.len())?;

        let mut surface = Surface::filled(doc.width, doc.height, doc.background_color);

        if let Some(border) = &doc.border {
            let thickness = border.thickness.round() as u32;
            surface.stroke_rect(
                0,
                0,
                doc.width as i64,
                doc.height as i64,
                thickness,
                border.color,
                border.style,
            );
        }

        for element in doc.paint_order() {
            let _span = debug_span!("element", id = %element.id, kind = element.kind.type_name()).entered();
            self.paint_element(&mut surface, element);
        }

        debug!(
            width = doc.width,
            height = doc.height,
            elements = doc.elements.len(),
            "rendered document"
        );
        Ok(surface)
    }

    /// Substitute `map` into `doc`, then render the result.
    pub fn render_substituted(&self, doc: &Document, map: &SubstitutionMap) -> Result<Surface, CanvasError> {
        self.render(&template::substitute(doc, map))
    }

    /// Render one certificate per substitution map, in parallel.
    ///
    /// Results are in the same order as `maps`; each one succeeds or fails
    /// on its own.
    pub fn render_batch(&self, doc: &Document, maps: &[SubstitutionMap]) -> Vec<Result<Surface, CanvasError>> {
        maps.par_iter()
            .map(|map| self.render_substituted(doc, map))
            .collect()
    }

    /// Paint one element into its own layer and composite it.
    fn paint_element(&self, surface: &mut Surface, element: &Element) {
        let (w, h) = element.size.clamped();
        let layer_w = w.round() as u32;
        let layer_h = h.round() as u32;
        if layer_w == 0 || layer_h == 0 {
            debug!("zero area, nothing to paint");
            return;
        }
        if let Err(e) = self.limits.check_surface(layer_w, layer_h) {
            warn!(error = %e, "element layer too large, skipped");
            return;
        }

        let (x, y) = (element.position.x, element.position.y);
        let ctx = PaintContext::ROOT
            .rotated_about(x + w / 2.0, y + h / 2.0, element.rotation_degrees)
            .translated(x, y)
            .with_opacity(element.styling.opacity());

        // Opacity applies to each fill and stroke, not to the finished layer.
        let mut layer = Surface::new(layer_w, layer_h).with_global_alpha(ctx.opacity);
        element.kind.paint(&element.styling, &mut layer, self.assets);
        surface.composite(&layer, &ctx.transform);
    }
}

/// Rasterize `doc` with default limits and no assets.
pub fn render(doc: &Document) -> Result<Surface, CanvasError> {
    Renderer::new().render(doc)
}

/// Render one certificate per substitution map with default limits and no assets.
pub fn render_batch(doc: &Document, maps: &[SubstitutionMap]) -> Vec<Result<Surface, CanvasError>> {
    Renderer::new().render_batch(doc, maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Border, BorderStyle, Shape, Styling, Text};
    use crate::render::color::Color;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn filled(color: Color) -> Styling {
        Styling {
            background_color: Some(color),
            ..Default::default()
        }
    }

    #[test]
    fn test_background_only() {
        let mut doc = Document::new(8, 4);
        doc.background_color = Color::rgb(1, 2, 3);
        let s = render(&doc).unwrap();
        assert_eq!((s.width(), s.height()), (8, 4));
        assert!(s.as_raw().chunks(4).all(|p| p == [1, 2, 3, 255]));
    }

    #[test]
    fn test_border_band() {
        let mut doc = Document::new(20, 20);
        doc.border = Some(Border {
            color: RED,
            thickness: 3.0,
            style: BorderStyle::Solid,
        });
        let s = render(&doc).unwrap();
        assert_eq!(s.pixel(2, 10), Some(RED));
        assert_eq!(s.pixel(3, 10), Some(Color::WHITE));
        assert_eq!(s.pixel(17, 17), Some(RED));
    }

    #[test]
    fn test_z_order_beats_insertion_order() {
        let mut doc = Document::new(30, 30);
        doc.push(Element::new("top", Shape::default()).at(5.0, 5.0).sized(15.0, 15.0).with_z_index(2).with_styling(filled(BLUE)));
        doc.push(Element::new("bottom", Shape::default()).at(10.0, 10.0).sized(15.0, 15.0).with_z_index(1).with_styling(filled(RED)));
        let s = render(&doc).unwrap();
        assert_eq!(s.pixel(12, 12), Some(BLUE));
        assert_eq!(s.pixel(22, 22), Some(RED));
        assert_eq!(s.pixel(6, 6), Some(BLUE));
    }

    #[test]
    fn test_equal_z_uses_insertion_order() {
        let mut doc = Document::new(10, 10);
        doc.push(Element::new("a", Shape::default()).sized(10.0, 10.0).with_styling(filled(RED)));
        doc.push(Element::new("b", Shape::default()).sized(10.0, 10.0).with_styling(filled(BLUE)));
        assert_eq!(render(&doc).unwrap().pixel(5, 5), Some(BLUE));
    }

    #[test]
    fn test_opacity() {
        let mut doc = Document::new(4, 4);
        let mut styling = filled(Color::BLACK);
        styling.opacity = Some(0.5);
        doc.push(Element::new("half", Shape::default()).sized(4.0, 4.0).with_styling(styling));
        let p = render(&doc).unwrap().pixel(1, 1).unwrap();
        assert!([p.r, p.g, p.b].iter().all(|c| c.abs_diff(128) <= 1), "{:?}", p);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_opacity_applies_to_each_draw() {
        let mut doc = Document::new(20, 20);
        let styling = Styling {
            background_color: Some(RED),
            border_width: Some(5.0),
            border_color: Some(Color::BLACK),
            opacity: Some(0.5),
            ..Default::default()
        };
        doc.push(Element::new("box", Shape::default()).sized(20.0, 20.0).with_styling(styling));
        let s = render(&doc).unwrap();

        // Border: black at half alpha over red at half alpha over white.
        let border = s.pixel(1, 10).unwrap();
        assert!(border.r.abs_diff(128) <= 1 && border.g.abs_diff(64) <= 1 && border.b.abs_diff(64) <= 1, "{:?}", border);
        // Fill: red at half alpha over white.
        let fill = s.pixel(10, 10).unwrap();
        assert!(fill.r == 255 && fill.g.abs_diff(128) <= 1, "{:?}", fill);
    }

    #[test]
    fn test_zero_and_negative_sizes_paint_nothing() {
        let mut doc = Document::new(10, 10);
        doc.push(Element::new("zero", Shape::default()).sized(0.0, 5.0));
        doc.push(Element::new("neg", Shape::default()).sized(-4.0, -4.0));
        let s = render(&doc).unwrap();
        assert_eq!(s, Surface::filled(10, 10, Color::WHITE));
    }

    #[test]
    fn test_offsurface_element_is_clipped() {
        let mut doc = Document::new(10, 10);
        doc.push(Element::new("off", Shape::default()).at(-5.0, 8.0).sized(8.0, 8.0).with_styling(filled(RED)));
        doc.push(Element::new("far", Shape::default()).at(500.0, 500.0).sized(8.0, 8.0));
        let s = render(&doc).unwrap();
        assert_eq!(s.pixel(2, 9), Some(RED));
        assert_eq!(s.pixel(3, 9), Some(Color::WHITE));
    }

    #[test]
    fn test_rotated_90_swaps_extent() {
        let mut doc = Document::new(40, 40);
        doc.push(
            Element::new("bar", Shape::default())
                .at(10.0, 18.0)
                .sized(20.0, 4.0)
                .rotated(90.0)
                .with_styling(filled(RED)),
        );
        let s = render(&doc).unwrap();
        // was horizontal 10..30 x 18..22, now vertical 18..22 x 10..30
        assert_eq!(s.pixel(20, 11), Some(RED));
        assert_eq!(s.pixel(20, 28), Some(RED));
        assert_eq!(s.pixel(12, 20), Some(Color::WHITE));
    }

    #[test]
    fn test_surface_limit_rejects() {
        let doc = Document::new(4000, 100);
        let err = Renderer::new().with_limits(RenderLimits::PREVIEW).render(&doc).unwrap_err();
        assert!(matches!(err, CanvasError::ResourceLimitExceeded { what: "surface width", .. }));
    }

    #[test]
    fn test_element_limit_rejects() {
        let mut doc = Document::new(10, 10);
        for i in 0..3 {
            doc.push(Element::new(format!("e{}", i), Shape::default()));
        }
        let limits = RenderLimits {
            max_elements: 2,
            ..RenderLimits::DEFAULT
        };
        let err = Renderer::new().with_limits(limits).render(&doc).unwrap_err();
        assert!(matches!(err, CanvasError::ResourceLimitExceeded { what: "element count", .. }));
    }

    #[test]
    fn test_oversized_layer_is_skipped() {
        let mut doc = Document::new(100, 100);
        doc.push(Element::new("huge", Shape::default()).sized(5000.0, 10.0).with_styling(filled(RED)));
        doc.push(Element::new("ok", Shape::default()).at(50.0, 50.0).sized(10.0, 10.0).with_styling(filled(BLUE)));
        let s = Renderer::new().with_limits(RenderLimits::PREVIEW).render(&doc).unwrap();
        assert_eq!(s.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(s.pixel(55, 55), Some(BLUE));
    }

    #[test]
    fn test_invalid_document_renders_nothing() {
        let mut doc = Document::new(10, 10);
        doc.push(Element::new("dup", Shape::default()));
        doc.push(Element::new("dup", Text::new("x")));
        assert!(matches!(render(&doc), Err(CanvasError::InvalidDocument(_))));
    }

    #[test]
    fn test_batch_in_order() {
        let mut doc = Document::new(100, 40);
        doc.push(Element::new("name", Text::new("{{name}}")).sized(100.0, 40.0));
        let maps: Vec<SubstitutionMap> = ["A", "BBBBBB", "C"]
            .iter()
            .map(|n| SubstitutionMap::new().with("name", *n))
            .collect();
        let out = render_batch(&doc, &maps);
        assert_eq!(out.len(), 3);
        let expected = Renderer::new().render_substituted(&doc, &maps[1]).unwrap();
        assert_eq!(out[1].as_ref().unwrap(), &expected);
        assert_ne!(out[0].as_ref().unwrap(), &expected);
    }
}
