//! # Rendering Tests
//!
//! End-to-end checks through the public API: JSON in, pixels out.
//!
//! ## Test Coverage
//!
//! - **Scenario**: a filled-in greeting rendered at its element position
//! - **Composition**: z-order, rotation, unresolved assets
//! - **Assets**: images and QR codes supplied through an `AssetResolver`
//! - **Batch**: one template, many substitution maps

use certcanvas::document::{Image, QrCode, QrCodeProducer, Shape, Styling, Text};
use certcanvas::render::Color;
use certcanvas::{
    AssetResolver, CanvasError, Document, Element, RenderLimits, Renderer, Surface, SubstitutionMap, render,
    render_batch, substitute,
};
use pretty_assertions::assert_eq;

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 160, 0);

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn filled(color: Color) -> Styling {
    Styling {
        background_color: Some(color),
        ..Default::default()
    }
}

/// Every pixel that is not the document background.
fn ink(surface: &Surface, background: Color) -> Vec<(u32, u32, Color)> {
    let mut out = Vec::new();
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if let Some(p) = surface.pixel(x, y)
                && p != background
            {
                out.push((x, y, p));
            }
        }
    }
    out
}

fn greeting_template() -> Document {
    Document::from_json(
        r##"{
            "width": 200,
            "height": 100,
            "backgroundColor": "#ffffff",
            "elements": [
                {
                    "id": "t1",
                    "type": "Text",
                    "content": "Hi {{name}}",
                    "position": { "x": 10, "y": 10 },
                    "size": { "width": 180, "height": 30 }
                }
            ]
        }"##,
    )
    .unwrap()
}

// ============================================================================
// SCENARIO
// ============================================================================

#[test]
fn test_greeting_scenario() {
    let doc = greeting_template();
    let map = SubstitutionMap::new().with("name", "Ada");
    let filled = substitute(&doc, &map);
    assert_eq!(filled.elements[0].kind.text_fields(), vec!["Hi Ada"]);

    let surface = render(&filled).unwrap();
    assert_eq!((surface.width(), surface.height()), (200, 100));

    let ink = ink(&surface, Color::WHITE);
    assert!(!ink.is_empty());
    // Black glyphs only, inside the element box, below the top padding.
    assert!(ink.iter().all(|&(_, _, c)| c == Color::BLACK));
    assert!(ink.iter().all(|&(x, y, _)| (10..190).contains(&x) && (20..40).contains(&y)));

    // Left aligned: six 8 px cells starting at the element's left edge.
    let min_x = ink.iter().map(|&(x, _, _)| x).min().unwrap();
    let max_x = ink.iter().map(|&(x, _, _)| x).max().unwrap();
    assert!(min_x < 18);
    assert!(max_x < 10 + 6 * 8);
}

#[test]
fn test_unfilled_token_renders_literally() {
    let doc = greeting_template();
    let blank = render(&doc).unwrap();
    let filled = render(&substitute(&doc, &SubstitutionMap::new().with("name", "Ada"))).unwrap();
    assert_ne!(blank, filled);

    let max_x = ink(&blank, Color::WHITE).iter().map(|&(x, _, _)| x).max().unwrap();
    // "Hi {{name}}" is eleven cells wide
    assert!(max_x >= 10 + 10 * 8);
}

// ============================================================================
// COMPOSITION
// ============================================================================

#[test]
fn test_z_order_regardless_of_insertion() {
    for flip in [false, true] {
        let mut elements = vec![
            Element::new("low", Shape::default())
                .at(10.0, 10.0)
                .sized(40.0, 40.0)
                .with_z_index(1)
                .with_styling(filled(RED)),
            Element::new("high", Shape::default())
                .at(30.0, 30.0)
                .sized(40.0, 40.0)
                .with_z_index(2)
                .with_styling(filled(GREEN)),
        ];
        if flip {
            elements.reverse();
        }
        let mut doc = Document::new(80, 80);
        for e in elements {
            doc.push(e);
        }
        let s = render(&doc).unwrap();
        assert_eq!(s.pixel(40, 40), Some(GREEN), "overlap, flip={}", flip);
        assert_eq!(s.pixel(15, 15), Some(RED));
        assert_eq!(s.pixel(65, 65), Some(GREEN));
    }
}

#[test]
fn test_text_rotated_180_is_upside_down() {
    let text = |rotation: f32| {
        let mut doc = Document::new(80, 80);
        doc.push(
            Element::new("t", Text::new("Lg"))
                .at(20.0, 20.0)
                .sized(40.0, 40.0)
                .rotated(rotation)
                .with_styling(filled(Color::rgb(255, 255, 200))),
        );
        render(&doc).unwrap()
    };
    let plain = text(0.0);
    let flipped = text(180.0);
    assert_ne!(plain, flipped);

    // Point reflection through the box center (40, 40).
    for y in 20..60 {
        for x in 20..60 {
            assert_eq!(flipped.pixel(x, y), plain.pixel(79 - x, 79 - y), "at {},{}", x, y);
        }
    }
    assert_eq!(flipped.pixel(39, 39), plain.pixel(40, 40));
    // Nothing leaks outside the box.
    assert_eq!(flipped.pixel(10, 10), Some(Color::WHITE));
    assert_eq!(flipped.pixel(70, 70), Some(Color::WHITE));
}

#[test]
fn test_unresolved_image_beside_shape() {
    let mut doc = Document::new(200, 80);
    doc.push(Element::new("logo", Image::new("logo.png")).sized(100.0, 50.0));
    doc.push(Element::new("box", Shape::default()).at(120.0, 10.0).sized(40.0, 40.0).with_styling(filled(RED)));

    let s = render(&doc).unwrap();
    assert_eq!(s.pixel(140, 30), Some(RED));
    assert_eq!(s.pixel(0, 0), Some(Color::hex(0x999999)));
    assert_eq!(s.pixel(5, 5), Some(Color::hex(0xe0e0e0)));
    assert_eq!(s.pixel(150, 70), Some(Color::WHITE));
}

// ============================================================================
// ASSETS
// ============================================================================

#[test]
fn test_resolved_image_and_qr_code() {
    let mut assets = AssetResolver::new().with_qr_producer(QrCodeProducer::default());
    assets.insert_image("seal", image::RgbaImage::from_pixel(10, 10, GREEN.to_rgba()));

    let mut doc = Document::new(120, 80);
    doc.push(Element::new("seal", Image::new("seal")).at(0.0, 0.0).sized(10.0, 10.0));
    doc.push(Element::new("qr", QrCode::new("hello")).at(60.0, 10.0).sized(58.0, 58.0));

    let s = Renderer::new().with_assets(&assets).render(&doc).unwrap();
    assert_eq!(s.pixel(5, 5), Some(GREEN));
    // 29 module bitmap doubled: quiet zone then the finder pattern corner.
    assert_eq!(s.pixel(60 + 7, 10 + 7), Some(Color::WHITE));
    assert_eq!(s.pixel(60 + 8, 10 + 8), Some(Color::BLACK));
}

#[test]
fn test_qr_without_producer_is_placeholder() {
    let mut doc = Document::new(60, 60);
    doc.push(Element::new("qr", QrCode::new("https://verify.example/abc")).sized(60.0, 60.0));
    let s = render(&doc).unwrap();
    // Frame rows above the centered label.
    assert_eq!(s.pixel(0, 5), Some(Color::BLACK));
    assert_eq!(s.pixel(1, 5), Some(Color::BLACK));
    assert_eq!(s.pixel(3, 5), Some(Color::WHITE));
}

#[test]
fn test_json_round_trip_renders_identically() {
    let doc = greeting_template();
    let again = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(again, doc);
    assert_eq!(render(&again).unwrap(), render(&doc).unwrap());
}

#[test]
fn test_png_export() {
    let png = render(&greeting_template()).unwrap().to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (200, 100));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn test_limits_reject_before_painting() {
    let doc = Document::new(3000, 3000);
    let err = Renderer::new().with_limits(RenderLimits::PREVIEW).render(&doc).unwrap_err();
    assert!(matches!(err, CanvasError::ResourceLimitExceeded { .. }));
}

#[test]
fn test_huge_font_size_renders() {
    let doc = Document::from_json(
        r##"{
            "width": 120, "height": 60,
            "elements": [{
                "id": "t", "type": "Text", "content": "abc",
                "position": {"x": 10, "y": 10}, "size": {"width": 100, "height": 40},
                "styling": {"fontSize": 1e30}
            }]
        }"##,
    )
    .unwrap();
    let s = render(&doc).unwrap();
    assert_eq!(s.pixel(5, 5), Some(Color::WHITE));
}

// ============================================================================
// BATCH
// ============================================================================

#[test]
fn test_batch_matches_single_renders() {
    let doc = greeting_template();
    let maps: Vec<SubstitutionMap> = ["Ada", "Grace", "Edsger"]
        .into_iter()
        .map(|name| SubstitutionMap::new().with("name", name))
        .collect();

    let results = render_batch(&doc, &maps);
    assert_eq!(results.len(), maps.len());
    for (result, map) in results.iter().zip(&maps) {
        let single = render(&substitute(&doc, map)).unwrap();
        assert_eq!(result.as_ref().unwrap(), &single);
    }
}
