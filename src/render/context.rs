//! Paint context: the transform an element layer is composited with and the
//! opacity every draw into that layer uses.
//!
//! A `PaintContext` is an immutable value. Each element derives its own from
//! [`PaintContext::ROOT`], so nothing one element sets can leak into the next.

use std::f32::consts::PI;

/// Sine and cosine of an angle in degrees, exact at right angles.
fn sin_cos_deg(deg: f32) -> (f32, f32) {
    let turn = deg.rem_euclid(360.0);
    if turn == 0.0 {
        (0.0, 1.0)
    } else if turn == 90.0 {
        (1.0, 0.0)
    } else if turn == 180.0 {
        (0.0, -1.0)
    } else if turn == 270.0 {
        (-1.0, 0.0)
    } else {
        (turn * PI / 180.0).sin_cos()
    }
}

/// A 2D affine map in canvas order:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(dx: f32, dy: f32) -> Self {
        Affine {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation about the origin. Positive angles turn +x toward +y
    /// on a y-down surface.
    pub fn rotation_deg(deg: f32) -> Self {
        let (sin_a, cos_a) = sin_cos_deg(deg);
        Affine {
            a: cos_a,
            b: sin_a,
            c: -sin_a,
            d: cos_a,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse map, or `None` for a degenerate transform.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` of the mapped
    /// rectangle `(0, 0)..(width, height)`.
    pub fn bounds(&self, width: f32, height: f32) -> (f32, f32, f32, f32) {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(width, 0.0),
            self.apply(0.0, height),
            self.apply(width, height),
        ];
        corners.iter().fold(
            (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Transform and opacity for one element.
///
/// Builder methods follow canvas semantics: each call applies to local
/// coordinates, before everything set up earlier.
///
/// ```
/// use certcanvas::render::PaintContext;
///
/// // Layer placed at (10, 20), turned 90° about (15, 25)
/// let ctx = PaintContext::ROOT.rotated_about(15.0, 25.0, 90.0).translated(10.0, 20.0);
/// assert_eq!(ctx.transform.apply(0.0, 0.0), (20.0, 20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintContext {
    /// Layer-local to surface coordinates.
    pub transform: Affine,
    /// Global alpha for every fill and stroke into the element layer, 0.0–1.0.
    pub opacity: f32,
}

impl PaintContext {
    pub const ROOT: PaintContext = PaintContext {
        transform: Affine::IDENTITY,
        opacity: 1.0,
    };

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            transform: Affine::translation(dx, dy).then(&self.transform),
            ..self
        }
    }

    /// Clockwise rotation by `deg` about `(cx, cy)`. Zero is a no-op.
    pub fn rotated_about(self, cx: f32, cy: f32, deg: f32) -> Self {
        if deg == 0.0 {
            return self;
        }
        let local = Affine::translation(-cx, -cy)
            .then(&Affine::rotation_deg(deg))
            .then(&Affine::translation(cx, cy));
        Self {
            transform: local.then(&self.transform),
            ..self
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            opacity: (self.opacity * opacity).clamp(0.0, 1.0),
            ..self
        }
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::ROOT
    }
}
