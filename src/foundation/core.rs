pub use kurbo::{Affine, Point, Rect, Vec2};

/// Millisecond timestamp on the host's monotonic animation clock.
///
/// The zero point is whatever the host's clock says it is; the engine only
/// ever works with differences, so any monotonic source works.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Millis(pub f64);

impl Millis {
    /// The clock origin.
    pub const ZERO: Self = Millis(0.0);

    /// Milliseconds elapsed since `earlier`. May be negative for
    /// out-of-order timestamps; callers clamp.
    pub fn since(self, earlier: Millis) -> f64 {
        self.0 - earlier.0
    }

    /// This timestamp expressed in seconds.
    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }
}

/// Logical (pre-DPR) surface dimensions in CSS-pixel-like units.
///
/// Always at least 1×1: containers can briefly report zero extents during
/// layout, and drawing code must never see a degenerate or non-finite size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Logical width, >= 1.
    pub width: f64,
    /// Logical height, >= 1.
    pub height: f64,
}

impl SurfaceSize {
    /// Build a size from raw container dimensions, clamping degenerate or
    /// non-finite values up to 1.
    pub fn clamped(width: f64, height: f64) -> Self {
        fn sane(v: f64) -> f64 {
            if v.is_finite() { v.max(1.0) } else { 1.0 }
        }
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// The shorter side, used as the scale basis by square-ish effects.
    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }

    /// Center of the surface.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Device pixel ratio, clamped to `[1, 2]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dpr(f64);

impl Dpr {
    /// Clamp a reported device pixel ratio into the supported range.
    pub fn new(ratio: f64) -> Self {
        let r = if ratio.is_finite() { ratio } else { 1.0 };
        Self(r.clamp(1.0, 2.0))
    }

    /// The effective ratio.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Dpr {
    fn default() -> Self {
        Self(1.0)
    }
}
