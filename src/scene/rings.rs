use kurbo::Point;

use crate::{
    animation::reveal::stagger,
    foundation::{
        error::{ScintillaError, ScintillaResult},
        math::clamp01,
    },
    render::painter::Painter,
    scene::{Effect, FrameCtx},
};

/// One concentric ring of the logogram.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RingSpec {
    /// Radius as a ratio of the surface's shorter side.
    pub radius: f64,
    /// Dash pattern in logical units, `None` for a solid stroke.
    pub dash: Option<[f32; 2]>,
    /// Rotation speed in radians per millisecond.
    pub speed: f64,
    /// Rotation direction, `1.0` or `-1.0`.
    pub dir: f64,
    /// Phase offset for the breathing oscillation, in milliseconds.
    pub breath_delay_ms: f64,
    /// Stroke opacity at full reveal.
    pub opacity: f64,
    /// Whether the ring's interior gets a faint fill once drawn in.
    pub fill: bool,
}

/// A dot riding along one of the rings.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct DotSpec {
    /// Index into [`RingsConfig::rings`].
    pub ring: usize,
    /// Initial angle in radians.
    pub angle: f64,
    /// Orbit speed in radians per millisecond, sign giving direction.
    pub speed: f64,
    /// Dot radius in logical units.
    pub size: f64,
}

/// Configuration for the concentric-rings logogram.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RingsConfig {
    /// Rings, outermost first.
    pub rings: Vec<RingSpec>,
    /// Orbiting dots.
    pub dots: Vec<DotSpec>,
    /// Ink color.
    #[serde(default = "default_ink")]
    pub ink: [u8; 3],
}

fn default_ink() -> [u8; 3] {
    [0, 51, 70]
}

impl Default for RingsConfig {
    fn default() -> Self {
        let ring = |radius, dash, speed: f64, dir, breath_delay_ms, opacity, fill| RingSpec {
            radius,
            dash,
            speed,
            dir,
            breath_delay_ms,
            opacity,
            fill,
        };
        Self {
            rings: vec![
                ring(0.44, Some([6.0, 8.0]), 0.00012, 1.0, 0.0, 0.18, false),
                ring(0.36, Some([3.0, 5.0]), 0.00025, -1.0, -1500.0, 0.30, false),
                ring(0.28, Some([5.0, 6.0]), 0.00018, 1.0, -3000.0, 0.40, false),
                ring(0.20, Some([2.0, 4.0]), 0.00030, -1.0, -4500.0, 0.50, false),
                ring(0.11, None, 0.0, 1.0, -6000.0, 0.60, true),
            ],
            dots: vec![
                DotSpec { ring: 0, angle: 0.0, speed: 0.0006, size: 2.0 },
                DotSpec { ring: 0, angle: std::f64::consts::PI, speed: 0.0006, size: 1.5 },
                DotSpec { ring: 1, angle: 1.2, speed: -0.0008, size: 2.0 },
                DotSpec { ring: 1, angle: 3.8, speed: -0.0008, size: 1.2 },
                DotSpec { ring: 2, angle: 0.5, speed: 0.001, size: 2.2 },
                DotSpec { ring: 2, angle: 2.8, speed: 0.001, size: 1.4 },
                DotSpec { ring: 3, angle: 2.0, speed: -0.0014, size: 1.8 },
                DotSpec { ring: 3, angle: 5.0, speed: -0.0014, size: 1.0 },
            ],
            ink: default_ink(),
        }
    }
}

/// Concentric counter-rotating rings with orbiting dots, drawn in as
/// partial arcs during the reveal.
///
/// Everything here is a pure function of the timestamp, so `update` has
/// nothing to advance.
pub struct RingsEffect {
    config: RingsConfig,
}

impl RingsEffect {
    /// Validate the configuration and build the effect.
    pub fn new(config: RingsConfig) -> ScintillaResult<Self> {
        if config.rings.is_empty() {
            return Err(ScintillaError::validation("rings config needs rings"));
        }
        for dot in &config.dots {
            if dot.ring >= config.rings.len() {
                return Err(ScintillaError::validation(format!(
                    "ring dot references missing ring {}",
                    dot.ring
                )));
            }
        }
        Ok(Self { config })
    }

    fn breath_scale(&self, ring: &RingSpec, t: f64, looping: bool) -> f64 {
        let amp = if looping { 0.025 } else { 0.0 };
        1.0 + ((t + ring.breath_delay_ms) * 0.0006).sin() * amp
    }
}

impl Effect for RingsEffect {
    fn update(&mut self, _ctx: &FrameCtx, _dt_ms: f64) {}

    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        painter.clear_transparent();
        let basis = ctx.size.min_side();
        let center = ctx.size.center();
        let t = ctx.t.0;
        let ink = self.config.ink;
        let count = self.config.rings.len();

        for (i, ring) in self.config.rings.iter().enumerate() {
            let ring_p = stagger(ctx.reveal, i, count, 2.0);
            if ring_p <= 0.0 {
                continue;
            }

            let r = ring.radius * basis * self.breath_scale(ring, t, ctx.looping);
            let rotation = if ctx.looping { t * ring.speed * ring.dir } else { 0.0 };
            let start = -std::f64::consts::FRAC_PI_2 + rotation;
            let sweep = std::f64::consts::TAU * ring_p;

            if ring.fill && ring_p >= 1.0 {
                painter.fill_circle(center, r, [0, 0, 0], 0.02);
            }

            let width = if ring.radius > 0.35 { 0.5 } else { 1.0 };
            let dash = ring
                .dash
                .as_ref()
                .map(|d| (&d[..], (-t * 0.01 * ring.dir) as f32));
            painter.stroke_arc(center, r, start, sweep, width, ink, ring.opacity * ring_p, dash);
        }

        if ctx.looping {
            for dot in &self.config.dots {
                let ring = &self.config.rings[dot.ring];
                let r = ring.radius * basis * self.breath_scale(ring, t, true);
                // Dot angle includes its own orbit plus the ring rotation.
                let angle = dot.angle + t * dot.speed + t * ring.speed * ring.dir;
                let pos = Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r);

                painter.radial_glow(pos, dot.size * 3.0, ink, 0.3);
                let pulse = clamp01(0.5 + (t * 0.002 + dot.angle).sin() * 0.2);
                painter.fill_circle(pos, dot.size, ink, pulse);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Millis, SurfaceSize};
    use crate::render::surface::Surface;

    fn ctx(t: f64, reveal: f64, looping: bool) -> FrameCtx {
        FrameCtx {
            t: Millis(t),
            elapsed_ms: t,
            reveal,
            looping,
            size: SurfaceSize::clamped(280.0, 280.0),
        }
    }

    fn ink_count(fx: &RingsEffect, c: &FrameCtx) -> usize {
        let mut surface = Surface::new(280.0, 280.0, 1.0).unwrap();
        let mut p = surface.painter();
        fx.render(&mut p, c).unwrap();
        drop(p);
        surface
            .pixels()
            .chunks_exact(4)
            .filter(|px| px[3] != 0)
            .count()
    }

    #[test]
    fn rejects_dot_on_missing_ring() {
        let config = RingsConfig {
            dots: vec![DotSpec { ring: 12, angle: 0.0, speed: 0.0, size: 1.0 }],
            ..RingsConfig::default()
        };
        assert!(RingsEffect::new(config).is_err());
    }

    #[test]
    fn draw_in_accretes_pixels_monotonically() {
        let fx = RingsEffect::new(RingsConfig::default()).unwrap();
        let a = ink_count(&fx, &ctx(0.0, 0.0, false));
        let b = ink_count(&fx, &ctx(0.0, 0.5, false));
        let c = ink_count(&fx, &ctx(0.0, 1.0, false));
        assert_eq!(a, 0);
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn dots_appear_only_in_steady_state() {
        let fx = RingsEffect::new(RingsConfig::default()).unwrap();
        let without = ink_count(&fx, &ctx(1000.0, 1.0, false));
        let with = ink_count(&fx, &ctx(1000.0, 1.0, true));
        assert!(with > without);
    }

    #[test]
    fn rotation_moves_pixels_over_time() {
        let fx = RingsEffect::new(RingsConfig::default()).unwrap();
        let frame = |t: f64| {
            let mut surface = Surface::new(280.0, 280.0, 1.0).unwrap();
            let mut p = surface.painter();
            fx.render(&mut p, &ctx(t, 1.0, true)).unwrap();
            drop(p);
            surface.pixels().to_vec()
        };
        assert_ne!(frame(0.0), frame(700.0));
        assert_eq!(frame(700.0), frame(700.0));
    }
}
