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

/// Outline shape for an orbiting body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BodyShape {
    /// Plain circle.
    Circle,
    /// Four-point diamond.
    Diamond,
}

/// One body in the orbital hierarchy.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BodySpec {
    /// Display label; carried as external configuration, not rasterized.
    pub label: String,
    /// Orbit radius as a ratio of the surface basis; 0 pins the body to
    /// the center.
    pub orbit: f64,
    /// Initial orbital angle in radians.
    pub angle: f64,
    /// Orbital speed in radians per millisecond.
    pub speed: f64,
    /// Body radius in logical units.
    pub size: f64,
    /// Outline shape.
    pub shape: BodyShape,
    /// Index of the body this one orbits; `None` orbits the center.
    /// Must be smaller than this body's own index.
    pub parent: Option<usize>,
}

/// A dashed orbit path drawn beneath one body.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrbitPathSpec {
    /// Index into [`OrbitConfig::bodies`] of the orbiting body.
    pub body: usize,
    /// Dash pattern in logical units.
    pub dash: [f32; 2],
    /// Stroke opacity at full reveal.
    pub opacity: f64,
}

/// Configuration for the hierarchical orbital diagram.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrbitConfig {
    /// Bodies ordered root-first; parents precede children.
    pub bodies: Vec<BodySpec>,
    /// Orbit paths to render.
    pub paths: Vec<OrbitPathSpec>,
    /// Outline ink color.
    #[serde(default = "default_ink")]
    pub ink: [u8; 3],
    /// Interior accent color.
    #[serde(default = "default_accent")]
    pub accent: [u8; 3],
}

fn default_ink() -> [u8; 3] {
    [0, 51, 70]
}

fn default_accent() -> [u8; 3] {
    [255, 55, 0]
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            bodies: vec![
                BodySpec {
                    label: "star".to_string(),
                    orbit: 0.0,
                    angle: 0.0,
                    speed: 0.0,
                    size: 14.0,
                    shape: BodyShape::Circle,
                    parent: None,
                },
                BodySpec {
                    label: "planet".to_string(),
                    orbit: 0.28,
                    angle: 0.4,
                    speed: 0.0003,
                    size: 10.0,
                    shape: BodyShape::Circle,
                    parent: None,
                },
                BodySpec {
                    label: "moon".to_string(),
                    orbit: 0.14,
                    angle: 2.2,
                    speed: 0.0009,
                    size: 6.0,
                    shape: BodyShape::Circle,
                    parent: Some(1),
                },
                BodySpec {
                    label: "mote".to_string(),
                    orbit: 0.07,
                    angle: 4.5,
                    speed: 0.002,
                    size: 3.5,
                    shape: BodyShape::Diamond,
                    parent: Some(2),
                },
            ],
            paths: vec![
                OrbitPathSpec { body: 1, dash: [4.0, 6.0], opacity: 0.25 },
                OrbitPathSpec { body: 2, dash: [3.0, 5.0], opacity: 0.20 },
                OrbitPathSpec { body: 3, dash: [2.0, 3.0], opacity: 0.15 },
            ],
            ink: default_ink(),
            accent: default_accent(),
        }
    }
}

/// Concentric orbital hierarchy: each body circles its parent, orbit paths
/// draw in as dashed arcs, and faint parent→child lines appear late in the
/// reveal.
///
/// Positions are derived from the timestamp every frame, so `update` has
/// nothing to advance.
pub struct OrbitEffect {
    config: OrbitConfig,
}

impl OrbitEffect {
    /// Validate the configured hierarchy and build the effect.
    pub fn new(config: OrbitConfig) -> ScintillaResult<Self> {
        if config.bodies.is_empty() {
            return Err(ScintillaError::validation("orbit config needs bodies"));
        }
        for (i, body) in config.bodies.iter().enumerate() {
            if let Some(parent) = body.parent {
                if parent >= i {
                    return Err(ScintillaError::validation(format!(
                        "body {i} must orbit an earlier body, got parent {parent}"
                    )));
                }
            }
        }
        for path in &config.paths {
            if path.body >= config.bodies.len() {
                return Err(ScintillaError::validation(format!(
                    "orbit path references missing body {}",
                    path.body
                )));
            }
        }
        Ok(Self { config })
    }

    /// Resolve a body's position by walking its ancestry. Parents always
    /// have smaller indices, so the recursion terminates.
    fn body_pos(&self, i: usize, t: f64, basis: f64, center: Point) -> Point {
        let body = &self.config.bodies[i];
        if body.orbit == 0.0 {
            return center;
        }
        let anchor = match body.parent {
            Some(p) => self.body_pos(p, t, basis, center),
            None => center,
        };
        let r = body.orbit * basis;
        let angle = body.angle + t * body.speed;
        Point::new(anchor.x + angle.cos() * r, anchor.y + angle.sin() * r)
    }

    fn anchor_pos(&self, body: &BodySpec, t: f64, basis: f64, center: Point) -> Point {
        match body.parent {
            Some(p) => self.body_pos(p, t, basis, center),
            None => center,
        }
    }

    fn shape_points(pos: Point, shape: BodyShape, size: f64) -> Option<Vec<Point>> {
        match shape {
            BodyShape::Circle => None,
            BodyShape::Diamond => Some(vec![
                Point::new(pos.x, pos.y - size),
                Point::new(pos.x + size, pos.y),
                Point::new(pos.x, pos.y + size),
                Point::new(pos.x - size, pos.y),
            ]),
        }
    }
}

impl Effect for OrbitEffect {
    fn update(&mut self, _ctx: &FrameCtx, _dt_ms: f64) {}

    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        painter.clear_transparent();
        let basis = ctx.size.min_side();
        let center = ctx.size.center();
        let t = ctx.t.0;
        let rp = ctx.reveal;
        let ink = self.config.ink;

        // Orbit paths, cascading outward.
        for (i, path) in self.config.paths.iter().enumerate() {
            let ring_p = stagger(rp, i, self.config.paths.len(), 2.0);
            if ring_p <= 0.0 {
                continue;
            }
            let body = &self.config.bodies[path.body];
            let anchor = self.anchor_pos(body, t, basis, center);
            let breath_amp = if ctx.looping { 0.015 } else { 0.0 };
            let r = body.orbit * basis * (1.0 + (t * 0.0005 + i as f64 * 1.5).sin() * breath_amp);

            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            let offset = if ctx.looping { (-t * 0.008 * dir) as f32 } else { 0.0 };
            painter.stroke_arc(
                anchor,
                r,
                -std::f64::consts::FRAC_PI_2,
                std::f64::consts::TAU * ring_p,
                1.0,
                ink,
                (path.opacity * ring_p * 1.3).min(1.0),
                Some((&path.dash[..], offset)),
            );
        }

        // Bodies pop in root-first.
        for (i, body) in self.config.bodies.iter().enumerate() {
            let body_p = clamp01(rp * 3.0 - i as f64 * 0.3);
            if body_p <= 0.0 {
                continue;
            }
            let pos = self.body_pos(i, t, basis, center);
            let s = body.size * body_p;

            match Self::shape_points(pos, body.shape, s) {
                Some(pts) => {
                    painter.fill_polygon(&pts, self.config.accent, 0.08 * body_p);
                    painter.stroke_polygon(&pts, 1.2, ink, 0.55 * body_p);
                }
                None => {
                    painter.fill_circle(pos, s, self.config.accent, 0.08 * body_p);
                    painter.stroke_circle(pos, s, 1.2, ink, 0.55 * body_p, None);
                }
            }

            // Root body carries a center mark.
            if i == 0 && body_p > 0.5 {
                painter.fill_circle(pos, 2.5, ink, 0.4 * body_p);
            }
        }

        // Faint anchor-to-body lines, late in the reveal.
        if rp > 0.5 {
            let alpha = (rp - 0.5).min(0.5) * 2.0 * 0.08;
            for (i, body) in self.config.bodies.iter().enumerate().skip(1) {
                let pos = self.body_pos(i, t, basis, center);
                let anchor = self.anchor_pos(body, t, basis, center);
                painter.line(anchor, pos, 0.5, ink, alpha);
            }
        }

        Ok(())
    }
}
