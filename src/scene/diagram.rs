use kurbo::Point;

use crate::{
    animation::emphasis::Emphasis,
    foundation::{
        core::{Millis, SurfaceSize},
        error::{ScintillaError, ScintillaResult},
        math::clamp01,
    },
    render::painter::Painter,
    scene::{Effect, FrameCtx},
};

/// A labeled anchor on one of the diagram rings.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LabelSpec {
    /// Display text; carried as external configuration. The engine renders
    /// the label's halo/pill and exposes its emphasis, not glyphs.
    pub text: String,
    /// Anchor angle in radians.
    pub angle: f64,
}

impl LabelSpec {
    /// Shorthand constructor.
    pub fn new(text: &str, angle: f64) -> Self {
        Self {
            text: text.to_string(),
            angle,
        }
    }
}

/// Configuration for the concentric constraint diagram.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DiagramConfig {
    /// Labels on the innermost stroked ring, at cardinal anchors.
    pub cardinal: Vec<LabelSpec>,
    /// Labels on the middle ring, at diagonal anchors.
    pub diagonal: Vec<LabelSpec>,
    /// Items spread along the lower arc of the third ring.
    pub arc_items: Vec<String>,
    /// Pill nodes spaced evenly around the outermost ring.
    pub pills: Vec<String>,
    /// Primary ink for rings and dots.
    #[serde(default = "default_ink")]
    pub ink: [u8; 3],
    /// Bright highlight color for lit halos.
    #[serde(default = "default_highlight")]
    pub highlight: [u8; 3],
    /// Pill interior fill.
    #[serde(default = "default_pill_fill")]
    pub pill_fill: [u8; 3],
    /// Core disc color.
    #[serde(default = "default_core")]
    pub core: [u8; 3],
    /// How long a proximity hit keeps a label lit, in milliseconds.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: f64,
    /// Proximity threshold as a ratio of surface width.
    #[serde(default = "default_hit_radius_ratio")]
    pub hit_radius_ratio: f64,
}

fn default_ink() -> [u8; 3] {
    [254, 218, 179]
}

fn default_highlight() -> [u8; 3] {
    [255, 255, 255]
}

fn default_pill_fill() -> [u8; 3] {
    [0, 51, 70]
}

fn default_core() -> [u8; 3] {
    [255, 55, 0]
}

fn default_hold_ms() -> f64 {
    800.0
}

fn default_hit_radius_ratio() -> f64 {
    0.06
}

impl Default for DiagramConfig {
    fn default() -> Self {
        use std::f64::consts::PI;
        Self {
            cardinal: vec![
                LabelSpec::new("self-containment", -PI / 2.0),
                LabelSpec::new("persistence", 0.0),
                LabelSpec::new("interoperability", PI / 2.0),
                LabelSpec::new("observability", PI),
            ],
            diagonal: vec![
                LabelSpec::new("identity vs commitments", -PI * 0.25),
                LabelSpec::new("reconciliation", PI * 0.25),
                LabelSpec::new("explicit ambiguity", PI * 0.75),
                LabelSpec::new("attributable resolution", -PI * 0.75),
            ],
            arc_items: vec![
                "sdk".to_string(),
                "api".to_string(),
                "cli".to_string(),
                "visualizers".to_string(),
                "indexers".to_string(),
            ],
            pills: vec![
                "blockchains".to_string(),
                "databases".to_string(),
                "clouds".to_string(),
                "storage".to_string(),
                "runtimes".to_string(),
            ],
            ink: default_ink(),
            highlight: default_highlight(),
            pill_fill: default_pill_fill(),
            core: default_core(),
            hold_ms: default_hold_ms(),
            hit_radius_ratio: default_hit_radius_ratio(),
        }
    }
}

/// Ring geometry of the diagram, radii as ratios of the structure size.
/// Ring 0 is the unstroked core disc.
struct DiagRing {
    radius: f64,
    dash: Option<[f32; 2]>,
    line_width: f64,
    dir: f64,
    opacity: f64,
    breath_off_ms: f64,
}

const RINGS: [DiagRing; 5] = [
    DiagRing { radius: 0.16, dash: None, line_width: 0.0, dir: 1.0, opacity: 0.0, breath_off_ms: 0.0 },
    DiagRing { radius: 0.38, dash: None, line_width: 1.8, dir: 1.0, opacity: 0.40, breath_off_ms: 0.0 },
    DiagRing { radius: 0.60, dash: Some([6.0, 5.0]), line_width: 1.2, dir: -1.0, opacity: 0.30, breath_off_ms: 1500.0 },
    DiagRing { radius: 0.80, dash: Some([4.0, 8.0]), line_width: 0.8, dir: 1.0, opacity: 0.22, breath_off_ms: 3000.0 },
    DiagRing { radius: 0.97, dash: Some([2.0, 6.0]), line_width: 0.5, dir: -1.0, opacity: 0.15, breath_off_ms: 4500.0 },
];

/// Dots riding the diagram rings; `(ring, angle, speed, size)`.
const DOTS: [(usize, f64, f64, f64); 9] = [
    (0, 0.0, 0.0007, 2.2),
    (0, std::f64::consts::PI, 0.0007, 1.6),
    (1, 0.8, -0.0005, 2.0),
    (1, 3.5, -0.0005, 1.4),
    (2, 1.5, 0.00035, 1.8),
    (2, 4.2, 0.00035, 1.2),
    (3, 0.3, -0.0003, 1.5),
    (3, 2.7, -0.0003, 1.0),
    (3, 5.0, -0.0003, 1.3),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Band {
    Cardinal,
    Diagonal,
    Arc,
    Pill,
}

struct LabelState {
    band: Band,
    index: usize,
    angle: f64,
    /// Character count of the configured text, used to approximate the
    /// pill box since glyphs are not rasterized here.
    chars: usize,
    emphasis: Emphasis,
}

/// Concentric constraint diagram: rings wipe in with per-ring delays,
/// dots orbit, and each label lights up while a dot passes near it.
pub struct DiagramEffect {
    config: DiagramConfig,
    labels: Vec<LabelState>,
}

impl DiagramEffect {
    /// Validate the configuration and build the effect.
    pub fn new(config: DiagramConfig) -> ScintillaResult<Self> {
        if config.hold_ms <= 0.0 {
            return Err(ScintillaError::validation("diagram hold_ms must be > 0"));
        }
        if config.hit_radius_ratio <= 0.0 {
            return Err(ScintillaError::validation(
                "diagram hit_radius_ratio must be > 0",
            ));
        }

        let mut labels = Vec::new();
        let mut push = |band: Band, index: usize, angle: f64, text: &str| {
            labels.push(LabelState {
                band,
                index,
                angle,
                chars: text.chars().count(),
                emphasis: Emphasis::new(config.hold_ms),
            });
        };

        for (i, l) in config.cardinal.iter().enumerate() {
            push(Band::Cardinal, i, l.angle, &l.text);
        }
        for (i, l) in config.diagonal.iter().enumerate() {
            push(Band::Diagonal, i, l.angle, &l.text);
        }
        let arc_n = config.arc_items.len();
        for (i, text) in config.arc_items.iter().enumerate() {
            let angle = if arc_n > 1 {
                std::f64::consts::PI * 0.15
                    + (std::f64::consts::PI * 0.70 / (arc_n - 1) as f64) * i as f64
            } else {
                std::f64::consts::PI * 0.5
            };
            push(Band::Arc, i, angle, text);
        }
        let pill_n = config.pills.len().max(1);
        for (i, text) in config.pills.iter().enumerate() {
            let angle = -std::f64::consts::FRAC_PI_2
                + std::f64::consts::TAU * i as f64 / pill_n as f64;
            push(Band::Pill, i, angle, text);
        }

        Ok(Self { config, labels })
    }

    /// Emphasis value of every label at `now`, band by band, for hosts
    /// that render glyphs themselves.
    pub fn emphasis_values(&self, now: Millis) -> Vec<f64> {
        self.labels.iter().map(|l| l.emphasis.value(now)).collect()
    }

    fn geometry(size: SurfaceSize) -> (Point, f64) {
        let center = Point::new(size.width / 2.0, size.height * 0.46);
        let structure = size.width * 0.44;
        (center, structure)
    }

    fn ring_phase(reveal: f64, ring: usize) -> f64 {
        clamp01((reveal - ring as f64 * 0.12) / 0.3)
    }

    fn breath(t: f64, ring: &DiagRing, looping: bool) -> f64 {
        let amp = if looping { 0.008 } else { 0.0 };
        1.0 + ((t + ring.breath_off_ms) * 0.0005).sin() * amp
    }

    fn dot_pos(t: f64, dot: &(usize, f64, f64, f64), center: Point, structure: f64) -> Point {
        let ring = &RINGS[dot.0];
        let r = ring.radius * structure * Self::breath(t, ring, true);
        let angle = dot.1 + t * dot.2;
        Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
    }

    fn label_pos(
        &self,
        label: &LabelState,
        t: f64,
        looping: bool,
        center: Point,
        structure: f64,
    ) -> Point {
        let (ring, offset) = match label.band {
            Band::Cardinal => (1, 16.0),
            Band::Diagonal => (2, 14.0),
            Band::Arc => (3, 14.0),
            Band::Pill => (4, 0.0),
        };
        let r = RINGS[ring].radius * structure + offset;
        let drift = if label.band == Band::Pill && looping {
            (t * 0.0001 + label.index as f64 * 1.3).sin() * 0.006
        } else {
            0.0
        };
        let a = label.angle + drift;
        Point::new(center.x + a.cos() * r, center.y + a.sin() * r)
    }

    fn band_visibility(&self, band: Band, reveal: f64) -> f64 {
        match band {
            Band::Cardinal => {
                let e = Self::ring_phase(reveal, 1);
                if e > 0.65 { ((e - 0.65) * 2.8).min(1.0) } else { 0.0 }
            }
            Band::Diagonal => {
                let e = Self::ring_phase(reveal, 2);
                if e > 0.65 { ((e - 0.65) * 2.8).min(1.0) } else { 0.0 }
            }
            Band::Arc => {
                let e = Self::ring_phase(reveal, 3);
                if e > 0.6 { ((e - 0.6) * 2.5).min(1.0) } else { 0.0 }
            }
            Band::Pill => {
                let e = Self::ring_phase(reveal, 4);
                if e > 0.55 { ((e - 0.55) * 2.2).min(1.0) } else { 0.0 }
            }
        }
    }
}

impl Effect for DiagramEffect {
    fn update(&mut self, ctx: &FrameCtx, _dt_ms: f64) {
        if !ctx.looping {
            return;
        }
        let t = ctx.t.0;
        let (center, structure) = Self::geometry(ctx.size);
        let hit_radius = ctx.size.width * self.config.hit_radius_ratio;

        let dot_positions: Vec<Point> = DOTS
            .iter()
            .map(|dot| Self::dot_pos(t, dot, center, structure))
            .collect();
        let label_positions: Vec<Point> = self
            .labels
            .iter()
            .map(|l| self.label_pos(l, t, true, center, structure))
            .collect();

        // Re-trigger emphasis for every label a dot is currently near.
        for (label, pos) in self.labels.iter_mut().zip(&label_positions) {
            let hit = dot_positions
                .iter()
                .any(|d| (d.x - pos.x).hypot(d.y - pos.y) < hit_radius);
            if hit {
                label.emphasis.trigger(ctx.t);
            }
        }
    }

    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        painter.clear_transparent();
        let t = ctx.t.0;
        let rp = ctx.reveal;
        let (center, structure) = Self::geometry(ctx.size);
        let ink = self.config.ink;

        // Rings, outside in; ring 0 is the core disc, drawn last.
        for (i, ring) in RINGS.iter().enumerate().skip(1).rev() {
            let ring_p = Self::ring_phase(rp, i);
            if ring_p <= 0.0 || ring.opacity <= 0.0 {
                continue;
            }
            let r = ring.radius * structure * Self::breath(t, ring, ctx.looping);
            let offset = if ctx.looping { (-t * 0.006 * ring.dir) as f32 } else { 0.0 };
            let dash = ring.dash.as_ref().map(|d| (&d[..], offset));
            painter.stroke_arc(
                center,
                r,
                -std::f64::consts::FRAC_PI_2,
                std::f64::consts::TAU * ring_p,
                ring.line_width,
                ink,
                ring.opacity * ring_p,
                dash,
            );
        }

        if ctx.looping {
            for dot in &DOTS {
                let pos = Self::dot_pos(t, dot, center, structure);
                painter.radial_glow(pos, dot.3 * 3.5, ink, 0.35);
                let pulse = clamp01(0.6 + (t * 0.002 + dot.1).sin() * 0.15);
                painter.fill_circle(pos, dot.3, ink, pulse);
            }
        }

        // Label halos and pill nodes. Glyphs are the host's concern; the
        // emphasis state drives everything visible here.
        for label in &self.labels {
            let band_vis = self.band_visibility(label.band, rp);
            if band_vis <= 0.0 {
                continue;
            }
            let lit = if ctx.looping { label.emphasis.value(ctx.t) } else { 0.0 };
            let pos = self.label_pos(label, t, ctx.looping, center, structure);

            if label.band == Band::Pill {
                let font_size = (ctx.size.width * 0.014).max(9.0);
                let w = label.chars as f64 * font_size * 0.55 + 14.0;
                let h = font_size + 8.0;
                let scale = 1.0 + lit * 0.06;
                let fill_alpha = (0.85 + lit * 0.15) * band_vis;
                let stroke_alpha = (0.35 + lit * 0.45) * band_vis;
                painter.pill(
                    pos,
                    w * scale,
                    h * scale,
                    self.config.pill_fill,
                    fill_alpha,
                    ink,
                    stroke_alpha,
                    0.6,
                );
                if lit > 0.05 {
                    painter.radial_glow(pos, h * 1.6, self.config.highlight, 0.4 * lit * band_vis);
                }
            } else {
                // Anchor tick so the band reads even before a hit.
                painter.fill_circle(pos, 1.2, ink, 0.45 * band_vis);
                if lit > 0.05 {
                    painter.radial_glow(
                        pos,
                        12.0 * lit + 4.0,
                        self.config.highlight,
                        0.6 * lit * band_vis,
                    );
                }
            }
        }

        // Core disc blooms from the center.
        let e0 = Self::ring_phase(rp, 0);
        if e0 > 0.0 {
            let cr = RINGS[0].radius * structure * (e0 * 1.4).min(1.0);
            painter.fill_circle_radial(
                center,
                cr,
                &[
                    crate::render::painter::RadialStop::new(0.0, self.config.core, 0.95 * e0),
                    crate::render::painter::RadialStop::new(1.0, self.config.core, 0.98 * e0),
                ],
            );
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/diagram.rs"]
mod tests;
