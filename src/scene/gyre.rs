use glam::DVec3;
use kurbo::Point;

use crate::{
    foundation::{
        error::ScintillaResult,
        math::{Rng64, clamp01, fractal_noise},
    },
    render::{
        painter::{Compose, Painter, RadialStop},
        post,
    },
    scene::{
        Effect, FrameCtx,
        space::{Projected, project, rotate_x, rotate_y, rotate_z},
    },
};

use std::f64::consts::{PI, TAU};

/// Spin axis of a gyroscope ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// One tilted great-circle ring of the gyroscope.
struct GyreRing {
    /// Radius in normalized units (ratio of the surface basis).
    radius: f64,
    /// Polyline resolution.
    segments: usize,
    line_width: f64,
    tilt: (f64, f64, f64),
    spin_axis: Axis,
    /// Radians per millisecond about the spin axis.
    spin_speed: f64,
    /// Accumulated spin, advanced each update.
    spin_angle: f64,
    opacity: f64,
    dash: Option<[f32; 2]>,
    /// Delay before this ring blooms in, milliseconds of elapsed time.
    bloom_delay_ms: f64,
}

/// A particle riding one of the rings.
struct Rider {
    ring: usize,
    angle: f64,
    speed: f64,
    size: f64,
    base_alpha: f64,
    bloom_delay_ms: f64,
    bloom: f64,
}

/// Free-floating ambient dust in normalized device-independent units;
/// positions simply re-project at the current scale after a resize.
struct Dust {
    pos: DVec3,
    /// Units per millisecond.
    vel: DVec3,
    size: f64,
    base_alpha: f64,
    bloom_delay_ms: f64,
    bloom: f64,
}

/// A small ring orbiting tight around the core.
struct InnerRing {
    radius: f64,
    tilt_x: f64,
    tilt_y: f64,
    speed: f64,
    angle: f64,
    opacity: f64,
    width: f64,
}

struct Core {
    radius: f64,
    pulse_phase: f64,
    bloom: f64,
    bloom_delay_ms: f64,
    inner_rings: Vec<InnerRing>,
}

/// Configuration for the gyroscopic sphere.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GyreConfig {
    /// Determinism seed for particle placement and grain.
    #[serde(default)]
    pub seed: u64,
    /// Perspective field-of-view distance.
    #[serde(default = "default_fov")]
    pub fov: f64,
    /// Opaque background color.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    /// Number of free-floating dust particles.
    #[serde(default = "default_dust_count")]
    pub dust_count: usize,
    /// Film-grain speckles per frame.
    #[serde(default = "default_grain_speckles")]
    pub grain_speckles: u32,
}

fn default_fov() -> f64 {
    600.0
}

fn default_background() -> [u8; 3] {
    [0x1A, 0x18, 0x16]
}

fn default_dust_count() -> usize {
    25
}

fn default_grain_speckles() -> u32 {
    20
}

impl Default for GyreConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            fov: default_fov(),
            background: default_background(),
            dust_count: default_dust_count(),
            grain_speckles: default_grain_speckles(),
        }
    }
}

fn stock_rings() -> Vec<GyreRing> {
    let ring = |radius,
                segments,
                line_width,
                tilt,
                spin_axis,
                spin_speed: f64,
                opacity,
                dash,
                bloom_delay_ms| GyreRing {
        radius,
        segments,
        line_width,
        tilt,
        spin_axis,
        spin_speed,
        spin_angle: 0.0,
        opacity,
        dash,
        bloom_delay_ms,
    };
    vec![
        // Inner rings, spread wide from the core.
        ring(0.22, 100, 2.0, (0.3, 0.0, 0.0), Axis::Y, 0.0005, 0.65, None, 200.0),
        ring(0.28, 100, 1.7, (PI * 0.42, PI * 0.15, 0.0), Axis::X, -0.00042, 0.50, None, 350.0),
        ring(0.25, 100, 1.2, (PI * 0.52, 0.0, PI * 0.3), Axis::Z, 0.000378, 0.35, Some([4.0, 5.0]), 500.0),
        // Middle rings.
        ring(0.36, 140, 1.3, (0.15, PI * 0.25, 0.0), Axis::Y, 0.000294, 0.32, None, 650.0),
        ring(0.40, 140, 1.1, (PI * 0.35, 0.0, PI * 0.5), Axis::X, -0.000252, 0.26, Some([5.0, 7.0]), 800.0),
        ring(0.34, 120, 1.0, (PI * 0.6, PI * 0.4, 0.0), Axis::Z, 0.000336, 0.22, Some([3.0, 4.0]), 750.0),
        // Outer rings, slower and fainter.
        ring(0.42, 180, 0.9, (0.1, PI * 0.1, PI * 0.2), Axis::Y, 0.000168, 0.18, Some([2.0, 4.0]), 1000.0),
        ring(0.46, 180, 0.7, (PI * 0.45, PI * 0.3, 0.0), Axis::X, -0.000147, 0.14, Some([2.0, 3.0]), 1200.0),
        // Widest pair filling the frame.
        ring(0.58, 220, 0.6, (PI * 0.12, PI * 0.08, PI * 0.35), Axis::Z, 0.00012, 0.11, Some([2.0, 6.0]), 1400.0),
        ring(0.72, 260, 0.5, (PI * 0.3, PI * 0.18, 0.0), Axis::Y, -0.0001, 0.08, Some([1.0, 5.0]), 1600.0),
    ]
}

const RIDERS_PER_RING: [usize; 10] = [10, 8, 8, 7, 6, 5, 4, 4, 5, 6];

/// 3D-projected gyroscopic sphere: tilted spinning rings, ring-rider and
/// ambient-dust particles, a pulsing noise-flared core, a heartbeat light
/// wave, proximity connections, HUD markings and a glow/vignette/grain
/// post stack.
pub struct GyreEffect {
    config: GyreConfig,
    rings: Vec<GyreRing>,
    riders: Vec<Rider>,
    dust: Vec<Dust>,
    core: Core,
    heartbeat_phase: f64,
    bloom: f64,
    tilt: (f64, f64),
    pointer: Option<(f64, f64)>,
    intro_skipped: bool,
}

impl GyreEffect {
    /// Build the effect, placing particles deterministically from the
    /// configured seed.
    pub fn new(config: GyreConfig) -> Self {
        let rings = stock_rings();
        let mut rng = Rng64::new(config.seed);

        let mut riders = Vec::new();
        for (r, ring) in rings.iter().enumerate() {
            let count = RIDERS_PER_RING.get(r).copied().unwrap_or(4);
            for _ in 0..count {
                let tier = if r < 3 { 1.3 } else { 0.8 };
                riders.push(Rider {
                    ring: r,
                    angle: rng.next_range(0.0, TAU),
                    speed: rng.next_range(0.00042, 0.00105) * tier,
                    size: rng.next_range(1.0, 2.8),
                    base_alpha: rng.next_range(0.35, 0.8),
                    bloom_delay_ms: ring.bloom_delay_ms + rng.next_range(200.0, 500.0),
                    bloom: 0.0,
                });
            }
        }

        let mut dust = Vec::new();
        for _ in 0..config.dust_count {
            dust.push(Dust {
                pos: DVec3::new(
                    rng.next_range(-0.55, 0.55),
                    rng.next_range(-0.55, 0.55),
                    rng.next_range(-0.25, 0.25),
                ),
                vel: DVec3::new(
                    rng.next_range(-0.0000105, 0.0000105),
                    rng.next_range(-0.0000105, 0.0000105),
                    rng.next_range(-0.0000063, 0.0000063),
                ),
                size: rng.next_range(0.5, 1.5),
                base_alpha: rng.next_range(0.1, 0.25),
                bloom_delay_ms: rng.next_range(1500.0, 2100.0),
                bloom: 0.0,
            });
        }

        let core = Core {
            radius: 0.06,
            pulse_phase: 0.0,
            bloom: 0.0,
            bloom_delay_ms: 0.0,
            inner_rings: vec![
                InnerRing { radius: 0.11, tilt_x: 0.8, tilt_y: 0.0, speed: 0.00126, angle: 0.0, opacity: 0.35, width: 0.8 },
                InnerRing { radius: 0.14, tilt_x: 0.0, tilt_y: 1.2, speed: -0.00105, angle: PI * 0.7, opacity: 0.25, width: 0.7 },
                InnerRing { radius: 0.125, tilt_x: 1.4, tilt_y: 0.5, speed: 0.00084, angle: PI * 1.3, opacity: 0.2, width: 0.6 },
            ],
        };

        Self {
            config,
            rings,
            riders,
            dust,
            core,
            heartbeat_phase: 0.0,
            bloom: 0.0,
            tilt: (0.0, 0.0),
            pointer: None,
            intro_skipped: false,
        }
    }

    /// Overall bloom-in level, for hosts coordinating surrounding chrome.
    pub fn bloom(&self) -> f64 {
        self.bloom
    }

    fn ring_point(&self, ring: &GyreRing, angle: f64, basis: f64) -> DVec3 {
        let r = ring.radius * basis;
        let mut p = DVec3::new(angle.cos() * r, angle.sin() * r, 0.0);
        p = rotate_x(p, ring.tilt.0);
        p = rotate_y(p, ring.tilt.1);
        if ring.tilt.2 != 0.0 {
            p = rotate_z(p, ring.tilt.2);
        }
        match ring.spin_axis {
            Axis::X => rotate_x(p, ring.spin_angle),
            Axis::Y => rotate_y(p, ring.spin_angle),
            Axis::Z => rotate_z(p, ring.spin_angle),
        }
    }

    fn inner_ring_point(&self, ir: &InnerRing, angle: f64, basis: f64) -> DVec3 {
        let r = ir.radius * basis;
        let mut p = DVec3::new(angle.cos() * r, angle.sin() * r, 0.0);
        p = rotate_x(p, ir.tilt_x);
        p = rotate_y(p, ir.tilt_y);
        p = rotate_y(p, ir.angle);
        rotate_x(p, ir.angle * 0.3)
    }

    /// Slow ambient rotation of the whole assembly plus pointer tilt.
    fn orient(&self, p: DVec3, t: f64) -> DVec3 {
        let mut pt = rotate_y(p, t * 0.0000336);
        pt = rotate_x(pt, t * 0.0000168);
        pt = rotate_x(pt, self.tilt.0);
        rotate_y(pt, self.tilt.1)
    }

    fn projected_particles(&self, t: f64, cx: f64, cy: f64, basis: f64) -> Vec<ParticleSprite> {
        let mut items = Vec::with_capacity(self.riders.len() + self.dust.len());
        let mut push = |bloom: f64, base_alpha: f64, size: f64, p: DVec3| {
            if bloom < 0.01 {
                return;
            }
            let proj = project(self.orient(p, t), cx, cy, self.config.fov);
            items.push(ParticleSprite {
                proj,
                size: size * proj.scale,
                alpha: base_alpha * bloom,
                bloom,
            });
        };
        for r in &self.riders {
            let p = self.ring_point(&self.rings[r.ring], r.angle, basis);
            push(r.bloom, r.base_alpha, r.size, p);
        }
        for d in &self.dust {
            push(d.bloom, d.base_alpha, d.size, d.pos * basis);
        }
        items
    }

    fn draw_particles(&self, painter: &mut Painter<'_>, t: f64, cx: f64, cy: f64, basis: f64) {
        let mut items = self.projected_particles(t, cx, cy, basis);
        // Painter's order, far to near.
        items.sort_by(|a, b| b.proj.depth.total_cmp(&a.proj.depth));

        for item in items {
            let depth_fade =
                0.2 + 0.8 * clamp01((item.proj.depth + basis * 0.5) / basis);
            let alpha = item.alpha * depth_fade;
            let sz = item.size.max(0.5);
            let pos = Point::new(item.proj.x, item.proj.y);

            painter.radial_glow(pos, (sz * 5.0).max(1.0), [255, 255, 255], alpha * 0.35);
            painter.fill_circle(pos, sz, [255, 255, 255], alpha);
        }
    }

    fn draw_connections(&self, painter: &mut Painter<'_>, t: f64, cx: f64, cy: f64, basis: f64) {
        if self.bloom < 0.3 {
            return;
        }
        let items: Vec<ParticleSprite> = self
            .projected_particles(t, cx, cy, basis)
            .into_iter()
            .filter(|i| i.bloom >= 0.2)
            .collect();

        let max_dist = basis * 0.18;
        let max_dist_sq = max_dist * max_dist;

        painter.set_compose(Compose::Add);
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                let dx = items[i].proj.x - items[j].proj.x;
                let dy = items[i].proj.y - items[j].proj.y;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq > max_dist_sq {
                    continue;
                }
                let proximity = 1.0 - dist_sq.sqrt() / max_dist;
                let depth_avg = (items[i].proj.scale + items[j].proj.scale) / 2.0;
                let alpha = proximity * proximity
                    * 0.12
                    * self.bloom
                    * items[i].bloom.min(items[j].bloom)
                    * depth_avg;
                painter.line(
                    Point::new(items[i].proj.x, items[i].proj.y),
                    Point::new(items[j].proj.x, items[j].proj.y),
                    0.3 + proximity * 0.4,
                    [255, 255, 255],
                    alpha,
                );
            }
        }
        painter.set_compose(Compose::Over);
    }

    fn draw_hud(&self, painter: &mut Painter<'_>, cx: f64, cy: f64, basis: f64) {
        let a = self.bloom;
        if a < 0.01 {
            return;
        }
        let white = [255, 255, 255];

        // Crosshair.
        let cl = basis * 0.55;
        painter.line(Point::new(cx - cl, cy), Point::new(cx + cl, cy), 0.4, white, 0.025 * a);
        painter.line(Point::new(cx, cy - cl), Point::new(cx, cy + cl), 0.4, white, 0.025 * a);

        // Tick ring.
        let tr = basis * 0.50;
        let tick_count = 96;
        for i in 0..tick_count {
            let ang = TAU * f64::from(i) / f64::from(tick_count);
            let major = i % 6 == 0;
            let len = if major { basis * 0.016 } else { basis * 0.008 };
            let alpha = if major { 0.05 } else { 0.025 };
            let width = if major { 0.5 } else { 0.3 };
            painter.line(
                Point::new(cx + ang.cos() * tr, cy + ang.sin() * tr),
                Point::new(cx + ang.cos() * (tr + len), cy + ang.sin() * (tr + len)),
                width,
                white,
                alpha * a,
            );
        }

        // Guide circles.
        for r in [0.16, 0.30, 0.44] {
            painter.stroke_circle(
                Point::new(cx, cy),
                r * basis,
                0.3,
                white,
                0.02 * a,
                Some((&[2.0, 6.0], 0.0)),
            );
        }
    }

    fn draw_ring(
        &self,
        painter: &mut Painter<'_>,
        ring: &GyreRing,
        t: f64,
        cx: f64,
        cy: f64,
        basis: f64,
        ring_bloom: f64,
    ) {
        if ring_bloom < 0.01 {
            return;
        }
        let points: Vec<Projected> = (0..=ring.segments)
            .map(|i| {
                let angle = TAU * i as f64 / ring.segments as f64;
                let p = self.orient(self.ring_point(ring, angle, basis), t);
                project(p, cx, cy, self.config.fov)
            })
            .collect();

        for pair in points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            let avg_z = (p0.depth + p1.depth) / 2.0;
            let depth_fade = 0.2 + 0.8 * ((avg_z + basis * 0.5) / basis);
            let alpha = ring.opacity * ring_bloom * depth_fade.clamp(0.05, 1.0);
            let width = ring.line_width * (0.4 + 0.6 * p0.scale);
            let a = Point::new(p0.x, p0.y);
            let b = Point::new(p1.x, p1.y);
            match &ring.dash {
                Some(d) => painter.dashed_line(a, b, width, [255, 255, 255], alpha, (&d[..], 0.0)),
                None => painter.line(a, b, width, [255, 255, 255], alpha),
            }
        }
    }

    fn heartbeat_pulse(&self) -> f64 {
        let phase = self.heartbeat_phase.fract();
        let primary = (phase * TAU).sin().max(0.0).powf(1.5);
        let echo = (((phase + 0.15).fract()) * TAU).sin().max(0.0).powf(1.5) * 0.4;
        (primary + echo).min(1.0)
    }

    fn draw_heartbeat(&self, painter: &mut Painter<'_>, cx: f64, cy: f64, basis: f64) {
        if self.bloom < 0.5 {
            return;
        }
        let phase = self.heartbeat_phase.fract();
        let waves = [(phase, 1.0), ((phase + 0.15).fract(), 0.5)];

        painter.set_compose(Compose::Add);
        for (p, strength) in waves {
            let radius = p * basis * 0.85;
            let fade_in = (p * 8.0).min(1.0);
            let fade_out = 1.0 - p.powf(0.6);
            let alpha = fade_in * fade_out * 0.04 * strength * self.bloom;
            if alpha < 0.001 || radius < 1.0 {
                continue;
            }
            let ring_width = basis * 0.12;
            let inner = (radius - ring_width).max(0.0);
            painter.radial(
                Point::new(cx, cy),
                inner,
                radius,
                &[
                    RadialStop::new(0.0, [180, 20, 0], 0.0),
                    RadialStop::new(0.2, [200, 40, 0], alpha * 0.4),
                    RadialStop::new(0.5, [255, 120, 30], alpha),
                    RadialStop::new(0.8, [200, 40, 0], alpha * 0.4),
                    RadialStop::new(1.0, [140, 10, 0], 0.0),
                ],
            );
        }
        painter.set_compose(Compose::Over);
    }

    fn draw_core(&self, painter: &mut Painter<'_>, t: f64, cx: f64, cy: f64, basis: f64) {
        let b = self.core.bloom;
        if b < 0.01 {
            return;
        }
        let center = Point::new(cx, cy);
        let hb = self.heartbeat_pulse();
        let ci = 1.0 + hb * 1.2;

        let pulse = (self.core.pulse_phase).sin() * 0.04;
        let swell = 1.0 + hb * 0.1;
        let r = self.core.radius * basis * (1.0 + pulse) * b * swell;
        if r <= 0.0 {
            return;
        }

        // Wide corona.
        painter.set_compose(Compose::Add);
        painter.radial(
            center,
            r * 0.95,
            r * (5.5 + hb * 3.5),
            &[
                RadialStop::new(0.0, [220, 60, 5], 0.22 * ci * b),
                RadialStop::new(0.08, [200, 45, 0], 0.18 * ci * b),
                RadialStop::new(0.22, [170, 25, 0], 0.12 * ci * b),
                RadialStop::new(0.45, [130, 12, 0], 0.06 * ci * b),
                RadialStop::new(0.7, [90, 5, 0], 0.025 * ci * b),
                RadialStop::new(1.0, [50, 0, 0], 0.0),
            ],
        );

        // Mid corona.
        painter.radial(
            center,
            r * 0.85,
            r * (3.0 + hb * 1.8),
            &[
                RadialStop::new(0.0, [255, 100, 15], 0.24 * ci * b),
                RadialStop::new(0.15, [255, 75, 5], 0.16 * ci * b),
                RadialStop::new(0.4, [240, 45, 0], 0.08 * ci * b),
                RadialStop::new(0.7, [200, 20, 0], 0.03 * ci * b),
                RadialStop::new(1.0, [150, 10, 0], 0.0),
            ],
        );

        // Inner rim light.
        painter.radial(
            center,
            r * 0.8,
            r * (1.9 + hb * 0.7),
            &[
                RadialStop::new(0.0, [255, 150, 40], 0.20 * ci * b),
                RadialStop::new(0.25, [255, 110, 15], 0.14 * ci * b),
                RadialStop::new(0.55, [255, 65, 0], 0.06 * ci * b),
                RadialStop::new(1.0, [230, 30, 0], 0.0),
            ],
        );

        self.draw_flares(painter, t, center, r, hb, ci, b);
        painter.set_compose(Compose::Over);

        // Inner mini-rings hugging the core.
        for ir in &self.core.inner_rings {
            let segs = 60;
            let pts: Vec<Projected> = (0..=segs)
                .map(|i| {
                    let a = TAU * f64::from(i) / f64::from(segs);
                    let p = self.orient(self.inner_ring_point(ir, a, basis), t);
                    project(p, cx, cy, self.config.fov)
                })
                .collect();
            for pair in pts.windows(2) {
                let (p0, p1) = (pair[0], pair[1]);
                let depth_fade = 0.3 + 0.7 * ((p0.depth + basis * 0.3) / (basis * 0.6));
                let alpha = ir.opacity * b * depth_fade.clamp(0.06, 1.0);
                painter.line(
                    Point::new(p0.x, p0.y),
                    Point::new(p1.x, p1.y),
                    ir.width * (0.5 + 0.5 * p0.scale),
                    [255, 255, 255],
                    alpha,
                );
            }
        }

        // Star surface with limb darkening toward the edge.
        let g = |base: f64, boost: f64| (base + hb * boost).round().clamp(0.0, 255.0) as u8;
        painter.radial(
            center,
            0.0,
            r * 1.4,
            &[
                RadialStop::new(0.0, [255, g(180.0, 15.0), g(55.0, 20.0)], b),
                RadialStop::new(0.15, [255, g(168.0, 12.0), g(38.0, 14.0)], b),
                RadialStop::new(0.35, [255, g(148.0, 10.0), g(20.0, 8.0)], b),
                RadialStop::new(0.52, [255, g(130.0, 8.0), g(12.0, 5.0)], 0.98 * b),
                RadialStop::new(0.66, [250, g(105.0, 6.0), g(5.0, 3.0)], 0.92 * b),
                RadialStop::new(0.76, [240, g(78.0, 5.0), g(0.0, 2.0)], 0.82 * b),
                RadialStop::new(0.86, [225, g(55.0, 4.0), 0], 0.45 * b),
                RadialStop::new(0.94, [210, 35, 0], 0.15 * b),
                RadialStop::new(1.0, [180, 20, 0], 0.0),
            ],
        );

        // Limb brightening.
        painter.set_compose(Compose::Add);
        let li = 0.20 + hb * 0.16;
        painter.radial(
            center,
            r * 0.55,
            r * 1.8,
            &[
                RadialStop::new(0.0, [255, 130, 25], 0.0),
                RadialStop::new(0.40, [255, 115, 12], li * 0.06 * b),
                RadialStop::new(0.58, [255, 90, 5], li * 0.14 * b),
                RadialStop::new(0.72, [250, 65, 0], li * 0.12 * b),
                RadialStop::new(0.85, [230, 40, 0], li * 0.05 * b),
                RadialStop::new(1.0, [180, 15, 0], 0.0),
            ],
        );
        painter.set_compose(Compose::Over);
    }

    /// Noise-driven flare tendrils kissing the core surface, four rotating
    /// layers deep.
    #[allow(clippy::too_many_arguments)]
    fn draw_flares(
        &self,
        painter: &mut Painter<'_>,
        t: f64,
        center: Point,
        r: f64,
        hb: f64,
        ci: f64,
        b: f64,
    ) {
        let flare_time = t * 0.00006;
        let resolution = 128;
        let seeds: [u64; 4] = [7, 23, 41, 59];
        let rotations = [
            t * 0.00004,
            -t * 0.000028,
            t * 0.000018,
            -t * 0.000012,
        ];

        for layer in 0..4usize {
            let lf = layer as f64;
            let base_reach = r * (0.92 + lf * 0.06);
            let extra = r * (0.15 + lf * 0.08 + hb * (0.12 + lf * 0.05));
            let layer_alpha = (0.14 - lf * 0.02) * ci * b;
            let time_offset = lf * 3.7;
            let rot = rotations[layer];
            let n_freq = 5.0 + lf;

            let pts: Vec<Point> = (0..=resolution)
                .map(|i| {
                    let angle = TAU * f64::from(i) / f64::from(resolution);
                    let n = fractal_noise(
                        angle / TAU * n_freq,
                        3,
                        seeds[layer],
                        flare_time + time_offset,
                    );
                    let tendril = n.powf(1.3);
                    let dist = base_reach + tendril * extra;
                    let rot_angle = angle + rot;
                    Point::new(
                        center.x + rot_angle.cos() * dist,
                        center.y + rot_angle.sin() * dist,
                    )
                })
                .collect();

            let max_reach = base_reach + extra;
            let stops: Vec<RadialStop> = match layer {
                0 => vec![
                    RadialStop::new(0.0, [255, 150, 40], layer_alpha * 2.0),
                    RadialStop::new(0.35, [255, 110, 15], layer_alpha * 1.4),
                    RadialStop::new(0.65, [255, 70, 0], layer_alpha * 0.6),
                    RadialStop::new(1.0, [200, 30, 0], 0.0),
                ],
                1 => vec![
                    RadialStop::new(0.0, [255, 120, 20], layer_alpha * 1.6),
                    RadialStop::new(0.35, [255, 80, 5], layer_alpha * 1.0),
                    RadialStop::new(0.65, [230, 45, 0], layer_alpha * 0.4),
                    RadialStop::new(1.0, [160, 15, 0], 0.0),
                ],
                2 => vec![
                    RadialStop::new(0.0, [240, 75, 10], layer_alpha * 1.3),
                    RadialStop::new(0.4, [210, 40, 0], layer_alpha * 0.8),
                    RadialStop::new(1.0, [130, 10, 0], 0.0),
                ],
                _ => vec![
                    RadialStop::new(0.0, [210, 50, 5], layer_alpha * 1.1),
                    RadialStop::new(0.5, [160, 20, 0], layer_alpha * 0.5),
                    RadialStop::new(1.0, [90, 5, 0], 0.0),
                ],
            };

            painter.fill_polygon_radial(&pts, center, r * 0.7, max_reach, &stops);
        }
    }
}

/// A projected particle ready for sprite drawing.
struct ParticleSprite {
    proj: Projected,
    size: f64,
    alpha: f64,
    bloom: f64,
}

impl Effect for GyreEffect {
    fn update(&mut self, ctx: &FrameCtx, dt_ms: f64) {
        let elapsed = ctx.elapsed_ms;

        if self.bloom < 1.0 {
            self.bloom = (self.bloom + dt_ms * 0.0008).min(1.0);
        }
        if elapsed > self.core.bloom_delay_ms && self.core.bloom < 1.0 {
            self.core.bloom = (self.core.bloom + dt_ms * 0.0012).min(1.0);
        }
        self.core.pulse_phase += 0.0008 * dt_ms;
        // Roughly a 5.6 second full heartbeat cycle.
        self.heartbeat_phase += dt_ms * 0.00018;

        for ir in &mut self.core.inner_rings {
            ir.angle += ir.speed * dt_ms;
        }

        // Pointer eases the assembly toward the cursor, then relaxes home.
        match self.pointer {
            Some((mx, my)) => {
                self.tilt.0 += (my * 0.4 - self.tilt.0) * 0.05;
                self.tilt.1 += (mx * 0.4 - self.tilt.1) * 0.05;
            }
            None => {
                self.tilt.0 -= self.tilt.0 * 0.02;
                self.tilt.1 -= self.tilt.1 * 0.02;
            }
        }

        for ring in &mut self.rings {
            ring.spin_angle += ring.spin_speed * dt_ms;
        }

        for r in &mut self.riders {
            if elapsed > r.bloom_delay_ms && r.bloom < 1.0 {
                r.bloom = (r.bloom + dt_ms * 0.0012).min(1.0);
            }
            r.angle = (r.angle + r.speed * dt_ms).rem_euclid(TAU);
        }

        for d in &mut self.dust {
            if elapsed > d.bloom_delay_ms && d.bloom < 1.0 {
                d.bloom = (d.bloom + dt_ms * 0.0012).min(1.0);
            }
            d.pos += d.vel * dt_ms;
            if d.pos.x.abs() > 0.65 {
                d.vel.x = -d.vel.x;
            }
            if d.pos.y.abs() > 0.65 {
                d.vel.y = -d.vel.y;
            }
            if d.pos.z.abs() > 0.35 {
                d.vel.z = -d.vel.z;
            }
        }
    }

    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        painter.clear(self.config.background);
        let size = ctx.size;
        let (cx, cy) = (size.width / 2.0, size.height / 2.0);
        let basis = size.min_side();
        let t = ctx.t.0;
        let elapsed = ctx.elapsed_ms;

        // Glow pass: particles alone, blurred and laid under everything.
        painter.begin_layer();
        self.draw_particles(painter, t, cx, cy, basis);
        let blur_radius = (basis * 0.015).max(8.0);
        painter.end_layer_blurred(blur_radius as u32, blur_radius as f32 / 2.0, 0.2)?;

        self.draw_heartbeat(painter, cx, cy, basis);
        self.draw_hud(painter, cx, cy, basis);
        self.draw_connections(painter, t, cx, cy, basis);

        for ring in &self.rings {
            let ring_bloom = if self.intro_skipped {
                1.0
            } else if elapsed < ring.bloom_delay_ms {
                0.0
            } else {
                ((elapsed - ring.bloom_delay_ms) * 0.0008).min(1.0)
            };
            self.draw_ring(painter, ring, t, cx, cy, basis, ring_bloom);
        }

        self.draw_particles(painter, t, cx, cy, basis);
        self.draw_core(painter, t, cx, cy, basis);

        post::vignette(
            painter,
            basis * 0.2,
            size.width.max(size.height) * 0.85,
            0.4,
        );

        // Grain derives its generator from the timestamp so the frame stays
        // a pure function of (t, entities).
        let mut grain_rng = Rng64::new(self.config.seed ^ t.to_bits());
        post::grain(painter, &mut grain_rng, self.config.grain_speckles, 0.01);

        Ok(())
    }

    fn skip_intro(&mut self) {
        self.intro_skipped = true;
        self.bloom = 1.0;
        self.core.bloom = 1.0;
        for r in &mut self.riders {
            r.bloom = 1.0;
        }
        for d in &mut self.dust {
            d.bloom = 1.0;
        }
    }

    fn pointer(&mut self, pos: Option<(f64, f64)>) {
        self.pointer = pos;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/gyre.rs"]
mod tests;
