use kurbo::Point;

use crate::{
    animation::{ease::Ease, reveal::stagger},
    foundation::{
        core::SurfaceSize,
        error::{ScintillaError, ScintillaResult},
        math::{Rng64, clamp01, lerp},
    },
    render::painter::Painter,
    scene::{Effect, FrameCtx, frame_units},
};

/// Outline shape drawn for a flow-graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeShape {
    /// Plain circle.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Flat-topped hexagon.
    Hex,
}

/// One node of the flow graph, positioned as ratios of the surface.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlowNode {
    /// Horizontal position as a ratio of surface width.
    pub x: f64,
    /// Vertical position as a ratio of surface height.
    pub y: f64,
    /// Display label; carried as external configuration, not rasterized.
    pub label: String,
    /// Node outline shape.
    pub shape: NodeShape,
}

impl FlowNode {
    fn at(x: f64, y: f64, label: &str, shape: NodeShape) -> Self {
        Self {
            x,
            y,
            label: label.to_string(),
            shape,
        }
    }
}

/// Configuration for the node/edge particle-flow effect.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlowConfig {
    /// Graph nodes.
    pub nodes: Vec<FlowNode>,
    /// Undirected edges as node index pairs.
    pub edges: Vec<[usize; 2]>,
    /// Per-frame probability of spawning a transient particle.
    #[serde(default = "default_spawn_chance")]
    pub spawn_chance: f64,
    /// Stroke/fill color.
    #[serde(default = "default_flow_color")]
    pub color: [u8; 3],
    /// Determinism seed for the spawn process.
    #[serde(default)]
    pub seed: u64,
}

fn default_spawn_chance() -> f64 {
    0.04
}

fn default_flow_color() -> [u8; 3] {
    [255, 255, 255]
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            nodes: vec![
                FlowNode::at(0.12, 0.50, "mesh", NodeShape::Hex),
                FlowNode::at(0.35, 0.28, "ledger", NodeShape::Circle),
                FlowNode::at(0.50, 0.65, "gateway", NodeShape::Square),
                FlowNode::at(0.65, 0.35, "store", NodeShape::Circle),
                FlowNode::at(0.88, 0.50, "archive", NodeShape::Hex),
            ],
            edges: vec![[0, 1], [0, 2], [1, 2], [1, 3], [2, 3], [3, 4], [2, 4]],
            spawn_chance: default_spawn_chance(),
            color: default_flow_color(),
            seed: 0,
        }
    }
}

/// A transient particle traversing one edge. Progress lives in `[0, 1)`;
/// reaching 1 removes the particle on that same frame.
#[derive(Clone, Copy, Debug)]
struct FlowParticle {
    from: usize,
    to: usize,
    progress: f64,
    /// Traversal speed in progress per 60fps frame unit.
    speed: f64,
    size: f64,
}

/// Particles traveling between diagram nodes along staggered-revealed
/// edges.
pub struct FlowEffect {
    config: FlowConfig,
    particles: Vec<FlowParticle>,
    rng: Rng64,
}

impl FlowEffect {
    /// Validate the configured graph and build the effect.
    pub fn new(config: FlowConfig) -> ScintillaResult<Self> {
        if config.nodes.is_empty() {
            return Err(ScintillaError::validation("flow config needs nodes"));
        }
        if config.edges.is_empty() {
            return Err(ScintillaError::validation("flow config needs edges"));
        }
        for &[a, b] in &config.edges {
            if a >= config.nodes.len() || b >= config.nodes.len() {
                return Err(ScintillaError::validation(format!(
                    "flow edge [{a}, {b}] references a missing node"
                )));
            }
        }
        if !(0.0..=1.0).contains(&config.spawn_chance) {
            return Err(ScintillaError::validation(
                "flow spawn_chance must be in [0, 1]",
            ));
        }
        let rng = Rng64::new(config.seed);
        Ok(Self {
            config,
            particles: Vec::new(),
            rng,
        })
    }

    /// Live transient particle count.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn spawn_particle(&mut self) {
        let edge = self.config.edges[self.rng.next_index(self.config.edges.len())];
        let reverse = self.rng.chance(0.5);
        let (from, to) = if reverse { (edge[1], edge[0]) } else { (edge[0], edge[1]) };
        self.particles.push(FlowParticle {
            from,
            to,
            progress: 0.0,
            speed: self.rng.next_range(0.003, 0.007),
            size: self.rng.next_range(1.5, 3.0),
        });
    }

    fn node_pos(&self, i: usize, size: SurfaceSize) -> Point {
        let n = &self.config.nodes[i];
        Point::new(n.x * size.width, n.y * size.height)
    }
}

impl Effect for FlowEffect {
    fn update(&mut self, ctx: &FrameCtx, dt_ms: f64) {
        if !ctx.looping {
            return;
        }
        if self.rng.chance(self.config.spawn_chance) {
            self.spawn_particle();
        }
        let step = frame_units(dt_ms);
        for p in &mut self.particles {
            p.progress += p.speed * step;
        }
        // A particle at exactly 1.0 is gone this frame; it is never drawn
        // past the end of its edge.
        self.particles.retain(|p| p.progress < 1.0);
    }

    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        painter.clear_transparent();
        let size = ctx.size;
        let color = self.config.color;
        let rp = ctx.reveal;

        // Edges wipe in from their start node, cascading by index.
        for (i, &[a, b]) in self.config.edges.iter().enumerate() {
            let edge_p = stagger(rp, i, self.config.edges.len(), 2.0);
            if edge_p <= 0.0 {
                continue;
            }
            let pa = self.node_pos(a, size);
            let pb = self.node_pos(b, size);
            let tip = Point::new(lerp(pa.x, pb.x, edge_p), lerp(pa.y, pb.y, edge_p));
            painter.line(pa, tip, 1.0, color, 0.35 * edge_p);
        }

        // Nodes pop in with a faster cascade than the edges.
        for (i, node) in self.config.nodes.iter().enumerate() {
            let node_p = clamp01(rp * 3.0 - i as f64 * 0.15);
            if node_p <= 0.0 {
                continue;
            }
            let pos = self.node_pos(i, size);
            let radius = 8.0 * node_p;
            match node.shape {
                NodeShape::Circle => {
                    painter.stroke_circle(pos, radius, 1.0, color, 0.6 * node_p, None);
                }
                NodeShape::Square => {
                    let half = radius * 0.8;
                    let pts = [
                        Point::new(pos.x - half, pos.y - half),
                        Point::new(pos.x + half, pos.y - half),
                        Point::new(pos.x + half, pos.y + half),
                        Point::new(pos.x - half, pos.y + half),
                    ];
                    painter.stroke_polygon(&pts, 1.0, color, 0.6 * node_p);
                }
                NodeShape::Hex => {
                    let pts: Vec<Point> = (0..6)
                        .map(|k| {
                            let angle = std::f64::consts::FRAC_PI_3 * k as f64
                                - std::f64::consts::FRAC_PI_2;
                            Point::new(
                                pos.x + angle.cos() * radius,
                                pos.y + angle.sin() * radius,
                            )
                        })
                        .collect();
                    painter.stroke_polygon(&pts, 1.0, color, 0.6 * node_p);
                }
            }
        }

        if ctx.looping {
            for p in &self.particles {
                let from = self.node_pos(p.from, size);
                let to = self.node_pos(p.to, size);
                let eased = Ease::InOutQuad.apply(p.progress);
                let pos = Point::new(lerp(from.x, to.x, eased), lerp(from.y, to.y, eased));
                // Fade in and out near the edge endpoints.
                let alpha = (p.progress * 5.0).min(1.0).min((1.0 - p.progress) * 5.0);
                painter.fill_circle(pos, p.size, color, 0.8 * alpha);
            }
        }

        Ok(())
    }
}
