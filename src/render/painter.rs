use kurbo::Point;
use tiny_skia::{
    BlendMode, Color, FillRule, GradientStop, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    PixmapPaint, RadialGradient, SpreadMode, Stroke, StrokeDash, Transform,
};

use crate::{
    foundation::{
        core::SurfaceSize,
        error::{ScintillaError, ScintillaResult},
    },
    render::blur::blur_premul_rgba8,
};

/// Compositing mode for subsequent draw calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compose {
    /// Source-over (the default).
    #[default]
    Over,
    /// Additive ("lighter") compositing, used for glows and light waves.
    Add,
    /// Overlay, used by the film-grain pass.
    Overlay,
}

impl Compose {
    fn blend_mode(self) -> BlendMode {
        match self {
            Self::Over => BlendMode::SourceOver,
            Self::Add => BlendMode::Plus,
            Self::Overlay => BlendMode::Overlay,
        }
    }
}

/// A color stop for [`Painter::radial`], in straight (non-premultiplied)
/// RGB plus alpha.
#[derive(Clone, Copy, Debug)]
pub struct RadialStop {
    /// Stop position in `[0, 1]` along the gradient span.
    pub offset: f64,
    /// Stop color.
    pub rgb: [u8; 3],
    /// Stop alpha in `[0, 1]`.
    pub alpha: f64,
}

impl RadialStop {
    /// Shorthand constructor.
    pub fn new(offset: f64, rgb: [u8; 3], alpha: f64) -> Self {
        Self { offset, rgb, alpha }
    }
}

/// Canvas-style immediate-mode painter over a premultiplied RGBA8 pixmap.
///
/// All coordinates are logical units; the device-pixel-ratio scale is
/// applied on every draw call. Arcs are rendered as segmented polylines
/// (matching the segment counts the effects specify), which keeps dash
/// patterns and dash-offset animation working uniformly.
pub struct Painter<'a> {
    target: &'a mut Pixmap,
    scratch: &'a mut Pixmap,
    in_layer: bool,
    dpr: f32,
    size: SurfaceSize,
    compose: Compose,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        target: &'a mut Pixmap,
        scratch: &'a mut Pixmap,
        size: SurfaceSize,
        dpr: f64,
    ) -> Self {
        Self {
            target,
            scratch,
            in_layer: false,
            dpr: dpr as f32,
            size,
            compose: Compose::Over,
        }
    }

    /// Logical surface size.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Set the compositing mode for subsequent draw calls.
    pub fn set_compose(&mut self, compose: Compose) {
        self.compose = compose;
    }

    /// Fill the whole surface with an opaque color.
    pub fn clear(&mut self, rgb: [u8; 3]) {
        let color = Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255);
        self.pixmap().fill(color);
    }

    /// Reset the whole surface to transparent.
    pub fn clear_transparent(&mut self) {
        self.pixmap().fill(Color::TRANSPARENT);
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, rgb: [u8; 3], alpha: f64) {
        if radius <= 0.0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.push_circle(center.x as f32, center.y as f32, radius as f32);
        let Some(path) = pb.finish() else { return };
        let paint = self.solid(rgb, alpha);
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Stroke a full circle, optionally dashed.
    pub fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        rgb: [u8; 3],
        alpha: f64,
        dash: Option<(&[f32], f32)>,
    ) {
        self.stroke_arc(
            center,
            radius,
            0.0,
            std::f64::consts::TAU,
            width,
            rgb,
            alpha,
            dash,
        );
    }

    /// Stroke a circular arc from `start` sweeping `sweep` radians,
    /// rendered as a segmented polyline. `dash` is `(pattern, offset)` in
    /// logical units.
    #[allow(clippy::too_many_arguments)]
    pub fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        sweep: f64,
        width: f64,
        rgb: [u8; 3],
        alpha: f64,
        dash: Option<(&[f32], f32)>,
    ) {
        if radius <= 0.0 || sweep.abs() <= f64::EPSILON {
            return;
        }
        let segments =
            ((96.0 * sweep.abs() / std::f64::consts::TAU).ceil() as usize).clamp(4, 256);
        let mut pb = PathBuilder::new();
        for i in 0..=segments {
            let a = start + sweep * (i as f64 / segments as f64);
            let x = (center.x + a.cos() * radius) as f32;
            let y = (center.y + a.sin() * radius) as f32;
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        if (sweep.abs() - std::f64::consts::TAU).abs() < 1e-9 {
            pb.close();
        }
        let Some(path) = pb.finish() else { return };
        self.stroke_path(&path, width, rgb, alpha, dash);
    }

    /// Stroke a line segment.
    pub fn line(&mut self, a: Point, b: Point, width: f64, rgb: [u8; 3], alpha: f64) {
        let mut pb = PathBuilder::new();
        pb.move_to(a.x as f32, a.y as f32);
        pb.line_to(b.x as f32, b.y as f32);
        let Some(path) = pb.finish() else { return };
        self.stroke_path(&path, width, rgb, alpha, None);
    }

    /// Stroke a dashed line segment. `dash` is `(pattern, offset)`.
    pub fn dashed_line(
        &mut self,
        a: Point,
        b: Point,
        width: f64,
        rgb: [u8; 3],
        alpha: f64,
        dash: (&[f32], f32),
    ) {
        let mut pb = PathBuilder::new();
        pb.move_to(a.x as f32, a.y as f32);
        pb.line_to(b.x as f32, b.y as f32);
        let Some(path) = pb.finish() else { return };
        self.stroke_path(&path, width, rgb, alpha, Some(dash));
    }

    /// Stroke an open or closed polyline.
    pub fn stroke_polyline(
        &mut self,
        points: &[Point],
        closed: bool,
        width: f64,
        rgb: [u8; 3],
        alpha: f64,
    ) {
        let Some(path) = polyline_path(points, closed) else {
            return;
        };
        self.stroke_path(&path, width, rgb, alpha, None);
    }

    /// Fill a closed polygon.
    pub fn fill_polygon(&mut self, points: &[Point], rgb: [u8; 3], alpha: f64) {
        let Some(path) = polyline_path(points, true) else {
            return;
        };
        let paint = self.solid(rgb, alpha);
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Fill a closed polygon with a centered radial gradient.
    pub fn fill_polygon_radial(
        &mut self,
        points: &[Point],
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        stops: &[RadialStop],
    ) {
        let Some(path) = polyline_path(points, true) else {
            return;
        };
        let Some(shader) = radial_shader(center, inner_radius, outer_radius, stops) else {
            return;
        };
        let paint = Paint {
            shader,
            blend_mode: self.compose.blend_mode(),
            anti_alias: true,
            ..Paint::default()
        };
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Stroke a closed polygon outline.
    pub fn stroke_polygon(&mut self, points: &[Point], width: f64, rgb: [u8; 3], alpha: f64) {
        let Some(path) = polyline_path(points, true) else {
            return;
        };
        self.stroke_path(&path, width, rgb, alpha, None);
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgb: [u8; 3], alpha: f64) {
        let Some(rect) =
            tiny_skia::Rect::from_xywh(x as f32, y as f32, w.max(0.0) as f32, h.max(0.0) as f32)
        else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.push_rect(rect);
        let Some(path) = pb.finish() else { return };
        let paint = self.solid(rgb, alpha);
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Fill a pill (full-height-rounded rectangle) with optional outline.
    #[allow(clippy::too_many_arguments)]
    pub fn pill(
        &mut self,
        center: Point,
        w: f64,
        h: f64,
        fill_rgb: [u8; 3],
        fill_alpha: f64,
        stroke_rgb: [u8; 3],
        stroke_alpha: f64,
        stroke_width: f64,
    ) {
        let Some(path) = pill_path(center, w, h) else {
            return;
        };
        let paint = self.solid(fill_rgb, fill_alpha);
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
        if stroke_alpha > 0.0 && stroke_width > 0.0 {
            self.stroke_path(&path, stroke_width, stroke_rgb, stroke_alpha, None);
        }
    }

    /// Fill a circle with a centered radial gradient, clipped to the
    /// circle's own edge (unlike [`Painter::radial`], which floods the
    /// gradient's bounding square).
    pub fn fill_circle_radial(&mut self, center: Point, radius: f64, stops: &[RadialStop]) {
        if radius <= 0.0 {
            return;
        }
        let Some(shader) = radial_shader(center, 0.0, radius, stops) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.push_circle(center.x as f32, center.y as f32, radius as f32);
        let Some(path) = pb.finish() else { return };
        let paint = Paint {
            shader,
            blend_mode: self.compose.blend_mode(),
            anti_alias: true,
            ..Paint::default()
        };
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Soft radial glow: full color at the center fading to transparent at
    /// `radius`.
    pub fn radial_glow(&mut self, center: Point, radius: f64, rgb: [u8; 3], core_alpha: f64) {
        self.radial(
            center,
            0.0,
            radius,
            &[
                RadialStop::new(0.0, rgb, core_alpha),
                RadialStop::new(1.0, rgb, 0.0),
            ],
        );
    }

    /// Fill the gradient's bounding square with a radial gradient running
    /// from `inner_radius` to `outer_radius` around `center`.
    ///
    /// Stop offsets are expressed over the `inner..outer` span, mirroring
    /// two-radius canvas gradients; an inner radius of 0 is the common
    /// centered glow.
    pub fn radial(
        &mut self,
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        stops: &[RadialStop],
    ) {
        let Some(shader) = radial_shader(center, inner_radius, outer_radius, stops) else {
            return;
        };
        let paint = Paint {
            shader,
            blend_mode: self.compose.blend_mode(),
            anti_alias: true,
            ..Paint::default()
        };
        let r = outer_radius as f32;
        let Some(rect) = tiny_skia::Rect::from_xywh(
            center.x as f32 - r,
            center.y as f32 - r,
            r * 2.0,
            r * 2.0,
        ) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.push_rect(rect);
        let Some(path) = pb.finish() else { return };
        let transform = self.device_transform();
        self.pixmap()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Redirect subsequent draws into the offscreen glow layer.
    pub fn begin_layer(&mut self) {
        self.scratch.fill(Color::TRANSPARENT);
        self.in_layer = true;
    }

    /// Blur the glow layer and composite it over the surface at `opacity`.
    /// `radius_px`/`sigma` are logical units; the device scale is applied
    /// internally.
    pub fn end_layer_blurred(
        &mut self,
        radius_px: u32,
        sigma: f32,
        opacity: f32,
    ) -> ScintillaResult<()> {
        if !self.in_layer {
            return Err(ScintillaError::render("end_layer_blurred without begin_layer"));
        }
        self.in_layer = false;

        let radius_px = ((radius_px as f32) * self.dpr).round() as u32;
        let sigma = sigma * self.dpr;
        let (w, h) = (self.scratch.width(), self.scratch.height());
        blur_premul_rgba8(self.scratch.data_mut(), w, h, radius_px, sigma)?;

        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            ..PixmapPaint::default()
        };
        self.target
            .draw_pixmap(0, 0, self.scratch.as_ref(), &paint, Transform::identity(), None);
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &tiny_skia::Path,
        width: f64,
        rgb: [u8; 3],
        alpha: f64,
        dash: Option<(&[f32], f32)>,
    ) {
        let paint = self.solid(rgb, alpha);
        let stroke = Stroke {
            width: width.max(0.1) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: dash.and_then(|(pattern, offset)| StrokeDash::new(pattern.to_vec(), offset)),
            ..Stroke::default()
        };
        let transform = self.device_transform();
        self.pixmap()
            .stroke_path(path, &paint, &stroke, transform, None);
    }

    fn solid(&self, rgb: [u8; 3], alpha: f64) -> Paint<'static> {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut paint = Paint {
            blend_mode: self.compose.blend_mode(),
            anti_alias: true,
            ..Paint::default()
        };
        paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], a);
        paint
    }

    fn device_transform(&self) -> Transform {
        Transform::from_scale(self.dpr, self.dpr)
    }

    fn pixmap(&mut self) -> &mut Pixmap {
        if self.in_layer { self.scratch } else { self.target }
    }
}

fn polyline_path(points: &[Point], closed: bool) -> Option<tiny_skia::Path> {
    if points.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            pb.move_to(p.x as f32, p.y as f32);
        } else {
            pb.line_to(p.x as f32, p.y as f32);
        }
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn pill_path(center: Point, w: f64, h: f64) -> Option<tiny_skia::Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = (h / 2.0).min(w / 2.0) as f32;
    let (cx, cy) = (center.x as f32, center.y as f32);
    let (hw, hh) = ((w / 2.0) as f32, (h / 2.0) as f32);
    // Kappa approximation of quarter circles at the pill ends.
    let k = 0.552_284_75 * r;

    let mut pb = PathBuilder::new();
    pb.move_to(cx - hw + r, cy - hh);
    pb.line_to(cx + hw - r, cy - hh);
    pb.cubic_to(
        cx + hw - r + k,
        cy - hh,
        cx + hw,
        cy - k,
        cx + hw,
        cy,
    );
    pb.cubic_to(
        cx + hw,
        cy + k,
        cx + hw - r + k,
        cy + hh,
        cx + hw - r,
        cy + hh,
    );
    pb.line_to(cx - hw + r, cy + hh);
    pb.cubic_to(
        cx - hw + r - k,
        cy + hh,
        cx - hw,
        cy + k,
        cx - hw,
        cy,
    );
    pb.cubic_to(
        cx - hw,
        cy - k,
        cx - hw + r - k,
        cy - hh,
        cx - hw + r,
        cy - hh,
    );
    pb.close();
    pb.finish()
}

fn radial_shader(
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    stops: &[RadialStop],
) -> Option<tiny_skia::Shader<'static>> {
    if outer_radius <= 0.0 || outer_radius <= inner_radius || stops.is_empty() {
        return None;
    }
    let span = outer_radius - inner_radius;
    let mut gradient_stops = Vec::with_capacity(stops.len());
    let mut last_pos = 0.0f32;
    for stop in stops {
        let mapped = (inner_radius + stop.offset.clamp(0.0, 1.0) * span) / outer_radius;
        // tiny-skia requires non-decreasing positions.
        let pos = (mapped as f32).clamp(0.0, 1.0).max(last_pos);
        last_pos = pos;
        let a = (stop.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        gradient_stops.push(GradientStop::new(
            pos,
            Color::from_rgba8(stop.rgb[0], stop.rgb[1], stop.rgb[2], a),
        ));
    }

    let c = tiny_skia::Point::from_xy(center.x as f32, center.y as f32);
    RadialGradient::new(
        c,
        c,
        outer_radius as f32,
        gradient_stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}
