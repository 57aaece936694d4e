pub mod diagram;
pub mod flow;
pub mod gyre;
pub mod orbit;
pub mod rings;
pub(crate) mod space;

use crate::{
    foundation::core::{Millis, SurfaceSize},
    foundation::error::ScintillaResult,
    render::painter::Painter,
};

/// Per-frame inputs shared by every effect.
///
/// `render` implementations must treat this as their entire world: a frame
/// is a pure function of the context plus the effect's current entity
/// state, so rendering twice with the same context yields identical pixels.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    /// Current timestamp on the host animation clock.
    pub t: Millis,
    /// Milliseconds since the animator started, shifted across pauses so
    /// elapsed-driven effects keep phase.
    pub elapsed_ms: f64,
    /// Eased reveal progress in `[0, 1]`, monotone and pinned at 1.
    pub reveal: f64,
    /// Whether the reveal has completed and steady-state motion runs.
    pub looping: bool,
    /// Logical surface dimensions.
    pub size: SurfaceSize,
}

/// Capability interface every animation effect implements.
///
/// The animator calls `update` at most once per real frame (never during
/// the reveal transition's intermediate renders) and `render` once per
/// drawn frame; the split keeps entity advancement from double-stepping
/// when a frame is rendered at the reveal/steady handoff instant.
pub trait Effect {
    /// React to a container resize. Ratio-based effects usually need
    /// nothing here since positions are re-derived every frame.
    fn resize(&mut self, _size: SurfaceSize) {}

    /// Advance entity state by `dt_ms` (already clamped by the animator).
    fn update(&mut self, ctx: &FrameCtx, dt_ms: f64);

    /// Draw the frame. Read-only on entity state.
    fn render(&self, painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()>;

    /// Jump every intro ramp to its final value (reduced-motion path).
    fn skip_intro(&mut self) {}

    /// Pointer position normalized to `[-0.5, 0.5]` per axis, or `None`
    /// when the pointer left. Ignored by effects without pointer response.
    fn pointer(&mut self, _pos: Option<(f64, f64)>) {}
}

/// Reference frame period for converting legacy per-frame rates.
pub(crate) const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Express a clamped frame delta in 60fps frame units, so per-frame
/// traversal speeds stay calibrated under variable refresh rates.
pub(crate) fn frame_units(dt_ms: f64) -> f64 {
    dt_ms / REFERENCE_FRAME_MS
}
