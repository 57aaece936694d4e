//! Scintilla renders reveal-driven decorative canvas animations on a CPU
//! raster surface.
//!
//! One [`Animator`] owns one drawing [`Surface`] and one [`Effect`], and
//! walks them through the shared lifecycle every effect uses:
//!
//! 1. **Waiting for reveal**: an intersection observer watches the
//!    containing section; the first qualifying ratio arms the transition.
//! 2. **Revealing**: a fixed-duration, cubic-ease-out transition drives
//!    reveal progress from 0 to 1, re-rendering each frame; structural
//!    elements cascade in via the [`stagger`] fraction.
//! 3. **Steady**: continuous per-frame playback, paused while the surface
//!    is off-screen and resumed with the elapsed clock shifted across the
//!    pause.
//!
//! The host supplies intersection ratios, visibility flips, resizes and
//! frame timestamps; the engine writes premultiplied RGBA8 pixels.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: rendering is a pure function of
//!   `(timestamp, reveal progress, entity state)`, and all randomness is
//!   seeded, so identical inputs produce identical frames.
//! - **Decorative failure semantics**: a missing mount, a zero-sized
//!   container or a suspended-tab timestamp gap degrade silently; nothing
//!   here can break the page hosting it.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod foundation;
mod lifecycle;
mod render;
mod scene;

pub use animation::ease::Ease;
pub use animation::emphasis::Emphasis;
pub use animation::reveal::{Reveal, stagger};
pub use foundation::core::{Affine, Dpr, Millis, Point, Rect, SurfaceSize, Vec2};
pub use foundation::error::{ScintillaError, ScintillaResult};
pub use foundation::math::{Rng64, clamp01, fractal_noise, lerp};
pub use lifecycle::animator::{
    Animator, AnimatorConfig, MotionPreference, Mount, Phase, RevealTrigger,
};
pub use lifecycle::observer::{RevealGate, VisibilityGate};
pub use render::export::write_png;
pub use render::painter::{Compose, Painter, RadialStop};
pub use render::post::{grain, vignette};
pub use render::surface::Surface;
pub use scene::diagram::{DiagramConfig, DiagramEffect, LabelSpec};
pub use scene::flow::{FlowConfig, FlowEffect, FlowNode, NodeShape};
pub use scene::gyre::{GyreConfig, GyreEffect};
pub use scene::orbit::{BodyShape, BodySpec, OrbitConfig, OrbitEffect, OrbitPathSpec};
pub use scene::rings::{DotSpec, RingSpec, RingsConfig, RingsEffect};
pub use scene::{Effect, FrameCtx};
