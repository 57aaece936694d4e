use crate::{
    animation::reveal::Reveal,
    foundation::{core::Millis, error::ScintillaResult},
    lifecycle::observer::{RevealGate, VisibilityGate},
    render::surface::Surface,
    scene::{Effect, FrameCtx},
};

/// Environment preference for motion, read once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MotionPreference {
    /// Run reveals and the steady loop normally.
    Full,
    /// Skip every transition to its final state and render exactly one
    /// static frame; no loop is ever scheduled.
    Reduced,
}

/// What starts the reveal transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RevealTrigger {
    /// Wait for the containing section to intersect the viewport at or
    /// above the given ratio.
    Visibility {
        /// Intersection ratio that arms the reveal.
        threshold: f64,
    },
    /// Begin playing on attach; the effect's own intro ramps carry the
    /// reveal role.
    Immediate,
}

/// Lifecycle tuning for one animator.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimatorConfig {
    /// Reveal trigger mode.
    pub reveal: RevealTrigger,
    /// Reveal transition duration in milliseconds.
    pub reveal_duration_ms: f64,
    /// Intersection ratio below which the surface counts as off-screen.
    pub visibility_threshold: f64,
    /// Upper bound applied to per-frame deltas, absorbing tab-suspension
    /// gaps so entity physics never jump.
    pub max_frame_delta_ms: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            reveal: RevealTrigger::Visibility { threshold: 0.25 },
            reveal_duration_ms: 1500.0,
            visibility_threshold: 0.05,
            max_frame_delta_ms: 50.0,
        }
    }
}

/// Dimensions and pixel density of the host container the surface mounts
/// into.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Mount {
    /// Container width in logical units.
    pub width: f64,
    /// Container height in logical units.
    pub height: f64,
    /// Reported device pixel ratio.
    pub dpr: f64,
}

/// Lifecycle phase of an animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Surface sized and entities initialized; nothing observed yet.
    Idle,
    /// Armed, waiting for the first qualifying intersection.
    WaitingReveal,
    /// Running the one-shot eased reveal transition.
    Revealing,
    /// Continuous looping playback.
    Steady,
    /// Off-screen; state frozen for resume.
    Paused,
}

/// Owns one drawing surface and one effect, and walks them through the
/// reveal-gated lifecycle: waiting for the section to scroll into view,
/// a one-shot eased reveal, then indefinite looping playback that pauses
/// while the surface is off-screen.
///
/// Every entry point mutates only this animator's own state; concurrent
/// animators on a page are fully independent.
pub struct Animator {
    config: AnimatorConfig,
    surface: Surface,
    effect: Box<dyn Effect>,
    phase: Phase,
    reveal: Reveal,
    reveal_gate: RevealGate,
    visibility: VisibilityGate,
    running: bool,
    revealed: bool,
    reduced: bool,
    start_time: Option<Millis>,
    last_frame: Option<Millis>,
    paused_at: Option<Millis>,
}

impl Animator {
    /// Attach to a mount point.
    ///
    /// A `None` mount is the decorative no-op path: the expected container
    /// is absent and the feature silently does not exist — `Ok(None)`,
    /// never an error. With reduced motion, every transition jumps to its
    /// final state and a single frame renders synchronously.
    #[tracing::instrument(skip(effect), fields(reveal = ?config.reveal))]
    pub fn attach(
        mount: Option<Mount>,
        prefs: MotionPreference,
        config: AnimatorConfig,
        effect: Box<dyn Effect>,
        now: Millis,
    ) -> ScintillaResult<Option<Self>> {
        let Some(mount) = mount else {
            tracing::debug!("mount absent; skipping animator");
            return Ok(None);
        };

        let surface = Surface::new(mount.width, mount.height, mount.dpr)?;
        let reveal_threshold = match config.reveal {
            RevealTrigger::Visibility { threshold } => threshold,
            RevealTrigger::Immediate => 0.0,
        };

        let mut animator = Self {
            surface,
            effect,
            phase: Phase::Idle,
            reveal: Reveal::new(config.reveal_duration_ms),
            reveal_gate: RevealGate::new(reveal_threshold),
            visibility: VisibilityGate::new(config.visibility_threshold),
            running: false,
            revealed: false,
            reduced: prefs == MotionPreference::Reduced,
            start_time: None,
            last_frame: None,
            paused_at: None,
            config,
        };

        if animator.reduced {
            // One static frame at the final visual state; no loop.
            animator.revealed = true;
            animator.reveal.force_complete();
            animator.effect.skip_intro();
            animator.phase = Phase::Steady;
            animator.last_frame = Some(now);
            animator.render(now)?;
            return Ok(Some(animator));
        }

        match config.reveal {
            RevealTrigger::Visibility { .. } => {
                animator.phase = Phase::WaitingReveal;
            }
            RevealTrigger::Immediate => {
                animator.revealed = true;
                animator.reveal.force_complete();
                animator.phase = Phase::Steady;
                animator.start(now);
            }
        }

        Ok(Some(animator))
    }

    /// Feed an intersection ratio from the observer watching the
    /// containing section. The first qualifying ratio starts the reveal.
    pub fn on_reveal(&mut self, ratio: f64, now: Millis) {
        if self.reduced || self.phase != Phase::WaitingReveal {
            return;
        }
        if self.reveal_gate.observe(ratio) {
            tracing::debug!(ratio, "reveal triggered");
            self.revealed = true;
            self.phase = Phase::Revealing;
            self.reveal.begin(now);
            self.start(now);
        }
    }

    /// Feed an intersection ratio from the observer watching the surface
    /// itself. Pauses playback off-screen; resumes only once the reveal
    /// has completed.
    pub fn on_visibility(&mut self, ratio: f64, now: Millis) {
        if self.reduced {
            return;
        }
        match self.visibility.observe(ratio) {
            Some(true) => {
                if self.phase == Phase::Paused {
                    self.phase = Phase::Steady;
                    self.start(now);
                }
            }
            Some(false) => {
                if self.phase == Phase::Steady {
                    self.phase = Phase::Paused;
                    self.stop(now);
                }
            }
            None => {}
        }
    }

    /// Forward a normalized pointer position to the effect.
    pub fn on_pointer(&mut self, pos: Option<(f64, f64)>) {
        self.effect.pointer(pos);
    }

    /// Handle a container resize: clamp, recreate the surface and notify
    /// the effect. Ratio-based coordinates re-derive on the next frame.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: f64, height: f64) -> ScintillaResult<()> {
        self.surface.resize(width, height)?;
        self.effect.resize(self.surface.logical_size());
        if self.reduced {
            // The static frame is all a reduced-motion animator ever shows;
            // refresh it at the new size.
            self.render(self.last_frame.unwrap_or(Millis::ZERO))?;
        }
        Ok(())
    }

    /// Begin scheduling frames. Idempotent: calling twice leaves the same
    /// running state as calling once.
    pub fn start(&mut self, now: Millis) {
        if self.running || self.reduced {
            return;
        }
        self.running = true;
        match self.start_time {
            None => {
                self.start_time = Some(now);
                self.last_frame = Some(now);
            }
            Some(start) => {
                // Shift the elapsed clock past the pause so phase-driven
                // motion (heartbeat, breathing) continues instead of
                // jumping.
                if let Some(paused_at) = self.paused_at.take() {
                    let paused_for = now.since(paused_at).max(0.0);
                    self.start_time = Some(Millis(start.0 + paused_for));
                }
                self.last_frame = Some(now);
            }
        }
    }

    /// Stop scheduling frames, freezing state for resume. An in-flight
    /// frame already scheduled by the host becomes a no-op at entry.
    pub fn stop(&mut self, now: Millis) {
        if !self.running {
            return;
        }
        self.running = false;
        self.paused_at = Some(now);
    }

    /// Advance and render one frame at `now`.
    ///
    /// Returns whether the animator wants another frame scheduled. Checks
    /// `running` at entry so a stale callback after `stop` does nothing.
    /// Entities advance at most once per distinct timestamp, so rendering
    /// twice at the reveal/steady handoff instant cannot double-step them.
    pub fn tick(&mut self, now: Millis) -> ScintillaResult<bool> {
        if !self.running {
            return Ok(false);
        }

        let dt = match self.last_frame {
            Some(last) => now.since(last).clamp(0.0, self.config.max_frame_delta_ms),
            None => crate::scene::REFERENCE_FRAME_MS,
        };
        let fresh_instant = self.last_frame != Some(now);

        match self.phase {
            Phase::Revealing => {
                // Only monotonic progress advances during the reveal; the
                // frame itself is a pure function of (t, progress).
                self.reveal.step(now);
                self.render(now)?;
                if self.reveal.is_complete() {
                    tracing::debug!("reveal complete; entering steady loop");
                    self.phase = Phase::Steady;
                }
                self.last_frame = Some(now);
                Ok(true)
            }
            Phase::Steady => {
                if fresh_instant && dt > 0.0 {
                    let ctx = self.frame_ctx(now);
                    self.effect.update(&ctx, dt);
                }
                self.render(now)?;
                self.last_frame = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the frame loop is running.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Whether the reveal has been triggered.
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Eased reveal progress in `[0, 1]`.
    pub fn reveal_progress(&self) -> f64 {
        self.reveal.progress()
    }

    /// Milliseconds of animation time at `now`, shifted across pauses.
    pub fn elapsed_ms(&self, now: Millis) -> f64 {
        self.start_time
            .map(|s| now.since(s).max(0.0))
            .unwrap_or(0.0)
    }

    /// The owned drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    fn frame_ctx(&self, now: Millis) -> FrameCtx {
        FrameCtx {
            t: now,
            elapsed_ms: self.elapsed_ms(now),
            reveal: self.reveal.progress(),
            looping: self.revealed && self.reveal.is_complete(),
            size: self.surface.logical_size(),
        }
    }

    fn render(&mut self, now: Millis) -> ScintillaResult<()> {
        let ctx = self.frame_ctx(now);
        let mut painter = self.surface.painter();
        self.effect.render(&mut painter, &ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/animator.rs"]
mod tests;
