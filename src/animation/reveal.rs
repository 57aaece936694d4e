use crate::{
    animation::ease::Ease,
    foundation::{core::Millis, math::clamp01},
};

/// One-shot eased reveal transition driving progress from 0 to 1.
///
/// Progress is monotonically non-decreasing across `step` calls and pinned
/// to 1 once the duration elapses; stepping an already-complete reveal is a
/// no-op. Stepping is idempotent for a repeated timestamp, so a frame
/// rendered twice at the handoff instant observes the same progress.
#[derive(Clone, Copy, Debug)]
pub struct Reveal {
    duration_ms: f64,
    ease: Ease,
    started_at: Option<Millis>,
    progress: f64,
}

impl Reveal {
    /// A reveal of the given duration using the house `OutCubic` curve.
    pub fn new(duration_ms: f64) -> Self {
        Self::with_ease(duration_ms, Ease::OutCubic)
    }

    /// A reveal with an explicit easing curve.
    pub fn with_ease(duration_ms: f64, ease: Ease) -> Self {
        Self {
            duration_ms: duration_ms.max(1.0),
            ease,
            started_at: None,
            progress: 0.0,
        }
    }

    /// Start the transition clock. Later `begin` calls are ignored.
    pub fn begin(&mut self, now: Millis) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Pin progress to 1 without running the transition (reduced motion).
    pub fn force_complete(&mut self) {
        self.progress = 1.0;
    }

    /// Advance to `now` and return the eased progress.
    pub fn step(&mut self, now: Millis) -> f64 {
        let Some(start) = self.started_at else {
            return self.progress;
        };
        let raw = clamp01(now.since(start) / self.duration_ms);
        let eased = self.ease.apply(raw);
        // Monotone even if the host clock stutters backwards.
        self.progress = self.progress.max(eased);
        self.progress
    }

    /// Current eased progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the transition has finished.
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Per-element cascade fraction for staggered reveals.
///
/// `clamp01((progress * (count + window) - index) / window)`: element 0
/// finishes first and element `count - 1` last, each taking `window`
/// progress-units to sweep, producing the wipe/cascade look. Monotone in
/// `progress` for a fixed index, and always in `[0, 1]`.
pub fn stagger(progress: f64, index: usize, count: usize, window: f64) -> f64 {
    let window = window.max(f64::EPSILON);
    clamp01((progress * (count as f64 + window) - index as f64) / window)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/reveal.rs"]
mod tests;
