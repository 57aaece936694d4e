/// One-shot reveal gate over an intersection-ratio stream.
///
/// Fires exactly once, on the first observation at or above the threshold;
/// the host unobserves after that, and so does this.
#[derive(Clone, Copy, Debug)]
pub struct RevealGate {
    threshold: f64,
    fired: bool,
}

impl RevealGate {
    /// Gate firing at `threshold` intersection ratio.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            fired: false,
        }
    }

    /// Feed an intersection ratio; returns `true` exactly once.
    pub fn observe(&mut self, ratio: f64) -> bool {
        if self.fired || ratio < self.threshold {
            return false;
        }
        self.fired = true;
        true
    }

    /// Whether the gate already fired.
    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// Edge-detecting visibility gate over an intersection-ratio stream.
///
/// Tracks whether the watched surface is on screen and reports only the
/// transitions, so pause/resume logic runs once per edge rather than once
/// per observation.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityGate {
    threshold: f64,
    visible: bool,
}

impl VisibilityGate {
    /// Gate considering the surface visible at or above `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            visible: false,
        }
    }

    /// Feed an intersection ratio; returns the new visibility on an edge
    /// transition, `None` while the state holds.
    pub fn observe(&mut self, ratio: f64) -> Option<bool> {
        let now_visible = ratio >= self.threshold;
        if now_visible == self.visible {
            return None;
        }
        self.visible = now_visible;
        Some(now_visible)
    }

    /// Current visibility.
    pub fn visible(&self) -> bool {
        self.visible
    }
}
