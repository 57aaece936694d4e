/// Convenience result type used across scintilla.
pub type ScintillaResult<T> = Result<T, ScintillaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Decorative failure conditions (absent mount, degenerate container sizes,
/// timestamp gaps) are deliberately *not* represented here; those are
/// handled by silent no-ops and clamping at the call site. The enum covers
/// genuine misuse (invalid configuration) and internal render failures.
#[derive(thiserror::Error, Debug)]
pub enum ScintillaError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors in reveal/emphasis timing state.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScintillaError {
    /// Build a [`ScintillaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScintillaError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ScintillaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
