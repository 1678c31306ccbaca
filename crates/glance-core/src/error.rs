//! Error types for glance.

use thiserror::Error;

/// The main error type for glance operations.
#[derive(Error, Debug)]
pub enum GlanceError {
    /// The 24-bit pick ID space has been exhausted.
    ///
    /// IDs are packed into three 8-bit color channels, so at most
    /// 2^24 - 1 objects can be pickable in one session. Silently wrapping
    /// would alias two objects onto one color, so this is fatal at
    /// allocation time instead.
    #[error("pick ID space exhausted: {0} IDs already allocated (max {max})", max = crate::pick::MAX_PICK_ID)]
    IdSpaceExhausted(u32),

    /// The visible material cannot carry a highlight color.
    #[error("material does not support highlighting; pickable objects need a Standard material")]
    NotHighlightable,

    /// No object is registered under the given pick ID.
    #[error("no pickable object with ID {0}")]
    ObjectNotFound(u32),

    /// Rendering error, surfaced from the render backend.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for glance operations.
pub type Result<T> = std::result::Result<T, GlanceError>;
