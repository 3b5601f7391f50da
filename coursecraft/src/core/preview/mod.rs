//! Live Preview
//!
//! Everything between a lesson's content and what the instructor sees in the
//! floating preview.
//!
//! # Modules
//!
//! - `store`: Session-scoped preview state and lesson snapshot
//! - `renderer`: Pure lesson-to-document rendering
//! - `surface`: Minimized / windowed / fullscreen presentation

pub mod renderer;
pub mod store;
pub mod surface;

pub use renderer::{
    format_duration, render, render_value, BlockKind, PreviewBlock, PreviewDocument,
    TimestampLine,
};
pub use store::{
    LessonSnapshot, PreviewDataPatch, PreviewState, PreviewStore, MAX_PREVIEW_SCALE,
    MIN_PREVIEW_HEIGHT, MIN_PREVIEW_SCALE, MIN_PREVIEW_WIDTH,
};
pub use surface::{clamp_position, FloatingPreview, SurfaceKey, SurfaceMode, Viewport, MINIMIZED_SIZE};
