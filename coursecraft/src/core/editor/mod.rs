//! Content Editor
//!
//! Modal per-type editor and its transcript collaborator.

mod dialog;
pub mod transcript;

pub use dialog::{EditorDialog, EditorMode};
pub use transcript::{
    EditorNotice, MediaRef, StaticTranscriptProvider, TranscriptProvider, TranscriptResult,
    TranscriptSegment,
};
