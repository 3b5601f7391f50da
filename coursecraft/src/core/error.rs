//! CourseCraft Error Definitions
//!
//! Defines error types used at the edges of the authoring engine.
//! Aggregate and store mutations are total and never return these.

use thiserror::Error;

use super::content::ContentType;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Content Errors
    // =========================================================================
    #[error("Content type mismatch: expected {expected}, got {actual}")]
    ContentTypeMismatch {
        expected: ContentType,
        actual: ContentType,
    },

    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Command Errors
    // =========================================================================
    #[error("Command execution failed: {0}")]
    CommandExecutionFailed(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Failed to save course: {0}")]
    CourseSaveFailed(String),

    #[error("Course document corrupted: {0}")]
    CourseCorrupted(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
