//! CourseCraft Core Type Definitions
//!
//! Defines fundamental types shared by the authoring engine.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Section unique identifier (ULID)
pub type SectionId = String;

/// Lesson unique identifier (ULID)
pub type LessonId = String;

/// Content item unique identifier (ULID)
pub type ContentItemId = String;

/// Quiz question unique identifier (ULID)
pub type QuestionId = String;

/// Theme catalog identifier (static slug, e.g. `complete-lesson`)
pub type ThemeId = String;

/// Operation unique identifier (ULID)
pub type OpId = String;

/// Generates a fresh identifier.
///
/// ULIDs are never reused, so a deleted object's id is never handed to a new one.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

// =============================================================================
// Spatial Types
// =============================================================================

/// 2D position in viewport pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 20.0, y: 20.0 }
    }
}

/// 2D size in viewport pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    /// Creates a new size, replacing non-finite or negative extents with zero
    pub fn new(width: f64, height: f64) -> Self {
        let sanitize = |v: f64, label: &str| {
            if v.is_finite() && v >= 0.0 {
                v
            } else {
                warn!("Size2D created with invalid {} {}, using 0", label, v);
                0.0
            }
        };
        Self {
            width: sanitize(width, "width"),
            height: sanitize(height, "height"),
        }
    }
}

impl Default for Size2D {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
    }

    #[test]
    fn test_size_rejects_invalid_extents() {
        let size = Size2D::new(f64::NAN, -10.0);
        assert_eq!(size.width, 0.0);
        assert_eq!(size.height, 0.0);
    }
}
