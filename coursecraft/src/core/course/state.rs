//! Course State
//!
//! The mutable holder commands operate on: course metadata plus the current
//! outline value.

use serde::{Deserialize, Serialize};

use super::{CourseOutline, Section};

/// Course metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMeta {
    pub title: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last modified timestamp (RFC 3339)
    pub modified_at: String,
}

impl CourseMeta {
    pub fn new(title: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            title: title.to_string(),
            created_at: now.clone(),
            modified_at: now,
        }
    }

    /// Updates the modified timestamp
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }
}

/// In-memory course being authored
#[derive(Clone, Debug)]
pub struct CourseState {
    pub meta: CourseMeta,
    pub outline: CourseOutline,
    /// Number of commands applied since load
    pub op_count: usize,
    /// Whether there are unsaved changes
    pub is_dirty: bool,
}

impl CourseState {
    /// Creates an empty course
    pub fn new(title: &str) -> Self {
        Self::from_parts(CourseMeta::new(title), Vec::new())
    }

    /// Wraps loaded sections without marking them dirty
    pub fn from_parts(meta: CourseMeta, sections: Vec<Section>) -> Self {
        Self {
            meta,
            outline: CourseOutline::from_sections(sections),
            op_count: 0,
            is_dirty: false,
        }
    }

    /// Swaps in a new outline value
    pub(crate) fn replace_outline(&mut self, outline: CourseOutline) {
        self.outline = outline;
        self.meta.touch();
    }

    pub fn sections(&self) -> &[Section] {
        &self.outline.sections
    }

    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_clean() {
        let state = CourseState::new("Rust 101");
        assert_eq!(state.meta.title, "Rust 101");
        assert!(!state.is_dirty);
        assert!(state.sections().is_empty());
    }

    #[test]
    fn test_replace_outline_touches_meta() {
        let mut state = CourseState::new("Rust 101");
        state.meta.modified_at = "2000-01-01T00:00:00+00:00".to_string();

        let (outline, _) = state.outline.add_section("Basics");
        state.replace_outline(outline);

        assert_eq!(state.sections().len(), 1);
        assert_ne!(state.meta.modified_at, "2000-01-01T00:00:00+00:00");
    }
}
