//! Command Trait Definition
//!
//! Defines the trait that all course edit commands implement, plus the outline
//! swap they use to undo and redo.

use serde::{Deserialize, Serialize};

use crate::core::{
    course::{CourseOutline, CourseState},
    new_id, CoreResult, OpId,
};

/// Command execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Generated Operation ID
    pub op_id: OpId,

    /// List of state changes
    pub changes: Vec<StateChange>,

    /// Newly created IDs (sections, lessons, content items)
    pub created_ids: Vec<String>,

    /// Deleted IDs
    pub deleted_ids: Vec<String>,
}

impl CommandResult {
    /// Creates a new empty command result with the given operation ID
    pub fn new(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            changes: vec![],
            created_ids: vec![],
            deleted_ids: vec![],
        }
    }

    /// Result of a command whose target no longer exists
    pub fn noop() -> Self {
        Self::new(&new_id())
    }

    /// Adds a state change
    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Adds a created ID
    pub fn with_created_id(mut self, id: &str) -> Self {
        self.created_ids.push(id.to_string());
        self
    }

    /// Adds a deleted ID
    pub fn with_deleted_id(mut self, id: &str) -> Self {
        self.deleted_ids.push(id.to_string());
        self
    }

    /// True when the command changed nothing
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    /// Same changes under a fresh operation ID
    pub fn renewed(&self) -> Self {
        Self {
            op_id: new_id(),
            ..self.clone()
        }
    }
}

/// State change types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateChange {
    #[serde(rename_all = "camelCase")]
    SectionCreated { section_id: String },
    #[serde(rename_all = "camelCase")]
    SectionModified { section_id: String },
    #[serde(rename_all = "camelCase")]
    SectionDeleted { section_id: String },
    #[serde(rename_all = "camelCase")]
    LessonCreated { section_id: String, lesson_id: String },
    #[serde(rename_all = "camelCase")]
    LessonModified { lesson_id: String },
    #[serde(rename_all = "camelCase")]
    LessonDeleted { lesson_id: String },
    #[serde(rename_all = "camelCase")]
    ContentAdded { lesson_id: String, item_id: String },
    #[serde(rename_all = "camelCase")]
    ContentModified { lesson_id: String, item_id: String },
    #[serde(rename_all = "camelCase")]
    ContentRemoved { lesson_id: String, item_id: String },
    #[serde(rename_all = "camelCase")]
    ContentReordered {
        lesson_id: String,
        from_index: usize,
        to_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    ThemeApplied { lesson_id: String, theme_id: String },
}

/// Trait that all course edit commands must implement
///
/// # Core Principles
/// - All outline changes go through Commands.
/// - All Commands are undoable.
/// - A command whose target is gone returns a no-op result instead of failing.
pub trait Command: Send + Sync {
    /// Execute the command
    ///
    /// On failure, state must remain unchanged.
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult>;

    /// Undo the command
    ///
    /// Only called after execute succeeds with a non-empty result.
    fn undo(&self, state: &mut CourseState) -> CoreResult<()>;

    /// Redo the command
    ///
    /// Default implementation is identical to execute.
    fn redo(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        self.execute(state)
    }

    /// Command type name, used for logs
    fn type_name(&self) -> &'static str;

    /// JSON serialization of the command parameters
    fn to_json(&self) -> serde_json::Value;
}

// =============================================================================
// Outline Swap
// =============================================================================

/// Both sides of an outline change, kept for undo and redo
#[derive(Clone, Debug, Default)]
pub struct OutlineSwap {
    before: Option<CourseOutline>,
    after: Option<CourseOutline>,
}

impl OutlineSwap {
    /// Installs `next` and remembers the previous outline.
    ///
    /// Returns false, leaving state and the remembered outlines untouched,
    /// when `next` equals the current outline.
    pub fn commit(&mut self, state: &mut CourseState, next: CourseOutline) -> bool {
        if next == state.outline {
            return false;
        }
        self.before = Some(state.outline.clone());
        self.after = Some(next.clone());
        state.replace_outline(next);
        true
    }

    /// Puts the outline back as it was before `commit`
    pub fn restore_before(&self, state: &mut CourseState) {
        if let Some(before) = &self.before {
            state.replace_outline(before.clone());
        }
    }

    /// Reinstalls the committed outline; false if nothing was committed
    pub fn restore_after(&self, state: &mut CourseState) -> bool {
        match &self.after {
            Some(after) => {
                state.replace_outline(after.clone());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_serialization() {
        let change = StateChange::ContentAdded {
            lesson_id: "lesson_01".to_string(),
            item_id: "item_01".to_string(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "contentAdded");
        assert_eq!(json["lessonId"], "lesson_01");
    }

    #[test]
    fn test_command_result_builder() {
        let result = CommandResult::new("op_001")
            .with_change(StateChange::SectionCreated {
                section_id: "section_001".to_string(),
            })
            .with_created_id("section_001");

        assert_eq!(result.op_id, "op_001");
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.created_ids.len(), 1);
        assert!(!result.is_noop());
        assert!(CommandResult::noop().is_noop());

        let renewed = result.renewed();
        assert_ne!(renewed.op_id, result.op_id);
        assert_eq!(renewed.changes, result.changes);
    }

    #[test]
    fn test_outline_swap() {
        let mut state = CourseState::new("Course");
        let mut swap = OutlineSwap::default();

        let unchanged = state.outline.clone();
        assert!(!swap.commit(&mut state, unchanged));
        assert!(!swap.restore_after(&mut state));

        let (next, _) = state.outline.add_section("Intro");
        assert!(swap.commit(&mut state, next));
        assert_eq!(state.sections().len(), 1);

        swap.restore_before(&mut state);
        assert!(state.sections().is_empty());
        assert!(swap.restore_after(&mut state));
        assert_eq!(state.sections().len(), 1);
    }
}
