//! Lesson Commands Module
//!
//! Implements lesson create/update/delete commands.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, OutlineSwap, StateChange},
    course::{CourseState, LessonField},
    new_id, CoreResult, LessonId, SectionId,
};

// =============================================================================
// AddLessonCommand
// =============================================================================

/// Command to append a new lesson to a section
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLessonCommand {
    pub section_id: SectionId,
    pub title: String,
    #[serde(skip)]
    swap: OutlineSwap,
    #[serde(skip)]
    result: Option<CommandResult>,
}

impl AddLessonCommand {
    pub fn new(section_id: &str, title: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            title: title.to_string(),
            swap: OutlineSwap::default(),
            result: None,
        }
    }
}

impl Command for AddLessonCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let (next, lesson_id) = state.outline.add_lesson(&self.section_id, &self.title);
        let Some(lesson_id) = lesson_id else {
            return Ok(CommandResult::noop());
        };
        self.swap.commit(state, next);

        let result = CommandResult::new(&new_id())
            .with_change(StateChange::LessonCreated {
                section_id: self.section_id.clone(),
                lesson_id: lesson_id.clone(),
            })
            .with_created_id(&lesson_id);
        self.result = Some(result.clone());
        Ok(result)
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn redo(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        match &self.result {
            Some(result) if self.swap.restore_after(state) => Ok(result.renewed()),
            _ => self.execute(state),
        }
    }

    fn type_name(&self) -> &'static str {
        "AddLesson"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// UpdateLessonCommand
// =============================================================================

/// Command to change one field of a lesson
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonCommand {
    pub lesson_id: LessonId,
    pub field: LessonField,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl UpdateLessonCommand {
    pub fn new(lesson_id: &str, field: LessonField) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            field,
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for UpdateLessonCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next = state.outline.update_lesson(&self.lesson_id, &self.field);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::LessonModified {
                lesson_id: self.lesson_id.clone(),
            }),
        )
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "UpdateLesson"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// DeleteLessonCommand
// =============================================================================

/// Command to remove a lesson
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLessonCommand {
    pub lesson_id: LessonId,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl DeleteLessonCommand {
    pub fn new(lesson_id: &str) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for DeleteLessonCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next = state.outline.delete_lesson(&self.lesson_id);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(CommandResult::new(&new_id())
            .with_change(StateChange::LessonDeleted {
                lesson_id: self.lesson_id.clone(),
            })
            .with_deleted_id(&self.lesson_id))
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "DeleteLesson"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
