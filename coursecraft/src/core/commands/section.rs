//! Section Commands Module
//!
//! Implements section create/update/delete commands.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, OutlineSwap, StateChange},
    course::{CourseState, SectionField},
    new_id, CoreResult, SectionId,
};

// =============================================================================
// AddSectionCommand
// =============================================================================

/// Command to append a new section
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionCommand {
    pub title: String,
    /// Created section ID (stored after execution)
    #[serde(skip)]
    created_section_id: Option<SectionId>,
    #[serde(skip)]
    swap: OutlineSwap,
    #[serde(skip)]
    result: Option<CommandResult>,
}

impl AddSectionCommand {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            created_section_id: None,
            swap: OutlineSwap::default(),
            result: None,
        }
    }

    pub fn created_section_id(&self) -> Option<&SectionId> {
        self.created_section_id.as_ref()
    }
}

impl Command for AddSectionCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let (next, section_id) = state.outline.add_section(&self.title);
        self.swap.commit(state, next);

        let result = CommandResult::new(&new_id())
            .with_change(StateChange::SectionCreated {
                section_id: section_id.clone(),
            })
            .with_created_id(&section_id);

        self.created_section_id = Some(section_id);
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
        "AddSection"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// UpdateSectionCommand
// =============================================================================

/// Command to change one field of a section
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionCommand {
    pub section_id: SectionId,
    pub field: SectionField,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl UpdateSectionCommand {
    pub fn new(section_id: &str, field: SectionField) -> Self {
        Self {
            section_id: section_id.to_string(),
            field,
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for UpdateSectionCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next = state.outline.update_section(&self.section_id, &self.field);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::SectionModified {
                section_id: self.section_id.clone(),
            }),
        )
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "UpdateSection"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// DeleteSectionCommand
// =============================================================================

/// Command to remove a section with all of its lessons
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSectionCommand {
    pub section_id: SectionId,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl DeleteSectionCommand {
    pub fn new(section_id: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for DeleteSectionCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let lesson_ids: Vec<String> = state
            .outline
            .section(&self.section_id)
            .map(|s| s.lessons.iter().map(|l| l.id.clone()).collect())
            .unwrap_or_default();

        let next = state.outline.delete_section(&self.section_id);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        let mut result = CommandResult::new(&new_id())
            .with_change(StateChange::SectionDeleted {
                section_id: self.section_id.clone(),
            })
            .with_deleted_id(&self.section_id);
        for lesson_id in &lesson_ids {
            result = result
                .with_change(StateChange::LessonDeleted {
                    lesson_id: lesson_id.clone(),
                })
                .with_deleted_id(lesson_id);
        }
        Ok(result)
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "DeleteSection"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_section_undo() {
        let mut state = CourseState::new("Course");
        let mut cmd = AddSectionCommand::new("Week 1");

        let result = cmd.execute(&mut state).unwrap();
        assert_eq!(cmd.created_section_id(), Some(&result.created_ids[0]));
        assert_eq!(state.sections()[0].title, "Week 1");

        cmd.undo(&mut state).unwrap();
        assert!(state.sections().is_empty());
    }

    #[test]
    fn test_update_section_same_value_is_noop() {
        let mut state = CourseState::new("Course");
        let mut add = AddSectionCommand::new("Week 1");
        let section_id = add.execute(&mut state).unwrap().created_ids[0].clone();

        let mut rename = UpdateSectionCommand::new(&section_id, SectionField::Title("Week 1".into()));
        assert!(rename.execute(&mut state).unwrap().is_noop());

        let mut collapse = UpdateSectionCommand::new(&section_id, SectionField::IsExpanded(false));
        assert!(!collapse.execute(&mut state).unwrap().is_noop());
        assert!(!state.sections()[0].is_expanded);
        collapse.undo(&mut state).unwrap();
        assert!(state.sections()[0].is_expanded);
    }

    #[test]
    fn test_delete_section_reports_lessons() {
        let mut state = CourseState::new("Course");
        let (outline, section_id) = state.outline.add_section("Week 1");
        let (outline, lesson_id) = outline.add_lesson(&section_id, "Intro");
        state.outline = outline;

        let mut cmd = DeleteSectionCommand::new(&section_id);
        let result = cmd.execute(&mut state).unwrap();
        assert!(result.deleted_ids.contains(&lesson_id.unwrap()));
        assert!(state.sections().is_empty());

        cmd.undo(&mut state).unwrap();
        assert_eq!(state.outline.lesson_count(), 1);
    }

    #[test]
    fn test_to_json() {
        let cmd = UpdateSectionCommand::new("s1", SectionField::Title("New".into()));
        let json = cmd.to_json();
        assert_eq!(json["sectionId"], "s1");
        assert_eq!(json["field"]["field"], "title");
    }
}
