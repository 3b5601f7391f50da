//! Theme Commands Module
//!
//! Applies a catalog theme to a lesson as one undoable step.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, OutlineSwap, StateChange},
    course::CourseState,
    new_id,
    theme::{apply_theme, find_theme},
    CoreError, CoreResult, LessonId, ThemeId,
};

/// Command to append a theme's default content to a lesson
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyThemeCommand {
    pub lesson_id: LessonId,
    pub theme_id: ThemeId,
    #[serde(skip)]
    swap: OutlineSwap,
    #[serde(skip)]
    result: Option<CommandResult>,
}

impl ApplyThemeCommand {
    pub fn new(lesson_id: &str, theme_id: &str) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            theme_id: theme_id.to_string(),
            swap: OutlineSwap::default(),
            result: None,
        }
    }
}

impl Command for ApplyThemeCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let theme =
            find_theme(&self.theme_id).ok_or_else(|| CoreError::ThemeNotFound(self.theme_id.clone()))?;

        let Some((next, items)) = apply_theme(&state.outline, theme, &self.lesson_id) else {
            return Ok(CommandResult::noop());
        };
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        let mut result = CommandResult::new(&new_id()).with_change(StateChange::ThemeApplied {
            lesson_id: self.lesson_id.clone(),
            theme_id: self.theme_id.clone(),
        });
        for item in &items {
            result = result
                .with_change(StateChange::ContentAdded {
                    lesson_id: self.lesson_id.clone(),
                    item_id: item.id.clone(),
                })
                .with_created_id(&item.id);
        }
        self.result = Some(result.clone());
        Ok(result)
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    /// Restores the same synthesized items rather than minting new ids
    fn redo(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        match &self.result {
            Some(result) if self.swap.restore_after(state) => Ok(result.renewed()),
            _ => self.execute(state),
        }
    }

    fn type_name(&self) -> &'static str {
        "ApplyTheme"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
