//! Content Item Commands Module
//!
//! Implements add/update/delete/reorder of a lesson's content items.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, OutlineSwap, StateChange},
    content::ContentItem,
    course::CourseState,
    new_id,
    reorder::ReorderMove,
    ContentItemId, CoreResult, LessonId,
};

// =============================================================================
// AddContentItemsCommand
// =============================================================================

/// Command to append items to a lesson
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContentItemsCommand {
    pub lesson_id: LessonId,
    pub items: Vec<ContentItem>,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl AddContentItemsCommand {
    pub fn new(lesson_id: &str, items: Vec<ContentItem>) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            items,
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for AddContentItemsCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let Some(lesson) = state.outline.lesson(&self.lesson_id) else {
            return Ok(CommandResult::noop());
        };
        let added: Vec<ContentItemId> = self
            .items
            .iter()
            .filter(|item| lesson.item(&item.id).is_none())
            .map(|item| item.id.clone())
            .collect();

        let next = state.outline.add_content_items(&self.lesson_id, &self.items);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        let mut result = CommandResult::new(&new_id());
        for item_id in &added {
            result = result
                .with_change(StateChange::ContentAdded {
                    lesson_id: self.lesson_id.clone(),
                    item_id: item_id.clone(),
                })
                .with_created_id(item_id);
        }
        Ok(result)
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "AddContentItems"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// UpdateContentItemCommand
// =============================================================================

/// Command to replace an existing item's title and payload
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentItemCommand {
    pub lesson_id: LessonId,
    pub item: ContentItem,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl UpdateContentItemCommand {
    pub fn new(lesson_id: &str, item: ContentItem) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            item,
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for UpdateContentItemCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next = state.outline.update_content_item(&self.lesson_id, &self.item);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::ContentModified {
                lesson_id: self.lesson_id.clone(),
                item_id: self.item.id.clone(),
            }),
        )
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "UpdateContentItem"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// DeleteContentItemCommand
// =============================================================================

/// Command to remove an item from a lesson
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentItemCommand {
    pub lesson_id: LessonId,
    pub item_id: ContentItemId,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl DeleteContentItemCommand {
    pub fn new(lesson_id: &str, item_id: &str) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            item_id: item_id.to_string(),
            swap: OutlineSwap::default(),
        }
    }
}

impl Command for DeleteContentItemCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next = state
            .outline
            .delete_content_item(&self.lesson_id, &self.item_id);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(CommandResult::new(&new_id())
            .with_change(StateChange::ContentRemoved {
                lesson_id: self.lesson_id.clone(),
                item_id: self.item_id.clone(),
            })
            .with_deleted_id(&self.item_id))
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "DeleteContentItem"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// ReorderContentItemsCommand
// =============================================================================

/// Command to move one item to another position
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderContentItemsCommand {
    pub lesson_id: LessonId,
    pub from_index: usize,
    pub to_index: usize,
    #[serde(skip)]
    swap: OutlineSwap,
}

impl ReorderContentItemsCommand {
    pub fn new(lesson_id: &str, from_index: usize, to_index: usize) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            from_index,
            to_index,
            swap: OutlineSwap::default(),
        }
    }

    /// Builds the command from a drag or keyboard move
    pub fn from_move(lesson_id: &str, reorder: ReorderMove) -> Self {
        Self::new(lesson_id, reorder.from, reorder.to)
    }
}

impl Command for ReorderContentItemsCommand {
    fn execute(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let next =
            state
                .outline
                .reorder_content_items(&self.lesson_id, self.from_index, self.to_index);
        if !self.swap.commit(state, next) {
            return Ok(CommandResult::noop());
        }

        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::ContentReordered {
                lesson_id: self.lesson_id.clone(),
                from_index: self.from_index,
                to_index: self.to_index,
            }),
        )
    }

    fn undo(&self, state: &mut CourseState) -> CoreResult<()> {
        self.swap.restore_before(state);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "ReorderContentItems"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
