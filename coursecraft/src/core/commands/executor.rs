//! Command Executor Module
//!
//! Undo/redo history for course edits. Every outline change made by the
//! session passes through here.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{
    commands::{Command, CommandResult},
    course::CourseState,
    CoreError, CoreResult,
};

/// Default maximum number of undoable commands
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Recorded edit: the command plus the result it last produced
struct Recorded {
    command: Box<dyn Command>,
    result: CommandResult,
}

/// Executes commands and keeps their undo/redo history
pub struct CommandExecutor {
    undo_stack: VecDeque<Recorded>,
    redo_stack: Vec<Recorded>,
    max_history_size: usize,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history_size: DEFAULT_MAX_HISTORY,
        }
    }

    /// Caps the undo stack; the oldest edits are forgotten first
    pub fn with_max_history(mut self, size: usize) -> Self {
        self.max_history_size = size.max(1);
        self
    }

    /// Executes a command and records it.
    ///
    /// No-op results (stale targets, unchanged values) are returned but not
    /// recorded, and leave the redo stack intact.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        state: &mut CourseState,
    ) -> CoreResult<CommandResult> {
        let result = command.execute(state)?;
        if result.is_noop() {
            debug!("{} changed nothing, not recorded", command.type_name());
            return Ok(result);
        }
        debug!("Executed {} ({})", command.type_name(), result.op_id);

        self.redo_stack.clear();
        self.undo_stack.push_back(Recorded {
            command,
            result: result.clone(),
        });
        if self.undo_stack.len() > self.max_history_size {
            self.undo_stack.pop_front();
        }

        state.op_count += 1;
        state.is_dirty = true;
        Ok(result)
    }

    /// Reverts the most recent edit
    pub fn undo(&mut self, state: &mut CourseState) -> CoreResult<()> {
        let recorded = self.undo_stack.pop_back().ok_or(CoreError::NothingToUndo)?;
        if let Err(e) = recorded.command.undo(state) {
            self.undo_stack.push_back(recorded);
            return Err(e);
        }
        debug!(
            "Undid {} ({})",
            recorded.command.type_name(),
            recorded.result.op_id
        );

        self.redo_stack.push(recorded);
        state.is_dirty = true;
        Ok(())
    }

    /// Re-applies the most recently undone edit
    pub fn redo(&mut self, state: &mut CourseState) -> CoreResult<CommandResult> {
        let mut recorded = self.redo_stack.pop().ok_or(CoreError::NothingToRedo)?;
        let result = match recorded.command.redo(state) {
            Ok(result) => result,
            Err(e) => {
                self.redo_stack.push(recorded);
                return Err(e);
            }
        };
        debug!("Redid {} ({})", recorded.command.type_name(), result.op_id);

        recorded.result = result.clone();
        self.undo_stack.push_back(recorded);
        state.is_dirty = true;
        Ok(result)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Type name of the edit `undo` would revert
    pub fn last_command_type(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|r| r.command.type_name())
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
