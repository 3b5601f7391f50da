//! Drag-Reorder Engine
//!
//! Pure reordering of a lesson's content list. Pointer drag-and-drop and
//! keyboard moves both reduce to a [`ReorderMove`], so the two input paths
//! produce identical orders for the same logical move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{content::ContentItem, ContentItemId};

/// A single array move: remove at `from`, insert at `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderMove {
    pub from: usize,
    pub to: usize,
}

/// Moves the element at `from` to `to`, shifting the elements in between.
///
/// Returns false (and leaves `items` untouched) when either index is out of
/// range or the indices are equal.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Resolves a drop of `active_id` onto `over_id` into an array move
pub fn compute_move(items: &[ContentItem], active_id: &str, over_id: &str) -> Option<ReorderMove> {
    if active_id == over_id {
        return None;
    }
    let from = items.iter().position(|i| i.id == active_id)?;
    let to = items.iter().position(|i| i.id == over_id)?;
    Some(ReorderMove { from, to })
}

/// Returns the reordered list for a drop of `from_id` onto `to_id`.
///
/// `None` means the drop is a no-op (same item, or an id that is not in the list).
pub fn compute_reorder(
    items: &[ContentItem],
    from_id: &str,
    to_id: &str,
) -> Option<Vec<ContentItem>> {
    let mv = compute_move(items, from_id, to_id)?;
    let mut next = items.to_vec();
    array_move(&mut next, mv.from, mv.to);
    Some(next)
}

/// Keyboard move direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Resolves a keyboard move of one item into an array move.
///
/// Moving the first item up or the last item down is a no-op.
pub fn keyboard_move(items: &[ContentItem], item_id: &str, direction: Direction) -> Option<ReorderMove> {
    let from = items.iter().position(|i| i.id == item_id)?;
    let to = match direction {
        Direction::Up => from.checked_sub(1)?,
        Direction::Down => from + 1,
    };
    if to >= items.len() {
        return None;
    }
    Some(ReorderMove { from, to })
}

// =============================================================================
// Drag State Machine
// =============================================================================

/// Pointer drag state of one lesson's content list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { item_id: ContentItemId },
}

/// `idle -> dragging(item) -> idle`
#[derive(Clone, Debug, Default)]
pub struct DragReorder {
    state: DragState,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts dragging an item, replacing any drag in progress
    pub fn begin(&mut self, item_id: &str) {
        self.state = DragState::Dragging {
            item_id: item_id.to_string(),
        };
    }

    /// Ends the drag over `over_id` (or outside any item) and returns the move to commit
    pub fn drop_on(&mut self, items: &[ContentItem], over_id: Option<&str>) -> Option<ReorderMove> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { item_id } = state else {
            debug!("Drop without an active drag ignored");
            return None;
        };
        compute_move(items, &item_id, over_id?)
    }

    /// Abandons the drag without moving anything
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
