//! Preview Synchronization Store
//!
//! Single source of truth for the live preview of one authoring session.
//!
//! The current lesson is held as an immutable [`LessonSnapshot`] behind an
//! `Arc`. Every content change replaces the snapshot with a freshly derived one,
//! so a reader holding an older `Arc` keeps seeing a consistent lesson.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::renderer::{self, PreviewDocument};
use crate::core::{
    content::ContentItem, course::Lesson, settings::PreviewSettings, theme::Theme, LessonId,
    Point2D, Size2D,
};

/// Smallest allowed preview scale
pub const MIN_PREVIEW_SCALE: f64 = 0.25;

/// Largest allowed preview scale
pub const MAX_PREVIEW_SCALE: f64 = 2.0;

/// Smallest allowed preview width
pub const MIN_PREVIEW_WIDTH: f64 = 200.0;

/// Smallest allowed preview height
pub const MIN_PREVIEW_HEIGHT: f64 = 150.0;

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only copy of a lesson's displayable data
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSnapshot {
    pub lesson_id: LessonId,
    pub title: String,
    pub description: String,
    pub content: Vec<ContentItem>,
}

impl LessonSnapshot {
    /// Copies the displayable fields of a lesson
    pub fn of(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            content: lesson.content_items.clone(),
        }
    }
}

/// Partial update of the current snapshot; `None` fields are kept
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreviewDataPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<Vec<ContentItem>>,
}

impl PreviewDataPatch {
    /// A patch carrying every displayable field of `lesson`
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            title: Some(lesson.title.clone()),
            description: Some(lesson.description.clone()),
            content: Some(lesson.content_items.clone()),
        }
    }

    /// A patch replacing only the content list
    pub fn content(items: Vec<ContentItem>) -> Self {
        Self {
            content: Some(items),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.content.is_none()
    }
}

// =============================================================================
// Preview State
// =============================================================================

/// Observable preview state
#[derive(Clone, Debug)]
pub struct PreviewState {
    pub is_open: bool,
    pub current_lesson: Option<Arc<LessonSnapshot>>,
    pub selected_theme: Option<&'static Theme>,
    pub scale: f64,
    pub position: Point2D,
    pub size: Size2D,
}

// =============================================================================
// Preview Store
// =============================================================================

/// Session-scoped preview store
#[derive(Debug)]
pub struct PreviewStore {
    state: PreviewState,
    /// Bumped whenever the snapshot is re-derived
    revision: u64,
}

impl PreviewStore {
    /// Creates a closed store with geometry taken from settings
    pub fn new(settings: &PreviewSettings) -> Self {
        Self {
            state: PreviewState {
                is_open: false,
                current_lesson: None,
                selected_theme: None,
                scale: clamp_scale(settings.default_scale),
                position: settings.default_position,
                size: clamp_size(settings.default_size),
            },
            revision: 0,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<Arc<LessonSnapshot>> {
        self.state.current_lesson.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn current_lesson_id(&self) -> Option<&str> {
        self.state
            .current_lesson
            .as_ref()
            .map(|s| s.lesson_id.as_str())
    }

    /// Returns true if `lesson_id` is the previewed lesson
    pub fn is_current(&self, lesson_id: &str) -> bool {
        self.current_lesson_id() == Some(lesson_id)
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Makes `lesson` the previewed lesson
    pub fn set_current_lesson(&mut self, lesson: &Lesson) {
        self.replace_snapshot(LessonSnapshot::of(lesson));
    }

    pub fn clear_current_lesson(&mut self) {
        if self.state.current_lesson.take().is_some() {
            self.revision += 1;
        }
    }

    /// Re-derives the snapshot with the patched fields.
    ///
    /// Returns false when no lesson is being previewed.
    pub fn update_preview_data(&mut self, patch: PreviewDataPatch) -> bool {
        let Some(current) = self.state.current_lesson.as_deref() else {
            debug!("update_preview_data: no current lesson, ignoring patch");
            return false;
        };
        if patch.is_empty() {
            return true;
        }

        let next = LessonSnapshot {
            lesson_id: current.lesson_id.clone(),
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            description: patch
                .description
                .unwrap_or_else(|| current.description.clone()),
            content: patch.content.unwrap_or_else(|| current.content.clone()),
        };
        self.replace_snapshot(next);
        true
    }

    fn replace_snapshot(&mut self, snapshot: LessonSnapshot) {
        self.state.current_lesson = Some(Arc::new(snapshot));
        self.revision += 1;
    }

    // =========================================================================
    // Theme & Visibility
    // =========================================================================

    pub fn set_selected_theme(&mut self, theme: Option<&'static Theme>) {
        self.state.selected_theme = theme;
    }

    /// Flips visibility and returns the new state
    pub fn toggle_preview(&mut self) -> bool {
        self.state.is_open = !self.state.is_open;
        self.state.is_open
    }

    pub fn open(&mut self) {
        self.state.is_open = true;
    }

    pub fn close(&mut self) {
        self.state.is_open = false;
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn set_preview_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            warn!("Ignoring non-finite preview scale {}", scale);
            return;
        }
        self.state.scale = clamp_scale(scale);
    }

    pub fn set_preview_position(&mut self, position: Point2D) {
        if !position.x.is_finite() || !position.y.is_finite() {
            warn!("Ignoring non-finite preview position {:?}", position);
            return;
        }
        self.state.position = position;
    }

    pub fn set_preview_size(&mut self, size: Size2D) {
        self.state.size = clamp_size(size);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders the current snapshot with the selected theme
    pub fn render(&self) -> Option<PreviewDocument> {
        let snapshot = self.state.current_lesson.as_deref()?;
        Some(renderer::render(
            &snapshot.title,
            &snapshot.description,
            &snapshot.content,
            self.state.selected_theme,
        ))
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_PREVIEW_SCALE, MAX_PREVIEW_SCALE)
    } else {
        1.0
    }
}

fn clamp_size(size: Size2D) -> Size2D {
    Size2D::new(
        size.width.max(MIN_PREVIEW_WIDTH),
        size.height.max(MIN_PREVIEW_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentType;
    use crate::core::theme::find_theme;

    fn lesson_with_items(count: usize) -> Lesson {
        let mut lesson = Lesson::new("Lesson");
        lesson.description = "About".to_string();
        for i in 0..count {
            lesson
                .content_items
                .push(ContentItem::new(ContentType::Text, &format!("Item {i}")).at_order(i as u32));
        }
        lesson
    }

    fn store() -> PreviewStore {
        PreviewStore::new(&PreviewSettings::default())
    }

    #[test]
    fn test_new_store_is_closed_and_empty() {
        let store = store();
        assert!(!store.is_open());
        assert!(store.snapshot().is_none());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.state().scale, 1.0);
        assert!(store.render().is_none());
    }

    #[test]
    fn test_set_current_lesson_copies_fields() {
        let mut store = store();
        let lesson = lesson_with_items(2);
        store.set_current_lesson(&lesson);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.lesson_id, lesson.id);
        assert_eq!(snapshot.description, "About");
        assert_eq!(snapshot.content.len(), 2);
        assert!(store.is_current(&lesson.id));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_rederives_snapshot() {
        let mut store = store();
        let lesson = lesson_with_items(1);
        store.set_current_lesson(&lesson);
        let before = store.snapshot().unwrap();

        let mut items = lesson.content_items.clone();
        items.push(ContentItem::new(ContentType::Quiz, "Quiz"));
        assert!(store.update_preview_data(PreviewDataPatch::content(items)));

        let after = store.snapshot().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.content.len(), 1);
        assert_eq!(after.content.len(), 2);
        assert_eq!(after.title, "Lesson");
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_update_without_lesson_is_ignored() {
        let mut store = store();
        assert!(!store.update_preview_data(PreviewDataPatch::content(vec![])));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_geometry_clamps() {
        let mut store = store();
        store.set_preview_scale(5.0);
        assert_eq!(store.state().scale, MAX_PREVIEW_SCALE);
        store.set_preview_scale(0.01);
        assert_eq!(store.state().scale, MIN_PREVIEW_SCALE);
        store.set_preview_scale(f64::NAN);
        assert_eq!(store.state().scale, MIN_PREVIEW_SCALE);

        store.set_preview_size(Size2D::new(50.0, 1000.0));
        assert_eq!(store.state().size, Size2D::new(MIN_PREVIEW_WIDTH, 1000.0));

        store.set_preview_position(Point2D::new(f64::INFINITY, 3.0));
        assert_eq!(store.state().position, Point2D::default());
        store.set_preview_position(Point2D::new(40.0, 60.0));
        assert_eq!(store.state().position, Point2D::new(40.0, 60.0));
    }

    #[test]
    fn test_toggle_and_render_with_theme() {
        let mut store = store();
        assert!(store.toggle_preview());
        assert!(!store.toggle_preview());

        store.set_current_lesson(&lesson_with_items(1));
        store.set_selected_theme(find_theme("knowledge-check"));
        let doc = store.render().unwrap();
        assert_eq!(doc.theme_name.as_deref(), Some("Knowledge Check"));
        assert_eq!(doc.blocks.len(), 1);
    }
}
