//! Theme Applicator
//!
//! Turns a theme's templates into concrete content items and appends them to a
//! lesson. Application is additive: existing items are never removed.

use tracing::debug;

use super::catalog::Theme;
use crate::core::{content::ContentItem, course::CourseOutline};

/// Instantiates a theme's templates with fresh ids and default payloads.
///
/// Each item's `order` is its template index.
pub fn synthesize_items(theme: &Theme) -> Vec<ContentItem> {
    theme
        .default_content
        .iter()
        .enumerate()
        .map(|(index, template)| {
            ContentItem::new(template.content_type, template.title).at_order(index as u32)
        })
        .collect()
}

/// Appends a freshly synthesized item set to a lesson.
///
/// Returns `None` when the lesson no longer exists.
pub fn apply_theme(
    outline: &CourseOutline,
    theme: &Theme,
    lesson_id: &str,
) -> Option<(CourseOutline, Vec<ContentItem>)> {
    if outline.lesson(lesson_id).is_none() {
        debug!(
            "apply_theme: lesson {} not found, ignoring theme {}",
            lesson_id, theme.id
        );
        return None;
    }
    let items = synthesize_items(theme);
    let next = outline.add_content_items(lesson_id, &items);
    Some((next, items))
}
