//! Course Outline Aggregate
//!
//! The ordered sections/lessons/content of one course.
//!
//! Every operation takes `&self` and returns a new outline. Operations that
//! target an id which no longer exists return an unchanged copy: stale ids are
//! absorbed (and logged at debug level), never reported as errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::models::{Lesson, LessonField, Section, SectionField};
use crate::core::{
    content::{ContentItem, FieldError, Validate},
    reorder::array_move,
    ContentItemId, LessonId, SectionId,
};

/// A field error of one stored content item
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIssue {
    pub lesson_id: LessonId,
    pub item_id: ContentItemId,
    pub item_title: String,
    pub error: FieldError,
}

impl std::fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.item_title, self.item_id, self.error)
    }
}

/// Ordered sections of a course
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    pub sections: Vec<Section>,
}

impl CourseOutline {
    /// Creates an empty outline
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing sections
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Returns a section by ID
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Returns a lesson by ID
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == lesson_id)
    }

    /// Returns the ID of the section containing a lesson
    pub fn find_lesson_section(&self, lesson_id: &str) -> Option<&SectionId> {
        self.sections
            .iter()
            .find(|s| s.lessons.iter().any(|l| l.id == lesson_id))
            .map(|s| &s.id)
    }

    /// Iterates over every lesson in outline order
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.sections.iter().flat_map(|s| s.lessons.iter())
    }

    /// Total number of lessons
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    /// Runs content validation over every item in the course
    pub fn content_issues(&self) -> Vec<ContentIssue> {
        self.lessons()
            .flat_map(|lesson| {
                lesson.content_items.iter().flat_map(move |item| {
                    item.validate().into_iter().map(move |error| ContentIssue {
                        lesson_id: lesson.id.clone(),
                        item_id: item.id.clone(),
                        item_title: item.title.clone(),
                        error,
                    })
                })
            })
            .collect()
    }

    fn lesson_mut(&mut self, lesson_id: &str) -> Option<&mut Lesson> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.lessons.iter_mut())
            .find(|l| l.id == lesson_id)
    }

    fn with_section(&self, section_id: &str, op: &str, f: impl FnOnce(&mut Section)) -> Self {
        let mut next = self.clone();
        match next.sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => f(section),
            None => debug!("{}: section {} not found, ignoring", op, section_id),
        }
        next
    }

    fn with_lesson(&self, lesson_id: &str, op: &str, f: impl FnOnce(&mut Lesson)) -> Self {
        let mut next = self.clone();
        match next.lesson_mut(lesson_id) {
            Some(lesson) => f(lesson),
            None => debug!("{}: lesson {} not found, ignoring", op, lesson_id),
        }
        next
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// Appends a new empty section
    pub fn add_section(&self, title: &str) -> (Self, SectionId) {
        let section = Section::new(title);
        let section_id = section.id.clone();
        let mut next = self.clone();
        next.sections.push(section);
        (next, section_id)
    }

    /// Updates one field of a section
    pub fn update_section(&self, section_id: &str, field: &SectionField) -> Self {
        self.with_section(section_id, "update_section", |s| field.apply(s))
    }

    /// Removes a section and all of its lessons
    pub fn delete_section(&self, section_id: &str) -> Self {
        let mut next = self.clone();
        let before = next.sections.len();
        next.sections.retain(|s| s.id != section_id);
        if next.sections.len() == before {
            debug!("delete_section: section {} not found, ignoring", section_id);
        }
        next
    }

    // =========================================================================
    // Lessons
    // =========================================================================

    /// Appends a new lesson to a section.
    ///
    /// Returns `None` for the lesson ID when the section does not exist.
    pub fn add_lesson(&self, section_id: &str, title: &str) -> (Self, Option<LessonId>) {
        let lesson = Lesson::new(title);
        let lesson_id = lesson.id.clone();
        let mut created = None;
        let next = self.with_section(section_id, "add_lesson", |s| {
            s.lessons.push(lesson);
            created = Some(lesson_id);
        });
        (next, created)
    }

    /// Updates one field of a lesson
    pub fn update_lesson(&self, lesson_id: &str, field: &LessonField) -> Self {
        self.with_lesson(lesson_id, "update_lesson", |l| field.apply(l))
    }

    /// Removes a lesson from whichever section holds it
    pub fn delete_lesson(&self, lesson_id: &str) -> Self {
        let mut next = self.clone();
        let mut removed = false;
        for section in &mut next.sections {
            let before = section.lessons.len();
            section.lessons.retain(|l| l.id != lesson_id);
            removed |= section.lessons.len() != before;
        }
        if !removed {
            debug!("delete_lesson: lesson {} not found, ignoring", lesson_id);
        }
        next
    }

    // =========================================================================
    // Content Items
    // =========================================================================

    /// Appends items to a lesson, skipping ids the lesson already holds
    pub fn add_content_items(&self, lesson_id: &str, items: &[ContentItem]) -> Self {
        self.with_lesson(lesson_id, "add_content_items", |lesson| {
            let before = lesson.content_items.len();
            for item in items {
                if lesson.item(&item.id).is_some() {
                    warn!(
                        "add_content_items: item {} already in lesson {}, skipping",
                        item.id, lesson.id
                    );
                    continue;
                }
                lesson.content_items.push(item.clone());
            }
            if lesson.content_items.len() > before {
                lesson.renumber();
            }
        })
    }

    /// Replaces an existing item's title and payload, keeping its position.
    ///
    /// Items that no longer exist are not re-added, and an update that would
    /// change the item's type is ignored.
    pub fn update_content_item(&self, lesson_id: &str, item: &ContentItem) -> Self {
        self.with_lesson(lesson_id, "update_content_item", |lesson| {
            let Some(existing) = lesson.content_items.iter_mut().find(|i| i.id == item.id) else {
                debug!(
                    "update_content_item: item {} not in lesson {}, ignoring",
                    item.id, lesson.id
                );
                return;
            };
            if existing.content_type() != item.content_type() {
                warn!(
                    "update_content_item: refusing to change item {} from {} to {}",
                    item.id,
                    existing.content_type(),
                    item.content_type()
                );
                return;
            }
            let order = existing.order;
            *existing = item.clone();
            existing.order = order;
        })
    }

    /// Removes one item from a lesson
    pub fn delete_content_item(&self, lesson_id: &str, item_id: &str) -> Self {
        self.with_lesson(lesson_id, "delete_content_item", |lesson| {
            let before = lesson.content_items.len();
            lesson.content_items.retain(|i| i.id != item_id);
            if lesson.content_items.len() == before {
                debug!(
                    "delete_content_item: item {} not in lesson {}, ignoring",
                    item_id, lesson.id
                );
                return;
            }
            lesson.renumber();
        })
    }

    /// Moves the item at `from_index` to `to_index`; ids and payloads are untouched
    pub fn reorder_content_items(&self, lesson_id: &str, from_index: usize, to_index: usize) -> Self {
        self.with_lesson(lesson_id, "reorder_content_items", |lesson| {
            if array_move(&mut lesson.content_items, from_index, to_index) {
                lesson.renumber();
            } else {
                debug!(
                    "reorder_content_items: move {} -> {} ignored for lesson {}",
                    from_index, to_index, lesson.id
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{ContentData, ContentType, QuizData};

    fn outline_with_lesson() -> (CourseOutline, SectionId, LessonId) {
        let (outline, section_id) = CourseOutline::new().add_section("Week 1");
        let (outline, lesson_id) = outline.add_lesson(&section_id, "Getting started");
        (outline, section_id, lesson_id.unwrap())
    }

    fn types(outline: &CourseOutline, lesson_id: &str) -> Vec<ContentType> {
        outline
            .lesson(lesson_id)
            .unwrap()
            .content_items
            .iter()
            .map(|i| i.content_type())
            .collect()
    }

    #[test]
    fn test_mutations_return_new_values() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let next = outline.add_content_items(&lesson_id, &[ContentItem::new(ContentType::Text, "t")]);

        assert!(outline.lesson(&lesson_id).unwrap().content_items.is_empty());
        assert_eq!(next.lesson(&lesson_id).unwrap().content_items.len(), 1);
    }

    #[test]
    fn test_add_lesson_to_missing_section() {
        let (outline, _, _) = outline_with_lesson();
        let (next, created) = outline.add_lesson("missing", "Orphan");
        assert!(created.is_none());
        assert_eq!(next, outline);
    }

    #[test]
    fn test_update_and_delete_structure() {
        let (outline, section_id, lesson_id) = outline_with_lesson();
        let outline = outline
            .update_section(&section_id, &SectionField::Title("Week One".into()))
            .update_section(&section_id, &SectionField::IsExpanded(false))
            .update_lesson(&lesson_id, &LessonField::EstimatedDuration(45));

        let section = outline.section(&section_id).unwrap();
        assert_eq!(section.title, "Week One");
        assert!(!section.is_expanded);
        assert_eq!(outline.lesson(&lesson_id).unwrap().estimated_duration, 45);
        assert_eq!(outline.find_lesson_section(&lesson_id), Some(&section_id));

        let without_lesson = outline.delete_lesson(&lesson_id);
        assert_eq!(without_lesson.lesson_count(), 0);
        assert_eq!(without_lesson.sections.len(), 1);

        let empty = outline.delete_section(&section_id);
        assert!(empty.sections.is_empty());
        assert!(empty.lesson(&lesson_id).is_none());
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let (outline, _, lesson_id) = outline_with_lesson();

        assert_eq!(outline.delete_section("nope"), outline);
        assert_eq!(outline.delete_lesson("nope"), outline);
        assert_eq!(outline.update_lesson("nope", &LessonField::IsPublished(true)), outline);
        assert_eq!(
            outline.add_content_items("nope", &[ContentItem::new(ContentType::Quiz, "q")]),
            outline
        );
        assert_eq!(outline.delete_content_item(&lesson_id, "nope"), outline);
    }

    #[test]
    fn test_duplicate_item_ids_are_skipped() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let item = ContentItem::new(ContentType::Text, "t");
        let outline = outline.add_content_items(&lesson_id, &[item.clone(), item]);
        assert_eq!(outline.lesson(&lesson_id).unwrap().content_items.len(), 1);
    }

    #[test]
    fn test_update_content_item_keeps_position() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let items = vec![
            ContentItem::new(ContentType::Text, "a"),
            ContentItem::new(ContentType::Quiz, "b"),
        ];
        let outline = outline.add_content_items(&lesson_id, &items);

        let mut edited = items[1].clone();
        edited.title = "Final quiz".to_string();
        edited
            .replace_data(ContentData::Quiz(QuizData {
                passing_score: 80,
                ..QuizData::default()
            }))
            .unwrap();
        let outline = outline.update_content_item(&lesson_id, &edited);

        let lesson = outline.lesson(&lesson_id).unwrap();
        assert_eq!(lesson.content_items[1].title, "Final quiz");
        assert_eq!(lesson.content_items[1].order, 1);
    }

    #[test]
    fn test_update_cannot_change_type() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let item = ContentItem::new(ContentType::Text, "a");
        let outline = outline.add_content_items(&lesson_id, &[item.clone()]);

        let impostor = ContentItem::from_parts(item.id.clone(), "a", 0, ContentType::Quiz.default_data());
        let next = outline.update_content_item(&lesson_id, &impostor);

        assert_eq!(next, outline);
        assert_eq!(types(&next, &lesson_id), vec![ContentType::Text]);
    }

    #[test]
    fn test_update_deleted_item_does_not_resurrect() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let item = ContentItem::new(ContentType::Text, "a");
        let outline = outline
            .add_content_items(&lesson_id, &[item.clone()])
            .delete_content_item(&lesson_id, &item.id);

        let next = outline.update_content_item(&lesson_id, &item);
        assert!(next.lesson(&lesson_id).unwrap().content_items.is_empty());
    }

    #[test]
    fn test_reorder_preserves_identity_and_renumbers() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let items: Vec<_> = [ContentType::Video, ContentType::Text, ContentType::Quiz]
            .into_iter()
            .map(|t| ContentItem::new(t, t.as_str()))
            .collect();
        let outline = outline.add_content_items(&lesson_id, &items);

        let next = outline.reorder_content_items(&lesson_id, 0, 2);
        assert_eq!(
            types(&next, &lesson_id),
            vec![ContentType::Text, ContentType::Quiz, ContentType::Video]
        );

        let lesson = next.lesson(&lesson_id).unwrap();
        assert_eq!(lesson.content_items[2].id, items[0].id);
        assert_eq!(lesson.content_items[2].data(), items[0].data());
        let orders: Vec<u32> = lesson.content_items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let (outline, _, lesson_id) = outline_with_lesson();
        let outline = outline.add_content_items(&lesson_id, &[ContentItem::new(ContentType::Text, "a")]);
        assert_eq!(outline.reorder_content_items(&lesson_id, 0, 4), outline);
    }

    #[test]
    fn test_content_issues_cover_every_lesson() {
        let (outline, section_id, lesson_id) = outline_with_lesson();
        let (outline, other) = outline.add_lesson(&section_id, "Second");
        let other = other.unwrap();
        let outline = outline
            .add_content_items(&lesson_id, &[ContentItem::new(ContentType::Video, "Clip")])
            .add_content_items(&other, &[ContentItem::new(ContentType::Quiz, "Quiz")]);

        let issues = outline.content_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].lesson_id, lesson_id);
        assert_eq!(issues[0].error.field, "url");
        assert!(issues[0].to_string().starts_with("Clip"));
    }

    fn sparse_outline() -> (CourseOutline, LessonId) {
        let (outline, _, lesson_id) = outline_with_lesson();
        let mut outline = outline.add_content_items(
            &lesson_id,
            &[
                ContentItem::new(ContentType::Text, "a"),
                ContentItem::new(ContentType::Text, "b"),
            ],
        );
        outline.sections[0].lessons[0].content_items[1].order = 5;
        (outline, lesson_id)
    }

    #[test]
    fn test_missing_targets_keep_sparse_orders() {
        let (outline, lesson_id) = sparse_outline();
        let existing = outline.lesson(&lesson_id).unwrap().content_items[0].clone();

        assert_eq!(outline.delete_content_item(&lesson_id, "never-existed"), outline);
        assert_eq!(outline.add_content_items(&lesson_id, &[existing]), outline);
        assert_eq!(outline.add_content_items(&lesson_id, &[]), outline);
    }
}
