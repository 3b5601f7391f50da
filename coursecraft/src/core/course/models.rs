//! Course Structure Models
//!
//! Sections group lessons; lessons own an ordered list of content items.

use serde::{Deserialize, Serialize};

use crate::core::{content::ContentItem, new_id, LessonId, SectionId};

// =============================================================================
// Lesson
// =============================================================================

/// A lesson and its ordered content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Array position is the semantic order
    #[serde(default)]
    pub content_items: Vec<ContentItem>,
    #[serde(default)]
    pub is_published: bool,
    /// Estimated duration in minutes
    #[serde(default)]
    pub estimated_duration: u32,
}

impl Lesson {
    /// Creates an empty, unpublished lesson
    pub fn new(title: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            description: String::new(),
            content_items: Vec::new(),
            is_published: false,
            estimated_duration: 0,
        }
    }

    /// Returns a content item by ID
    pub fn item(&self, item_id: &str) -> Option<&ContentItem> {
        self.content_items.iter().find(|i| i.id == item_id)
    }

    /// Rewrites every item's `order` to match its array position
    pub(crate) fn renumber(&mut self) {
        for (index, item) in self.content_items.iter_mut().enumerate() {
            item.order = index as u32;
        }
    }
}

// =============================================================================
// Section
// =============================================================================

/// A titled group of lessons
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    /// Presentation-only flag, not structural
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl Section {
    /// Creates an empty, expanded section
    pub fn new(title: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            description: String::new(),
            lessons: Vec::new(),
            is_expanded: true,
        }
    }
}

// =============================================================================
// Field Updates
// =============================================================================

/// Editable section fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SectionField {
    Title(String),
    Description(String),
    IsExpanded(bool),
}

impl SectionField {
    pub(crate) fn apply(&self, section: &mut Section) {
        match self {
            SectionField::Title(v) => section.title = v.clone(),
            SectionField::Description(v) => section.description = v.clone(),
            SectionField::IsExpanded(v) => section.is_expanded = *v,
        }
    }
}

/// Editable lesson fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LessonField {
    Title(String),
    Description(String),
    IsPublished(bool),
    EstimatedDuration(u32),
}

impl LessonField {
    pub(crate) fn apply(&self, lesson: &mut Lesson) {
        match self {
            LessonField::Title(v) => lesson.title = v.clone(),
            LessonField::Description(v) => lesson.description = v.clone(),
            LessonField::IsPublished(v) => lesson.is_published = *v,
            LessonField::EstimatedDuration(v) => lesson.estimated_duration = *v,
        }
    }

    /// Returns true if the field is shown in the live preview
    pub fn affects_preview(&self) -> bool {
        matches!(self, LessonField::Title(_) | LessonField::Description(_))
    }
}
