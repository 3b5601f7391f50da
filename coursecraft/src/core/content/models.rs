//! Content Item Models
//!
//! Typed representation of a single unit of lesson content.
//!
//! # Overview
//!
//! A [`ContentItem`] carries an id, a display title, an ordering key and a
//! payload. The payload is the [`ContentData`] sum type, so the item's type and
//! its data shape can never disagree. The type is fixed at creation: the only
//! way to change it is to delete the item and create a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{new_id, ContentItemId, CoreError, CoreResult, QuestionId};

// =============================================================================
// Content Type
// =============================================================================

/// Discriminant of a content item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Text,
    Quiz,
    Assignment,
    Transcript,
}

impl ContentType {
    /// All content types, in editor tab order
    pub const ALL: [ContentType; 5] = [
        ContentType::Video,
        ContentType::Text,
        ContentType::Quiz,
        ContentType::Assignment,
        ContentType::Transcript,
    ];

    /// Wire name (`video`, `text`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Text => "text",
            ContentType::Quiz => "quiz",
            ContentType::Assignment => "assignment",
            ContentType::Transcript => "transcript",
        }
    }

    /// Parses a wire name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Video payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    /// Source URL
    pub url: String,
    /// Duration in seconds
    pub duration: f64,
    /// Whether a transcript is attached
    pub has_transcript: bool,
    /// Transcript text (if attached)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_content: Option<String>,
}

/// Markup flavour of a text block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Html,
    Markdown,
}

/// Rich text payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    /// Rich markup string
    pub content: String,
    pub formatting: TextFormat,
}

/// Kind of quiz question
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// Expected answer of a quiz question
///
/// Multiple-choice answers are option indices, true/false answers are booleans
/// and short answers are free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Index(usize),
    Text(String),
}

/// A single quiz question
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// Creates a multiple-choice question
    pub fn multiple_choice(question: &str, options: &[&str], correct: usize) -> Self {
        Self {
            id: new_id(),
            kind: QuestionKind::MultipleChoice,
            question: question.to_string(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            correct_answer: Answer::Index(correct),
            explanation: None,
        }
    }

    /// Creates a true/false question
    pub fn true_false(question: &str, correct: bool) -> Self {
        Self {
            id: new_id(),
            kind: QuestionKind::TrueFalse,
            question: question.to_string(),
            options: None,
            correct_answer: Answer::Bool(correct),
            explanation: None,
        }
    }

    /// Creates a short-answer question
    pub fn short_answer(question: &str, answer: &str) -> Self {
        Self {
            id: new_id(),
            kind: QuestionKind::ShortAnswer,
            question: question.to_string(),
            options: None,
            correct_answer: Answer::Text(answer.to_string()),
            explanation: None,
        }
    }
}

/// Quiz payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    pub questions: Vec<QuizQuestion>,
    /// Percentage required to pass (valid range 0-100, checked at save time)
    pub passing_score: i32,
    pub allow_retakes: bool,
    /// Time limit in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

/// How students hand in an assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    #[default]
    File,
    Text,
    Both,
}

impl SubmissionType {
    /// Returns true if file uploads are part of the submission
    pub fn accepts_files(&self) -> bool {
        matches!(self, SubmissionType::File | SubmissionType::Both)
    }
}

/// Assignment payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentData {
    pub description: String,
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    /// Maximum upload size in megabytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// A timed line of a transcript
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTimestamp {
    /// Offset in seconds
    pub time: f64,
    pub text: String,
}

/// Transcript payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptData {
    /// Content item id of the video this transcript belongs to (may be empty)
    pub video_id: String,
    pub content: String,
    #[serde(default)]
    pub timestamps: Vec<TranscriptTimestamp>,
}

/// Type-tagged content payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ContentData {
    Video(VideoData),
    Text(TextData),
    Quiz(QuizData),
    Assignment(AssignmentData),
    Transcript(TranscriptData),
}

impl ContentData {
    /// Returns the content type this payload belongs to
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentData::Video(_) => ContentType::Video,
            ContentData::Text(_) => ContentType::Text,
            ContentData::Quiz(_) => ContentType::Quiz,
            ContentData::Assignment(_) => ContentType::Assignment,
            ContentData::Transcript(_) => ContentType::Transcript,
        }
    }
}

// =============================================================================
// Content Item
// =============================================================================

/// A single typed unit of lesson content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique within the owning lesson, stable for the item's lifetime
    pub id: ContentItemId,
    /// Display title (may be empty)
    pub title: String,
    /// Position among siblings
    pub order: u32,
    #[serde(flatten)]
    data: ContentData,
}

impl ContentItem {
    /// Creates an item of the given type with that type's default payload
    pub fn new(content_type: ContentType, title: &str) -> Self {
        Self::with_data(title, content_type.default_data())
    }

    /// Creates an item from an explicit payload
    pub fn with_data(title: &str, data: ContentData) -> Self {
        Self::from_parts(new_id(), title, 0, data)
    }

    /// Assembles an item from already known parts
    pub fn from_parts(id: impl Into<ContentItemId>, title: &str, order: u32, data: ContentData) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            order,
            data,
        }
    }

    /// Sets the ordering key
    pub fn at_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Returns the item's type
    pub fn content_type(&self) -> ContentType {
        self.data.content_type()
    }

    /// Returns the payload
    pub fn data(&self) -> &ContentData {
        &self.data
    }

    /// Replaces the payload, rejecting payloads of another type
    pub fn replace_data(&mut self, data: ContentData) -> CoreResult<()> {
        if data.content_type() != self.content_type() {
            return Err(CoreError::ContentTypeMismatch {
                expected: self.content_type(),
                actual: data.content_type(),
            });
        }
        self.data = data;
        Ok(())
    }
}
