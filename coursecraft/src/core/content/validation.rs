//! Content Validation
//!
//! Type-specific validation run when an editor saves. Construction never
//! validates: an item may exist with empty default data until it is saved.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{
    Answer, AssignmentData, ContentData, ContentItem, QuestionKind, QuizData, QuizQuestion,
    TextData, TranscriptData, VideoData,
};

// =============================================================================
// Field Errors
// =============================================================================

/// A validation failure tied to one editor field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Dotted field path, e.g. `passingScore` or `questions[1].options`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field errors that blocked a save
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} field error(s): {}", .0.len(), join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Returns true if the given field has at least one error
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validate Trait
// =============================================================================

/// Minimal required-field rules of a payload
pub trait Validate {
    /// Returns every field error; empty means the payload may be saved
    fn validate(&self) -> Vec<FieldError>;
}

fn file_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\.?[A-Za-z0-9]+$").expect("valid file type regex"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://\S+$").expect("valid url regex"))
}

impl Validate for VideoData {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let url = self.url.trim();
        if url.is_empty() {
            errors.push(FieldError::new("url", "Video URL is required"));
        } else if !url_pattern().is_match(url) {
            errors.push(FieldError::new("url", "Video URL must start with http:// or https://"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            errors.push(FieldError::new("duration", "Duration must be zero or more seconds"));
        }
        errors
    }
}

impl Validate for TextData {
    fn validate(&self) -> Vec<FieldError> {
        if self.content.trim().is_empty() {
            vec![FieldError::new("content", "Text content is required")]
        } else {
            Vec::new()
        }
    }
}

fn validate_question(index: usize, question: &QuizQuestion) -> Vec<FieldError> {
    let prefix = format!("questions[{}]", index);
    let mut errors = Vec::new();

    if question.question.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{}.question", prefix),
            "Question text is required",
        ));
    }

    match question.kind {
        QuestionKind::MultipleChoice => {
            let options = question.options.as_deref().unwrap_or(&[]);
            if options.len() < 2 {
                errors.push(FieldError::new(
                    format!("{}.options", prefix),
                    "Multiple choice questions need at least two options",
                ));
            } else if options.iter().any(|o| o.trim().is_empty()) {
                errors.push(FieldError::new(
                    format!("{}.options", prefix),
                    "Options cannot be blank",
                ));
            }
            match &question.correct_answer {
                Answer::Index(i) if *i < options.len() => {}
                _ => errors.push(FieldError::new(
                    format!("{}.correctAnswer", prefix),
                    "Select one of the options as the correct answer",
                )),
            }
        }
        QuestionKind::TrueFalse => {
            if !matches!(question.correct_answer, Answer::Bool(_)) {
                errors.push(FieldError::new(
                    format!("{}.correctAnswer", prefix),
                    "Correct answer must be true or false",
                ));
            }
        }
        QuestionKind::ShortAnswer => match &question.correct_answer {
            Answer::Text(text) if !text.trim().is_empty() => {}
            _ => errors.push(FieldError::new(
                format!("{}.correctAnswer", prefix),
                "Expected answer is required",
            )),
        },
    }

    errors
}

impl Validate for QuizData {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !(0..=100).contains(&self.passing_score) {
            errors.push(FieldError::new(
                "passingScore",
                "Passing score must be between 0 and 100",
            ));
        }
        if self.time_limit == Some(0) {
            errors.push(FieldError::new(
                "timeLimit",
                "Time limit must be at least one minute",
            ));
        }
        for (index, question) in self.questions.iter().enumerate() {
            errors.extend(validate_question(index, question));
        }
        errors
    }
}

impl Validate for AssignmentData {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.submission_type.accepts_files() {
            if self.allowed_file_types.is_empty() {
                errors.push(FieldError::new(
                    "allowedFileTypes",
                    "At least one file type is required for file submissions",
                ));
            }
            if let Some(bad) = self
                .allowed_file_types
                .iter()
                .find(|t| !file_type_pattern().is_match(t.trim()))
            {
                errors.push(FieldError::new(
                    "allowedFileTypes",
                    format!("Invalid file type: '{}'", bad),
                ));
            }
        }
        if self.max_file_size == Some(0) {
            errors.push(FieldError::new(
                "maxFileSize",
                "Maximum file size must be greater than zero",
            ));
        }
        errors
    }
}

impl Validate for TranscriptData {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut previous = 0.0_f64;
        for (index, stamp) in self.timestamps.iter().enumerate() {
            if !stamp.time.is_finite() || stamp.time < 0.0 {
                errors.push(FieldError::new(
                    format!("timestamps[{}].time", index),
                    "Timestamp must be zero or more seconds",
                ));
            } else if stamp.time < previous {
                errors.push(FieldError::new(
                    format!("timestamps[{}].time", index),
                    "Timestamps must be in ascending order",
                ));
            } else {
                previous = stamp.time;
            }
        }
        errors
    }
}

impl Validate for ContentData {
    fn validate(&self) -> Vec<FieldError> {
        match self {
            ContentData::Video(data) => data.validate(),
            ContentData::Text(data) => data.validate(),
            ContentData::Quiz(data) => data.validate(),
            ContentData::Assignment(data) => data.validate(),
            ContentData::Transcript(data) => data.validate(),
        }
    }
}

impl Validate for ContentItem {
    fn validate(&self) -> Vec<FieldError> {
        self.data().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{ContentType, SubmissionType, TranscriptTimestamp};

    #[test]
    fn test_quiz_passing_score_range() {
        let mut quiz = QuizData::default();
        assert!(quiz.validate().is_empty());

        quiz.passing_score = 101;
        let errors = quiz.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "passingScore");

        quiz.passing_score = -1;
        assert_eq!(quiz.validate()[0].field, "passingScore");
    }

    #[test]
    fn test_quiz_question_rules() {
        let quiz = QuizData {
            questions: vec![
                QuizQuestion::multiple_choice("Capital of France?", &["Paris", "Rome"], 0),
                QuizQuestion::multiple_choice("Pick one", &["Only"], 3),
                QuizQuestion::true_false("Rust has a GC", false),
                QuizQuestion::short_answer("", "   "),
            ],
            ..QuizData::default()
        };

        let errors = ValidationErrors(quiz.validate());
        assert!(!errors.has_field("questions[0].options"));
        assert!(errors.has_field("questions[1].options"));
        assert!(errors.has_field("questions[1].correctAnswer"));
        assert!(!errors.has_field("questions[2].correctAnswer"));
        assert!(errors.has_field("questions[3].question"));
        assert!(errors.has_field("questions[3].correctAnswer"));
    }

    #[test]
    fn test_assignment_requires_file_types_for_file_submission() {
        let mut assignment = AssignmentData {
            allowed_file_types: vec![],
            ..AssignmentData::default()
        };
        assert_eq!(assignment.validate()[0].field, "allowedFileTypes");

        assignment.submission_type = SubmissionType::Text;
        assert!(assignment.validate().is_empty());

        assignment.submission_type = SubmissionType::Both;
        assignment.allowed_file_types = vec!["pdf".to_string(), "../etc".to_string()];
        let errors = assignment.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("../etc"));
    }

    #[test]
    fn test_video_url_rules() {
        let mut video = VideoData::default();
        assert_eq!(video.validate()[0].field, "url");

        video.url = "ftp://example.com/a.mp4".to_string();
        assert_eq!(video.validate()[0].field, "url");

        video.url = "https://example.com/a.mp4".to_string();
        video.duration = -3.0;
        let errors = video.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "duration");
    }

    #[test]
    fn test_transcript_timestamps_ascending() {
        let transcript = TranscriptData {
            timestamps: vec![
                TranscriptTimestamp { time: 0.0, text: "a".into() },
                TranscriptTimestamp { time: 5.0, text: "b".into() },
                TranscriptTimestamp { time: 2.0, text: "c".into() },
            ],
            ..TranscriptData::default()
        };
        let errors = transcript.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timestamps[2].time");
    }

    #[test]
    fn test_default_items_that_are_saveable() {
        assert!(ContentType::Quiz.default_data().validate().is_empty());
        assert!(ContentType::Assignment.default_data().validate().is_empty());
        assert!(ContentType::Transcript.default_data().validate().is_empty());
        assert!(!ContentType::Video.default_data().validate().is_empty());
        assert!(!ContentType::Text.default_data().validate().is_empty());
    }

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors(vec![FieldError::new("url", "Video URL is required")]);
        assert_eq!(errors.to_string(), "1 field error(s): url: Video URL is required");
    }
}
