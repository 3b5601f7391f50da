//! Default Payload Factories
//!
//! One factory per content type. Theme application and "create new item of
//! type T" both consult this table, so the two paths always agree.

use super::models::{
    AssignmentData, ContentData, ContentType, QuizData, SubmissionType, TextData, TextFormat,
    TranscriptData, VideoData,
};

/// Default quiz passing score (percent)
pub const DEFAULT_PASSING_SCORE: i32 = 70;

/// Default upload limit for assignments (megabytes)
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Default accepted upload extensions for assignments
pub const DEFAULT_ALLOWED_FILE_TYPES: [&str; 3] = [".pdf", ".doc", ".docx"];

/// Produces a type's canonical default payload
pub type DefaultFactory = fn() -> ContentData;

/// Factory table, one entry per content type
pub const DEFAULT_FACTORIES: [(ContentType, DefaultFactory); 5] = [
    (ContentType::Video, default_video),
    (ContentType::Text, default_text),
    (ContentType::Quiz, default_quiz),
    (ContentType::Assignment, default_assignment),
    (ContentType::Transcript, default_transcript),
];

impl ContentType {
    /// Returns this type's default factory
    pub fn default_factory(&self) -> DefaultFactory {
        match self {
            ContentType::Video => default_video,
            ContentType::Text => default_text,
            ContentType::Quiz => default_quiz,
            ContentType::Assignment => default_assignment,
            ContentType::Transcript => default_transcript,
        }
    }

    /// Builds this type's canonical default payload
    pub fn default_data(&self) -> ContentData {
        (self.default_factory())()
    }
}

impl Default for VideoData {
    fn default() -> Self {
        Self {
            url: String::new(),
            duration: 0.0,
            has_transcript: false,
            transcript_content: None,
        }
    }
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            content: String::new(),
            formatting: TextFormat::Html,
        }
    }
}

impl Default for QuizData {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            passing_score: DEFAULT_PASSING_SCORE,
            allow_retakes: true,
            time_limit: None,
        }
    }
}

impl Default for AssignmentData {
    fn default() -> Self {
        Self {
            description: String::new(),
            submission_type: SubmissionType::File,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE_MB),
            due_date: None,
        }
    }
}

impl Default for TranscriptData {
    fn default() -> Self {
        Self {
            video_id: String::new(),
            content: String::new(),
            timestamps: Vec::new(),
        }
    }
}

fn default_video() -> ContentData {
    ContentData::Video(VideoData::default())
}

fn default_text() -> ContentData {
    ContentData::Text(TextData::default())
}

fn default_quiz() -> ContentData {
    ContentData::Quiz(QuizData::default())
}

fn default_assignment() -> ContentData {
    ContentData::Assignment(AssignmentData::default())
}

fn default_transcript() -> ContentData {
    ContentData::Transcript(TranscriptData::default())
}
