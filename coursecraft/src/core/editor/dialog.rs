//! Content Editor Dialog
//!
//! Draft state of the modal content editor. The draft is seeded from an
//! existing item (edit) or from the type's defaults (create) and never touches
//! the course until [`EditorDialog::save`] hands back a finished item.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::transcript::{EditorNotice, MediaRef, TranscriptProvider};
use crate::core::{
    content::{
        AssignmentData, ContentData, ContentItem, ContentType, FieldError, QuizData, TextData,
        TranscriptData, Validate, ValidationErrors, VideoData,
    },
    ContentItemId, CoreError, CoreResult, LessonId,
};

/// Whether the dialog creates a new item or edits an existing one
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { item_id: ContentItemId },
}

/// Modal editor for a single content item
#[derive(Clone, Debug)]
pub struct EditorDialog {
    mode: EditorMode,
    lesson_id: LessonId,
    title: String,
    order: u32,
    draft: ContentData,
}

impl EditorDialog {
    /// Opens an editor for a new item of `content_type`
    pub fn create(lesson_id: &str, content_type: ContentType) -> Self {
        Self {
            mode: EditorMode::Create,
            lesson_id: lesson_id.to_string(),
            title: String::new(),
            order: 0,
            draft: content_type.default_data(),
        }
    }

    /// Opens an editor seeded from an existing item
    pub fn edit(lesson_id: &str, item: &ContentItem) -> Self {
        Self {
            mode: EditorMode::Edit {
                item_id: item.id.clone(),
            },
            lesson_id: lesson_id.to_string(),
            title: item.title.clone(),
            order: item.order,
            draft: item.data().clone(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn draft(&self) -> &ContentData {
        &self.draft
    }

    pub fn content_type(&self) -> ContentType {
        self.draft.content_type()
    }

    pub fn is_create(&self) -> bool {
        self.mode == EditorMode::Create
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Replaces the whole draft payload; the type must not change
    pub fn edit_data(&mut self, data: ContentData) -> CoreResult<()> {
        if data.content_type() != self.content_type() {
            return Err(CoreError::ContentTypeMismatch {
                expected: self.content_type(),
                actual: data.content_type(),
            });
        }
        self.draft = data;
        Ok(())
    }

    /// Selects a type tab.
    ///
    /// In create mode the draft is reset to the new type's defaults. In edit
    /// mode the type is fixed and any other type is rejected.
    pub fn switch_type(&mut self, content_type: ContentType) -> CoreResult<()> {
        if content_type == self.content_type() {
            return Ok(());
        }
        if !self.is_create() {
            return Err(CoreError::ContentTypeMismatch {
                expected: self.content_type(),
                actual: content_type,
            });
        }
        debug!(
            "Editor switching draft from {} to {}",
            self.content_type(),
            content_type
        );
        self.draft = content_type.default_data();
        Ok(())
    }

    // =========================================================================
    // Typed Draft Access
    // =========================================================================

    pub fn video_mut(&mut self) -> Option<&mut VideoData> {
        match &mut self.draft {
            ContentData::Video(data) => Some(data),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.draft {
            ContentData::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizData> {
        match &mut self.draft {
            ContentData::Quiz(data) => Some(data),
            _ => None,
        }
    }

    pub fn assignment_mut(&mut self) -> Option<&mut AssignmentData> {
        match &mut self.draft {
            ContentData::Assignment(data) => Some(data),
            _ => None,
        }
    }

    pub fn transcript_mut(&mut self) -> Option<&mut TranscriptData> {
        match &mut self.draft {
            ContentData::Transcript(data) => Some(data),
            _ => None,
        }
    }

    // =========================================================================
    // Save
    // =========================================================================

    pub fn validate(&self) -> Vec<FieldError> {
        self.draft.validate()
    }

    /// Packages the draft into an item.
    ///
    /// New items get a fresh id; edited items keep their id and order. Field
    /// errors are returned instead of an item and the draft stays as it is.
    pub fn save(&self) -> Result<ContentItem, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            debug!("Editor save blocked by {} field error(s)", errors.len());
            return Err(ValidationErrors(errors));
        }

        Ok(match &self.mode {
            EditorMode::Create => ContentItem::with_data(&self.title, self.draft.clone()),
            EditorMode::Edit { item_id } => {
                ContentItem::from_parts(item_id.clone(), &self.title, self.order, self.draft.clone())
            }
        })
    }

    // =========================================================================
    // Transcript Import
    // =========================================================================

    /// Asks the provider for a transcript and fills the draft's transcript
    /// fields.
    ///
    /// On any failure the draft is left untouched and a notice for the user is
    /// returned.
    pub async fn import_transcript(
        &mut self,
        provider: &dyn TranscriptProvider,
        media: &MediaRef,
        timeout: Duration,
    ) -> Result<(), EditorNotice> {
        let content_type = self.content_type();
        if !matches!(content_type, ContentType::Video | ContentType::Transcript) {
            return Err(EditorNotice::transcript_not_supported(content_type.as_str()));
        }

        let outcome = match tokio::time::timeout(timeout, provider.transcribe(media)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout(format!(
                "{} did not answer within {:?}",
                provider.name(),
                timeout
            ))),
        };

        let result = match outcome {
            Ok(result) if !result.is_empty() => result,
            Ok(_) => {
                let err = CoreError::TranscriptUnavailable("empty transcript".to_string());
                warn!("Transcript import from {} failed: {}", provider.name(), err);
                return Err(EditorNotice::transcript_failed(&err));
            }
            Err(err) => {
                warn!("Transcript import from {} failed: {}", provider.name(), err);
                return Err(EditorNotice::transcript_failed(&err));
            }
        };

        let text = result.text();
        match &mut self.draft {
            ContentData::Video(video) => {
                video.has_transcript = true;
                video.transcript_content = Some(text);
            }
            ContentData::Transcript(transcript) => {
                transcript.content = text;
                transcript.timestamps = result.timestamps();
                if transcript.video_id.is_empty() {
                    if let Some(video_id) = &media.video_id {
                        transcript.video_id = video_id.clone();
                    }
                }
            }
            _ => {}
        }
        info!("Imported transcript from {} for {}", provider.name(), media.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{QuizQuestion, SubmissionType};
    use crate::core::editor::transcript::{TranscriptResult, TranscriptSegment};
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl TranscriptProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn transcribe(&self, _media: &MediaRef) -> CoreResult<TranscriptResult> {
            Err(CoreError::TranscriptUnavailable("no audio track".into()))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl TranscriptProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn transcribe(&self, _media: &MediaRef) -> CoreResult<TranscriptResult> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(TranscriptResult::Plain("late".into()))
        }
    }

    struct SegmentProvider;

    #[async_trait]
    impl TranscriptProvider for SegmentProvider {
        fn name(&self) -> &str {
            "segments"
        }

        async fn transcribe(&self, _media: &MediaRef) -> CoreResult<TranscriptResult> {
            Ok(TranscriptResult::Segments(vec![
                TranscriptSegment {
                    start_time: 0.0,
                    end_time: 2.0,
                    text: "Welcome".into(),
                },
                TranscriptSegment {
                    start_time: 2.0,
                    end_time: 5.0,
                    text: "to the course".into(),
                },
            ]))
        }
    }

    fn media() -> MediaRef {
        MediaRef::new("https://cdn.example.com/intro.mp4").with_video_id("vid-1")
    }

    #[test]
    fn test_create_seeds_defaults() {
        let dialog = EditorDialog::create("lesson-1", ContentType::Quiz);
        match dialog.draft() {
            ContentData::Quiz(quiz) => {
                assert_eq!(quiz.passing_score, 70);
                assert!(quiz.allow_retakes);
            }
            other => panic!("unexpected draft: {:?}", other),
        }
        assert!(dialog.is_create());
    }

    #[test]
    fn test_quiz_passing_score_blocks_save() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Quiz);
        dialog.quiz_mut().unwrap().passing_score = 150;

        let errors = dialog.save().unwrap_err();
        assert!(errors.has_field("passingScore"));
        assert_eq!(dialog.quiz_mut().unwrap().passing_score, 150);
    }

    #[test]
    fn test_assignment_needs_file_types_for_file_submissions() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Assignment);
        {
            let assignment = dialog.assignment_mut().unwrap();
            assignment.description = "Upload your work".into();
            assignment.allowed_file_types.clear();
        }
        assert!(dialog.save().unwrap_err().has_field("allowedFileTypes"));

        dialog.assignment_mut().unwrap().submission_type = SubmissionType::Text;
        assert!(dialog.save().is_ok());
    }

    #[test]
    fn test_create_save_assigns_fresh_id() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Text);
        dialog.set_title("Notes");
        dialog.text_mut().unwrap().content = "<p>Hello</p>".into();

        let first = dialog.save().unwrap();
        let second = dialog.save().unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.title, "Notes");
    }

    #[test]
    fn test_edit_save_keeps_id_and_order() {
        let mut item = ContentItem::new(ContentType::Quiz, "Quiz").at_order(3);
        item.replace_data(ContentData::Quiz(QuizData {
            questions: vec![QuizQuestion::true_false("Rust is memory safe", true)],
            ..QuizData::default()
        }))
        .unwrap();

        let mut dialog = EditorDialog::edit("lesson-1", &item);
        dialog.set_title("Final Quiz");
        let saved = dialog.save().unwrap();

        assert_eq!(saved.id, item.id);
        assert_eq!(saved.order, 3);
        assert_eq!(saved.title, "Final Quiz");
    }

    #[test]
    fn test_switch_type() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Video);
        dialog.switch_type(ContentType::Assignment).unwrap();
        assert_eq!(dialog.content_type(), ContentType::Assignment);

        let item = ContentItem::new(ContentType::Video, "Clip");
        let mut editing = EditorDialog::edit("lesson-1", &item);
        assert!(matches!(
            editing.switch_type(ContentType::Text),
            Err(CoreError::ContentTypeMismatch { .. })
        ));
        assert!(editing.switch_type(ContentType::Video).is_ok());
        assert!(editing
            .edit_data(ContentType::Text.default_data())
            .is_err());
    }

    #[tokio::test]
    async fn test_import_transcript_into_video() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Video);
        dialog
            .import_transcript(&SegmentProvider, &media(), Duration::from_secs(1))
            .await
            .unwrap();

        let video = dialog.video_mut().unwrap();
        assert!(video.has_transcript);
        assert_eq!(video.transcript_content.as_deref(), Some("Welcome to the course"));
    }

    #[tokio::test]
    async fn test_import_transcript_into_transcript_item() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Transcript);
        dialog
            .import_transcript(&SegmentProvider, &media(), Duration::from_secs(1))
            .await
            .unwrap();

        let transcript = dialog.transcript_mut().unwrap();
        assert_eq!(transcript.video_id, "vid-1");
        assert_eq!(transcript.timestamps.len(), 2);
        assert_eq!(transcript.timestamps[1].time, 2.0);
    }

    #[tokio::test]
    async fn test_failed_import_leaves_draft_untouched() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Video);
        let before = dialog.draft().clone();

        let notice = dialog
            .import_transcript(&FailingProvider, &media(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(notice.message.contains("try a different video"));
        assert!(notice.detail.contains("no audio track"));
        assert_eq!(dialog.draft(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_import_times_out() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Video);
        let notice = dialog
            .import_transcript(&SlowProvider, &media(), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(notice.detail.contains("Timeout"));
        assert!(!dialog.video_mut().unwrap().has_transcript);
    }

    #[tokio::test]
    async fn test_import_rejected_for_quiz() {
        let mut dialog = EditorDialog::create("lesson-1", ContentType::Quiz);
        let notice = dialog
            .import_transcript(&SegmentProvider, &media(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(notice.detail.contains("quiz"));
    }
}
