//! CourseCraft Core Library
//!
//! Lesson content authoring and live preview engine of the CourseCraft course
//! builder. This library contains the content model, course outline, theme
//! catalog, content editor, command system and the live preview.
//!
//! [`AuthoringSession`] is the entry point: it owns one course being edited
//! and keeps the preview in step with every change it makes.

pub mod core;

use std::time::Duration;

use tracing::{debug, info};

use crate::core::{
    commands::{
        AddContentItemsCommand, AddLessonCommand, AddSectionCommand, ApplyThemeCommand, Command,
        CommandExecutor, CommandResult, DeleteContentItemCommand, DeleteLessonCommand,
        DeleteSectionCommand, ReorderContentItemsCommand, UpdateContentItemCommand,
        UpdateLessonCommand, UpdateSectionCommand,
    },
    content::{ContentItem, ContentType, ValidationErrors},
    course::{CourseOutline, CourseState, LessonField, SectionField},
    editor::{EditorDialog, EditorMode, EditorNotice, MediaRef, TranscriptProvider},
    preview::{FloatingPreview, LessonSnapshot, PreviewDataPatch, PreviewDocument, PreviewStore, Viewport},
    reorder::{keyboard_move, Direction, DragReorder},
    settings::AuthoringSettings,
    store::CourseSink,
    theme::find_theme,
    CoreError, CoreResult, LessonId, SectionId,
};

// =============================================================================
// Editor Save Outcome
// =============================================================================

/// Result of saving the open editor
#[derive(Debug)]
pub enum EditorSave {
    /// The item was written through a command and the editor closed
    Saved(CommandResult),
    /// Field errors blocked the save; the editor stays open with its draft
    Invalid(ValidationErrors),
}

struct OpenEditor {
    dialog: EditorDialog,
    /// Preview visibility when the dialog opened
    preview_was_open: bool,
}

// =============================================================================
// Authoring Session
// =============================================================================

/// One course-builder editing session
pub struct AuthoringSession {
    state: CourseState,
    executor: CommandExecutor,
    preview: PreviewStore,
    surface: FloatingPreview,
    drag: DragReorder,
    editor: Option<OpenEditor>,
    settings: AuthoringSettings,
}

impl AuthoringSession {
    /// Starts a session on an empty course
    pub fn new(title: &str, settings: AuthoringSettings) -> Self {
        Self::with_state(CourseState::new(title), settings)
    }

    /// Starts a session on a loaded course
    pub fn with_state(state: CourseState, mut settings: AuthoringSettings) -> Self {
        settings.normalize();
        let viewport = Viewport::new(
            settings.preview.viewport_width,
            settings.preview.viewport_height,
        );
        Self {
            state,
            executor: CommandExecutor::new().with_max_history(settings.history.max_undo),
            preview: PreviewStore::new(&settings.preview),
            surface: FloatingPreview::new(viewport),
            drag: DragReorder::new(),
            editor: None,
            settings,
        }
    }

    pub fn state(&self) -> &CourseState {
        &self.state
    }

    pub fn outline(&self) -> &CourseOutline {
        &self.state.outline
    }

    pub fn settings(&self) -> &AuthoringSettings {
        &self.settings
    }

    pub fn preview(&self) -> &PreviewStore {
        &self.preview
    }

    /// Geometry and visibility controls of the preview
    pub fn preview_mut(&mut self) -> &mut PreviewStore {
        &mut self.preview
    }

    pub fn surface(&self) -> &FloatingPreview {
        &self.surface
    }

    /// The surface together with the store it writes positions to
    pub fn surface_and_preview(&mut self) -> (&mut FloatingPreview, &mut PreviewStore) {
        (&mut self.surface, &mut self.preview)
    }

    pub fn can_undo(&self) -> bool {
        self.executor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.executor.can_redo()
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    /// Runs a command and refreshes the preview in the same call
    pub fn execute(&mut self, command: Box<dyn Command>) -> CoreResult<CommandResult> {
        let result = self.executor.execute(command, &mut self.state)?;
        if !result.is_noop() {
            self.sync_preview();
        }
        Ok(result)
    }

    pub fn undo(&mut self) -> CoreResult<()> {
        self.executor.undo(&mut self.state)?;
        self.sync_preview();
        Ok(())
    }

    pub fn redo(&mut self) -> CoreResult<CommandResult> {
        let result = self.executor.redo(&mut self.state)?;
        self.sync_preview();
        Ok(result)
    }

    /// Re-derives the snapshot when the previewed lesson differs from it
    fn sync_preview(&mut self) {
        let Some(current_id) = self.preview.current_lesson_id().map(str::to_string) else {
            return;
        };
        match self.state.outline.lesson(&current_id) {
            Some(lesson) => {
                let unchanged = self
                    .preview
                    .snapshot()
                    .is_some_and(|snapshot| *snapshot == LessonSnapshot::of(lesson));
                if !unchanged {
                    self.preview
                        .update_preview_data(PreviewDataPatch::from_lesson(lesson));
                }
            }
            None => {
                debug!("Previewed lesson {} is gone, clearing preview", current_id);
                self.preview.clear_current_lesson();
            }
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn add_section(&mut self, title: &str) -> CoreResult<SectionId> {
        let result = self.execute(Box::new(AddSectionCommand::new(title)))?;
        result
            .created_ids
            .first()
            .cloned()
            .ok_or_else(|| CoreError::Internal("AddSection created no section".into()))
    }

    pub fn update_section(&mut self, section_id: &str, field: SectionField) -> CoreResult<CommandResult> {
        self.execute(Box::new(UpdateSectionCommand::new(section_id, field)))
    }

    pub fn delete_section(&mut self, section_id: &str) -> CoreResult<CommandResult> {
        self.execute(Box::new(DeleteSectionCommand::new(section_id)))
    }

    /// Returns `None` when the section no longer exists
    pub fn add_lesson(&mut self, section_id: &str, title: &str) -> CoreResult<Option<LessonId>> {
        let result = self.execute(Box::new(AddLessonCommand::new(section_id, title)))?;
        Ok(result.created_ids.first().cloned())
    }

    /// Fields the preview does not show skip the snapshot refresh
    pub fn update_lesson(&mut self, lesson_id: &str, field: LessonField) -> CoreResult<CommandResult> {
        let refresh = field.affects_preview();
        let command = Box::new(UpdateLessonCommand::new(lesson_id, field));
        if refresh {
            self.execute(command)
        } else {
            self.executor.execute(command, &mut self.state)
        }
    }

    pub fn delete_lesson(&mut self, lesson_id: &str) -> CoreResult<CommandResult> {
        self.execute(Box::new(DeleteLessonCommand::new(lesson_id)))
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn add_content_items(
        &mut self,
        lesson_id: &str,
        items: Vec<ContentItem>,
    ) -> CoreResult<CommandResult> {
        self.execute(Box::new(AddContentItemsCommand::new(lesson_id, items)))
    }

    pub fn update_content_item(&mut self, lesson_id: &str, item: ContentItem) -> CoreResult<CommandResult> {
        self.execute(Box::new(UpdateContentItemCommand::new(lesson_id, item)))
    }

    pub fn delete_content_item(&mut self, lesson_id: &str, item_id: &str) -> CoreResult<CommandResult> {
        self.execute(Box::new(DeleteContentItemCommand::new(lesson_id, item_id)))
    }

    pub fn reorder_content_items(
        &mut self,
        lesson_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> CoreResult<CommandResult> {
        self.execute(Box::new(ReorderContentItemsCommand::new(
            lesson_id, from_index, to_index,
        )))
    }

    /// Moves an item one slot up or down
    pub fn move_item(
        &mut self,
        lesson_id: &str,
        item_id: &str,
        direction: Direction,
    ) -> CoreResult<CommandResult> {
        let reorder = self
            .state
            .outline
            .lesson(lesson_id)
            .and_then(|lesson| keyboard_move(&lesson.content_items, item_id, direction));
        match reorder {
            Some(reorder) => self.execute(Box::new(ReorderContentItemsCommand::from_move(
                lesson_id, reorder,
            ))),
            None => Ok(CommandResult::noop()),
        }
    }

    pub fn begin_drag(&mut self, item_id: &str) {
        self.drag.begin(item_id);
    }

    /// Drops the dragged item over `over_id`, or outside any item
    pub fn drop_on(&mut self, lesson_id: &str, over_id: Option<&str>) -> CoreResult<CommandResult> {
        let items = self
            .state
            .outline
            .lesson(lesson_id)
            .map(|l| l.content_items.as_slice())
            .unwrap_or(&[]);
        match self.drag.drop_on(items, over_id) {
            Some(reorder) => self.execute(Box::new(ReorderContentItemsCommand::from_move(
                lesson_id, reorder,
            ))),
            None => Ok(CommandResult::noop()),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // =========================================================================
    // Themes & Preview
    // =========================================================================

    /// Appends a theme's default content and shows the lesson in the preview.
    ///
    /// A lesson that no longer exists makes this a no-op.
    pub fn apply_theme(&mut self, lesson_id: &str, theme_id: &str) -> CoreResult<CommandResult> {
        let result = self.execute(Box::new(ApplyThemeCommand::new(lesson_id, theme_id)))?;
        if result.is_noop() {
            return Ok(result);
        }

        self.preview.set_selected_theme(find_theme(theme_id));
        if let Some(lesson) = self.state.outline.lesson(lesson_id) {
            self.preview.set_current_lesson(lesson);
        }
        if self.settings.preview.open_on_theme_apply {
            self.preview.open();
        }
        info!("Applied theme {} to lesson {}", theme_id, lesson_id);
        Ok(result)
    }

    /// Makes a lesson the previewed one; false if it does not exist
    pub fn select_lesson(&mut self, lesson_id: &str) -> bool {
        match self.state.outline.lesson(lesson_id) {
            Some(lesson) => {
                self.preview.set_current_lesson(lesson);
                true
            }
            None => false,
        }
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview.toggle_preview()
    }

    /// Renders the previewed lesson
    pub fn render_preview(&self) -> Option<PreviewDocument> {
        self.preview.render()
    }

    // =========================================================================
    // Content Editor
    // =========================================================================

    pub fn editor(&self) -> Option<&EditorDialog> {
        self.editor.as_ref().map(|e| &e.dialog)
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorDialog> {
        self.editor.as_mut().map(|e| &mut e.dialog)
    }

    /// Opens the editor for a new item; false if the lesson does not exist
    pub fn open_new_item_editor(&mut self, lesson_id: &str, content_type: ContentType) -> bool {
        if self.state.outline.lesson(lesson_id).is_none() {
            return false;
        }
        self.open_dialog(EditorDialog::create(lesson_id, content_type));
        true
    }

    /// Opens the editor on an existing item; false if it does not exist
    pub fn open_item_editor(&mut self, lesson_id: &str, item_id: &str) -> bool {
        let Some(item) = self
            .state
            .outline
            .lesson(lesson_id)
            .and_then(|l| l.item(item_id))
        else {
            return false;
        };
        let dialog = EditorDialog::edit(lesson_id, item);
        self.open_dialog(dialog);
        true
    }

    fn open_dialog(&mut self, dialog: EditorDialog) {
        let preview_was_open = match self.editor.take() {
            Some(previous) => {
                debug!("Discarding open editor draft for a new dialog");
                previous.preview_was_open
            }
            None => self.preview.is_open(),
        };
        self.preview.close();
        self.editor = Some(OpenEditor {
            dialog,
            preview_was_open,
        });
    }

    fn close_dialog(&mut self) {
        if let Some(open) = self.editor.take() {
            if open.preview_was_open && self.settings.preview.reopen_after_edit {
                self.preview.open();
            }
        }
    }

    /// Validates and writes the draft, closing the editor on success
    pub fn save_editor(&mut self) -> CoreResult<EditorSave> {
        let Some(open) = &self.editor else {
            return Err(CoreError::CommandExecutionFailed(
                "No editor is open".to_string(),
            ));
        };

        let item = match open.dialog.save() {
            Ok(item) => item,
            Err(errors) => return Ok(EditorSave::Invalid(errors)),
        };
        let lesson_id = open.dialog.lesson_id().to_string();
        let command: Box<dyn Command> = match open.dialog.mode() {
            EditorMode::Create => Box::new(AddContentItemsCommand::new(&lesson_id, vec![item])),
            EditorMode::Edit { .. } => Box::new(UpdateContentItemCommand::new(&lesson_id, item)),
        };

        let result = self.execute(command)?;
        self.close_dialog();
        Ok(EditorSave::Saved(result))
    }

    /// Closes the editor and discards its draft
    pub fn cancel_editor(&mut self) {
        self.close_dialog();
    }

    /// Fills the open draft's transcript from a provider
    pub async fn import_transcript(
        &mut self,
        provider: &dyn TranscriptProvider,
        media: &MediaRef,
    ) -> Result<(), EditorNotice> {
        let timeout = Duration::from_secs(self.settings.editor.transcript_timeout_secs);
        match self.editor.as_mut() {
            Some(open) => open.dialog.import_transcript(provider, media, timeout).await,
            None => Err(EditorNotice::no_editor()),
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Hands the whole course to the sink as a draft
    pub fn save_draft(&mut self, sink: &dyn CourseSink) -> CoreResult<()> {
        sink.save_draft(&self.state.meta, self.state.sections())?;
        self.state.mark_saved();
        Ok(())
    }

    /// Publishes the course once every content item validates
    pub fn publish(&mut self, sink: &dyn CourseSink) -> CoreResult<()> {
        let issues = self.state.outline.content_issues();
        if let Some(first) = issues.first() {
            return Err(CoreError::ValidationError(format!(
                "{} content issue(s), first: {}",
                issues.len(),
                first
            )));
        }
        sink.publish(&self.state.meta, self.state.sections())
    }
}
