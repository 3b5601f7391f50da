//! Authoring Scenarios
//!
//! End-to-end flows across themes, commands, reordering and the preview,
//! driven through [`AuthoringSession`].

use crate::core::{
    content::{ContentData, ContentItem, ContentType},
    reorder::Direction,
    settings::AuthoringSettings,
    CoreError,
};
use crate::AuthoringSession;

fn session_with_lesson() -> (AuthoringSession, String) {
    let mut session = AuthoringSession::new("Scenario Course", AuthoringSettings::default());
    let section_id = session.add_section("Module 1").unwrap();
    let lesson_id = session
        .add_lesson(&section_id, "First lesson")
        .unwrap()
        .unwrap();
    (session, lesson_id)
}

fn item_ids(session: &AuthoringSession, lesson_id: &str) -> Vec<String> {
    session
        .outline()
        .lesson(lesson_id)
        .unwrap()
        .content_items
        .iter()
        .map(|i| i.id.clone())
        .collect()
}

fn item_types(session: &AuthoringSession, lesson_id: &str) -> Vec<ContentType> {
    session
        .outline()
        .lesson(lesson_id)
        .unwrap()
        .content_items
        .iter()
        .map(|i| i.content_type())
        .collect()
}

#[test]
fn test_theme_reorder_delete_flow() {
    let (mut session, lesson_id) = session_with_lesson();

    session.apply_theme(&lesson_id, "complete-lesson").unwrap();
    assert_eq!(
        item_types(&session, &lesson_id),
        vec![ContentType::Video, ContentType::Text, ContentType::Quiz]
    );
    let quiz = session.outline().lesson(&lesson_id).unwrap().content_items[2].clone();
    match quiz.data() {
        ContentData::Quiz(data) => {
            assert_eq!(data.passing_score, 70);
            assert!(data.allow_retakes);
        }
        other => panic!("expected quiz payload, got {:?}", other),
    }

    session.reorder_content_items(&lesson_id, 0, 2).unwrap();
    assert_eq!(
        item_types(&session, &lesson_id),
        vec![ContentType::Text, ContentType::Quiz, ContentType::Video]
    );

    let ids = item_ids(&session, &lesson_id);
    session.delete_content_item(&lesson_id, &ids[1]).unwrap();
    let types = item_types(&session, &lesson_id);
    assert_eq!(types.len(), 2);
    assert!(!types.contains(&ContentType::Quiz));

    let snapshot = session.preview().snapshot().unwrap();
    assert_eq!(snapshot.content.len(), 2);
    let orders: Vec<u32> = snapshot.content.iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn test_preview_grows_with_each_theme_application() {
    let (mut session, lesson_id) = session_with_lesson();

    session.apply_theme(&lesson_id, "video-lecture").unwrap();
    assert_eq!(session.preview().snapshot().unwrap().content.len(), 2);

    session.apply_theme(&lesson_id, "complete-lesson").unwrap();
    assert_eq!(session.preview().snapshot().unwrap().content.len(), 5);
}

#[test]
fn test_applying_theme_twice_yields_disjoint_ids() {
    let (mut session, lesson_id) = session_with_lesson();

    let first = session.apply_theme(&lesson_id, "knowledge-check").unwrap();
    let second = session.apply_theme(&lesson_id, "knowledge-check").unwrap();

    assert_eq!(first.created_ids.len(), 2);
    assert_eq!(second.created_ids.len(), 2);
    assert!(first.created_ids.iter().all(|id| !second.created_ids.contains(id)));
    assert_eq!(item_ids(&session, &lesson_id).len(), 4);
}

#[test]
fn test_unknown_theme_changes_nothing() {
    let (mut session, lesson_id) = session_with_lesson();
    let before = session.outline().clone();

    assert!(matches!(
        session.apply_theme(&lesson_id, "no-such-theme"),
        Err(CoreError::ThemeNotFound(_))
    ));
    assert_eq!(session.outline(), &before);
}

#[test]
fn test_stale_update_is_noop() {
    let (mut session, lesson_id) = session_with_lesson();
    session.apply_theme(&lesson_id, "knowledge-check").unwrap();
    let text = session.outline().lesson(&lesson_id).unwrap().content_items[0].clone();

    session.delete_content_item(&lesson_id, &text.id).unwrap();
    let before = session.outline().clone();
    let revision = session.preview().revision();

    let result = session.update_content_item(&lesson_id, text).unwrap();
    assert!(result.is_noop());
    assert_eq!(session.outline(), &before);
    assert_eq!(session.preview().revision(), revision);
}

#[test]
fn test_update_preserves_identity_and_order() {
    let (mut session, lesson_id) = session_with_lesson();
    session.apply_theme(&lesson_id, "complete-lesson").unwrap();
    let ids = item_ids(&session, &lesson_id);

    let mut notes = session.outline().lesson(&lesson_id).unwrap().content_items[1].clone();
    notes.title = "Renamed notes".to_string();
    session.update_content_item(&lesson_id, notes).unwrap();

    assert_eq!(item_ids(&session, &lesson_id), ids);
    let lesson = session.outline().lesson(&lesson_id).unwrap();
    assert_eq!(lesson.content_items[1].title, "Renamed notes");
    assert_eq!(lesson.content_items[1].order, 1);
}

#[test]
fn test_content_type_is_immutable_after_creation() {
    let (mut session, lesson_id) = session_with_lesson();
    session.apply_theme(&lesson_id, "knowledge-check").unwrap();
    let text_id = item_ids(&session, &lesson_id)[0].clone();

    assert!(session.open_item_editor(&lesson_id, &text_id));
    let editor = session.editor_mut().unwrap();
    assert!(matches!(
        editor.switch_type(ContentType::Quiz),
        Err(CoreError::ContentTypeMismatch { .. })
    ));
    assert!(editor.edit_data(ContentType::Quiz.default_data()).is_err());
    assert_eq!(editor.content_type(), ContentType::Text);
}

#[test]
fn test_keyboard_and_pointer_reorders_agree() {
    let (mut keyboard, lesson_id) = session_with_lesson();
    keyboard
        .add_content_items(
            &lesson_id,
            vec![
                ContentItem::new(ContentType::Text, "A"),
                ContentItem::new(ContentType::Text, "B"),
                ContentItem::new(ContentType::Text, "C"),
            ],
        )
        .unwrap();
    let ids = item_ids(&keyboard, &lesson_id);

    keyboard.move_item(&lesson_id, &ids[2], Direction::Up).unwrap();
    let keyboard_order = item_ids(&keyboard, &lesson_id);
    keyboard.undo().unwrap();
    assert_eq!(item_ids(&keyboard, &lesson_id), ids);

    keyboard.begin_drag(&ids[2]);
    keyboard.drop_on(&lesson_id, Some(&ids[1])).unwrap();
    assert_eq!(item_ids(&keyboard, &lesson_id), keyboard_order);
    assert_eq!(keyboard_order, vec![ids[0].clone(), ids[2].clone(), ids[1].clone()]);
}

#[test]
fn test_edge_moves_are_noops() {
    let (mut session, lesson_id) = session_with_lesson();
    session.apply_theme(&lesson_id, "knowledge-check").unwrap();
    let ids = item_ids(&session, &lesson_id);

    assert!(session.move_item(&lesson_id, &ids[0], Direction::Up).unwrap().is_noop());
    assert!(session.move_item(&lesson_id, &ids[1], Direction::Down).unwrap().is_noop());
    assert!(session.reorder_content_items(&lesson_id, 0, 9).unwrap().is_noop());
    assert_eq!(item_ids(&session, &lesson_id), ids);
}

#[test]
fn test_undo_redo_theme_keeps_ids() {
    let (mut session, lesson_id) = session_with_lesson();
    let result = session.apply_theme(&lesson_id, "complete-lesson").unwrap();

    session.undo().unwrap();
    assert!(item_ids(&session, &lesson_id).is_empty());
    assert!(session.preview().snapshot().unwrap().content.is_empty());

    session.redo().unwrap();
    assert_eq!(item_ids(&session, &lesson_id), result.created_ids);
    assert_eq!(session.preview().snapshot().unwrap().content.len(), 3);
}

#[test]
fn test_other_lesson_edits_leave_preview_alone() {
    let (mut session, lesson_id) = session_with_lesson();
    session.apply_theme(&lesson_id, "video-lecture").unwrap();
    let section_id = session.outline().sections[0].id.clone();
    let other = session.add_lesson(&section_id, "Second").unwrap().unwrap();
    let revision = session.preview().revision();

    session.apply_theme(&other, "knowledge-check").unwrap();
    // Applying a theme switches the preview to that lesson
    assert!(session.preview().is_current(&other));
    assert!(session.preview().revision() > revision);

    let revision = session.preview().revision();
    session
        .add_content_items(&lesson_id, vec![ContentItem::new(ContentType::Text, "Aside")])
        .unwrap();
    assert_eq!(session.preview().revision(), revision);
}
