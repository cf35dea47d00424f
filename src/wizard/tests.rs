//! Tests for the wizard session

use super::*;
use crate::content::{ContentError, ContentProvider, StaticContentProvider, StepContent};
use crate::storage::{FormStorage, MemoryStorage};
use std::sync::Arc;

const SMALL_CATALOG: &str = r"
steps:
  - name: Basics
    sub_steps:
      - name: Name
        component: basics/name
        required_fields: [x]
        title: Name
      - name: Notes
        component: basics/notes
        title: Notes
      - name: Flags
        component: basics/flags
        required_fields: [agree]
        title: Flags
  - name: Finish
    sub_steps:
      - name: Summary
        component: finish/summary
        title: Summary
";

fn provider() -> StaticContentProvider {
    StaticContentProvider::new()
        .with(StepContent::from_yaml("basics/name", "fields:\n  - {name: x, label: X, required: true}\n  - {name: y, label: Y}\n").unwrap())
        .with(StepContent::from_yaml("basics/notes", "fields:\n  - {name: notes, label: Notes}\n").unwrap())
        .with(StepContent::from_yaml("basics/flags", "fields:\n  - {name: agree, label: Agree, kind: toggle, required: true}\n").unwrap())
        .with(StepContent::from_yaml("finish/summary", "fields: []\n").unwrap())
}

fn session_with(storage: Arc<MemoryStorage>) -> WizardSession {
    let catalog = Arc::new(StepCatalog::from_yaml(SMALL_CATALOG).unwrap());
    WizardSession::new(catalog, storage)
}

async fn loaded_session() -> (WizardSession, StaticContentProvider, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let provider = provider();
    let mut session = session_with(storage.clone());
    assert!(session.load_current(&provider).await);
    (session, provider, storage)
}

// ─── Navigation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_initial_state() {
    let (session, _, _) = loaded_session().await;
    assert_eq!(session.state(), WizardState::InProgress(WizardPointer::START));
    assert_eq!(session.progress(), 0);
    assert!(!session.can_go_back());
}

#[tokio::test]
async fn test_advance_walks_sub_steps_then_steps() {
    let (mut session, provider, _) = loaded_session().await;

    let expected = [(1, 2), (1, 3), (2, 1)];
    for (step, sub_step) in expected {
        let transition = session.advance().await.unwrap();
        assert!(matches!(transition, Transition::Moved(_)));
        assert_eq!(session.pointer(), WizardPointer::new(step, sub_step));
        assert!(session.load_current(&provider).await);
    }
    assert_eq!(session.progress(), 75);
}

#[tokio::test]
async fn test_advance_from_last_completes() {
    let (mut session, provider, _) = loaded_session().await;

    for _ in 0..3 {
        session.advance().await.unwrap();
        session.load_current(&provider).await;
    }
    assert_eq!(session.advance().await.unwrap(), Transition::Completed);
    assert_eq!(session.state(), WizardState::Completed);
    assert_eq!(session.progress(), 100);
    assert!(!session.actions().visible);
}

#[tokio::test]
async fn test_completed_ignores_navigation() {
    let (mut session, provider, _) = loaded_session().await;
    for _ in 0..3 {
        session.advance().await.unwrap();
        session.load_current(&provider).await;
    }
    session.advance().await.unwrap();

    assert_eq!(session.advance().await.unwrap(), Transition::Ignored);
    assert_eq!(session.retreat().await.unwrap(), Transition::Ignored);
    assert_eq!(session.go_to_step(1).await.unwrap(), Transition::Ignored);
    assert!(session.begin_load().is_none());
    assert_eq!(session.state(), WizardState::Completed);
}

#[tokio::test]
async fn test_retreat_at_start_is_noop() {
    let (mut session, _, _) = loaded_session().await;
    assert_eq!(session.retreat().await.unwrap(), Transition::Unchanged);
    assert_eq!(session.pointer(), WizardPointer::START);
    assert!(matches!(session.content(), ContentState::Ready(_)));
}

#[tokio::test]
async fn test_retreat_crosses_into_previous_step_last_sub_step() {
    let (mut session, provider, _) = loaded_session().await;
    session.go_to_step(2).await.unwrap();
    session.load_current(&provider).await;

    session.retreat().await.unwrap();
    assert_eq!(session.pointer(), WizardPointer::new(1, 3));
    session.load_current(&provider).await;

    session.retreat().await.unwrap();
    assert_eq!(session.pointer(), WizardPointer::new(1, 2));
}

#[tokio::test]
async fn test_jump_then_go_to_first_step() {
    let catalog = StepCatalog::from_yaml(SMALL_CATALOG).unwrap();
    let provider = provider();

    for target in catalog.pointers() {
        let mut session = session_with(Arc::new(MemoryStorage::new()));
        session.load_current(&provider).await;

        session
            .go_to_sub_step(target.step, target.sub_step)
            .await
            .unwrap();
        assert_eq!(session.pointer(), target);
        session.load_current(&provider).await;

        session.go_to_step(1).await.unwrap();
        assert_eq!(session.pointer(), WizardPointer::START);
    }
}

#[tokio::test]
async fn test_jump_out_of_range_is_rejected() {
    let (mut session, _, _) = loaded_session().await;

    assert!(matches!(
        session.go_to_step(3).await,
        Err(WizardError::StepOutOfRange(3))
    ));
    assert!(matches!(
        session.go_to_sub_step(1, 4).await,
        Err(WizardError::SubStepOutOfRange(1, 4))
    ));
    assert!(matches!(
        session.go_to_sub_step(1, 0).await,
        Err(WizardError::SubStepOutOfRange(1, 0))
    ));
    assert_eq!(session.pointer(), WizardPointer::START);
}

// ─── Single-flight Loading ──────────────────────────────────────────────────

#[tokio::test]
async fn test_navigation_ignored_while_loading() {
    let (mut session, _, _) = loaded_session().await;

    let transition = session.advance().await.unwrap();
    assert!(session.is_loading());
    assert!(transition.ticket().is_some());

    assert_eq!(session.advance().await.unwrap(), Transition::Ignored);
    assert_eq!(session.go_to_step(2).await.unwrap(), Transition::Ignored);
    assert_eq!(session.pointer(), WizardPointer::new(1, 2));
    assert!(!session.can_continue());
}

#[tokio::test]
async fn test_stale_load_result_is_discarded() {
    let (mut session, provider, _) = loaded_session().await;

    let first = session.advance().await.unwrap().ticket().cloned().unwrap();
    // Reset supersedes the pending load
    let second = session.reset().await.unwrap();
    assert_ne!(first.generation, second.generation);

    let content = provider.fetch(&first.component).await;
    assert!(!session.finish_load(&first, content).await);
    assert!(session.is_loading());

    let content = provider.fetch(&second.component).await;
    assert!(session.finish_load(&second, content).await);
    match session.content() {
        ContentState::Ready(content) => assert_eq!(content.component, "basics/name"),
        other => panic!("unexpected content state {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_load_offers_retry() {
    let storage = Arc::new(MemoryStorage::new());
    let mut session = session_with(storage);

    let ticket = session.begin_load().unwrap();
    let applied = session
        .finish_load(&ticket, Err(ContentError::NotFound(ticket.component.clone())))
        .await;
    assert!(applied);
    assert!(matches!(session.content(), ContentState::Failed { .. }));
    assert!(!session.can_continue());
    assert!(session.actions().can_skip);

    let retry = session.retry_load().unwrap();
    assert!(retry.generation > ticket.generation);
    assert!(session.finish_load(&retry, provider().fetch(&retry.component).await).await);
    assert!(matches!(session.content(), ContentState::Ready(_)));
    assert!(session.retry_load().is_none());
}

// ─── Validation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fallback_requires_filled_field() {
    let (mut session, _, _) = loaded_session().await;

    assert!(!session.is_current_step_valid());
    assert!(session.set_field("x", FieldValue::text("  ")));
    assert!(!session.is_current_step_valid());
    assert!(session.set_field("x", FieldValue::text("filled")));
    assert!(session.is_current_step_valid());
    assert!(session.can_continue());
}

#[tokio::test]
async fn test_fallback_with_no_required_fields_is_valid() {
    let (mut session, provider, _) = loaded_session().await;
    session.go_to_sub_step(1, 2).await.unwrap();
    session.load_current(&provider).await;

    assert!(session.is_current_step_valid());
    session.set_field("notes", FieldValue::text("anything"));
    assert!(session.is_current_step_valid());
}

#[tokio::test]
async fn test_fallback_toggle_must_be_true() {
    let (mut session, provider, _) = loaded_session().await;
    session.go_to_sub_step(1, 3).await.unwrap();
    session.load_current(&provider).await;

    assert!(!session.is_current_step_valid());
    session.set_field("agree", FieldValue::Flag(true));
    assert!(session.is_current_step_valid());
}

#[tokio::test]
async fn test_external_report_overrides_fallback() {
    let (mut session, _, _) = loaded_session().await;
    session.set_field("x", FieldValue::text("filled"));
    assert!(session.is_current_step_valid());

    session
        .handle_form_status(FormStatus {
            is_valid: false,
            data: None,
            step_key: None,
        })
        .await
        .unwrap();
    assert!(!session.is_current_step_valid());
    assert!(session.validation_record(&StepKey::new(1, 1)).is_some());
}

#[tokio::test]
async fn test_report_cleared_when_sub_step_reloads() {
    let (mut session, provider, _) = loaded_session().await;
    session
        .handle_form_status(FormStatus {
            is_valid: true,
            data: None,
            step_key: None,
        })
        .await
        .unwrap();
    assert!(session.is_current_step_valid());

    session.advance().await.unwrap();
    session.load_current(&provider).await;
    session.retreat().await.unwrap();
    session.load_current(&provider).await;

    assert!(session.validation_record(&StepKey::new(1, 1)).is_none());
    assert!(!session.is_current_step_valid());
}

#[tokio::test]
async fn test_report_with_data_is_merged_and_persisted() {
    let (mut session, _, storage) = loaded_session().await;
    let reporter = session.reporter();

    let mut data = FieldMap::new();
    data.insert("x".into(), FieldValue::text("from component"));
    reporter.report(FormStatus {
        is_valid: true,
        data: Some(data),
        step_key: Some(StepKey::new(1, 1)),
    });

    assert_eq!(session.drain_reports().await.unwrap(), 1);
    assert_eq!(
        session.form_data().get(&StepKey::new(1, 1)).unwrap().get("x"),
        Some(&FieldValue::text("from component"))
    );

    let stored = read_snapshot(storage.as_ref(), crate::storage::FORM_DATA_KEY)
        .await
        .unwrap();
    assert_eq!(&stored, session.form_data());
}

#[tokio::test]
async fn test_report_for_unknown_key_is_ignored() {
    let (mut session, _, _) = loaded_session().await;
    session
        .handle_form_status(FormStatus {
            is_valid: true,
            data: None,
            step_key: Some(StepKey::new(9, 9)),
        })
        .await
        .unwrap();
    assert!(session.validation_record(&StepKey::new(9, 9)).is_none());
}

#[tokio::test]
async fn test_set_field_rejects_unknown_fields() {
    let (mut session, _, _) = loaded_session().await;
    assert!(!session.set_field("nope", FieldValue::text("v")));
    assert!(session.field("nope").is_none());
}

// ─── Persistence ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_data_captured_when_leaving_backwards() {
    let (mut session, provider, _) = loaded_session().await;
    session.advance().await.unwrap();
    session.load_current(&provider).await;

    session.set_field("notes", FieldValue::text("draft"));
    session.retreat().await.unwrap();

    assert_eq!(
        session.form_data().get(&StepKey::new(1, 2)).unwrap().get("notes"),
        Some(&FieldValue::text("draft"))
    );
}

#[tokio::test]
async fn test_save_then_restore_in_fresh_session() {
    let (mut session, provider, storage) = loaded_session().await;
    session.set_field("x", FieldValue::text("Tower A"));
    session.set_field("y", FieldValue::text("North wing"));
    session.save().await.unwrap();

    let mut fresh = session_with(storage);
    assert!(fresh.load_current(&provider).await);

    assert_eq!(fresh.field("x"), Some(&FieldValue::text("Tower A")));
    assert_eq!(fresh.field("y"), Some(&FieldValue::text("North wing")));
    assert!(fresh.is_current_step_valid());
}

#[tokio::test]
async fn test_restore_only_fills_current_sub_step_fields() {
    let (mut session, provider, _) = loaded_session().await;
    session.set_field("x", FieldValue::text("kept"));
    session.advance().await.unwrap();
    session.load_current(&provider).await;

    assert_eq!(session.field("x"), None);
    assert_eq!(session.field("notes"), Some(&FieldValue::text("")));
}

#[tokio::test]
async fn test_malformed_storage_restores_as_empty() {
    let storage = Arc::new(MemoryStorage::with_value(
        crate::storage::FORM_DATA_KEY,
        "{definitely not json",
    ));
    let mut session = session_with(storage);
    assert!(session.load_current(&provider()).await);

    assert!(session.form_data().is_empty());
    assert_eq!(session.field("x"), Some(&FieldValue::text("")));
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let (mut session, provider, storage) = loaded_session().await;
    session.set_field("x", FieldValue::text("Tower A"));
    session.advance().await.unwrap();
    session.load_current(&provider).await;

    let ticket = session.reset().await.unwrap();
    assert_eq!(ticket.pointer, WizardPointer::START);
    assert_eq!(session.pointer(), WizardPointer::START);
    assert!(session.form_data().is_empty());
    assert!(storage
        .get(crate::storage::FORM_DATA_KEY)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_reset_leaves_completed_state() {
    let (mut session, provider, _) = loaded_session().await;
    for _ in 0..4 {
        session.skip().await.unwrap();
        session.load_current(&provider).await;
    }
    assert!(session.is_completed());

    session.reset().await.unwrap();
    assert_eq!(session.state(), WizardState::InProgress(WizardPointer::START));
}


// ─── View Model ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stepper_statuses() {
    let (mut session, provider, _) = loaded_session().await;
    session.go_to_sub_step(1, 2).await.unwrap();
    session.load_current(&provider).await;

    let view = session.stepper();
    let statuses: Vec<_> = view.rows.iter().map(|r| (r.depth, r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (0, StepStatus::Active),
            (1, StepStatus::Completed),
            (1, StepStatus::Active),
            (1, StepStatus::Pending),
            (0, StepStatus::Pending),
        ]
    );
    assert_eq!(view.active_index(), Some(2));
    assert_eq!(view.rows[2].target, JumpTarget::SubStep(1, 2));
}

#[tokio::test]
async fn test_single_sub_step_has_no_sub_rows_or_sub_progress() {
    let (mut session, provider, _) = loaded_session().await;
    assert_eq!(
        session.sub_step_progress(),
        Some(SubStepProgress { current: 1, total: 3 })
    );

    session.go_to_step(2).await.unwrap();
    session.load_current(&provider).await;
    assert_eq!(session.sub_step_progress(), None);
    assert_eq!(session.stepper().rows.last().unwrap().depth, 0);
}

#[tokio::test]
async fn test_continue_label_on_last_sub_step() {
    let (mut session, provider, _) = loaded_session().await;
    assert_eq!(session.actions().continue_label, "Save & continue");

    session.go_to_step(2).await.unwrap();
    session.load_current(&provider).await;
    let actions = session.actions();
    assert_eq!(actions.continue_label, "Complete Setup");
    assert!(actions.can_go_back);
    assert!(actions.can_continue);
}

#[tokio::test]
async fn test_current_step_info() {
    let (session, _, _) = loaded_session().await;
    let info = session.current_step_info().unwrap();
    assert_eq!(info.step_name, "Basics");
    assert_eq!(info.sub_step_name, "Name");
    assert_eq!(info.component, "basics/name");
    assert_eq!(info.required_fields, vec!["x".to_string()]);
}
