//! End-to-end flows through the public wizard API

use std::sync::Arc;

use building_wizard::content::{
    ContentProvider, ContentValidator, DirectoryContentProvider, StaticContentProvider,
    StepContent,
};
use building_wizard::storage::{FileStorage, FormStorage, MemoryStorage, FORM_DATA_KEY};
use building_wizard::wizard::{
    ContentState, FieldValue, FormStatus, StepCatalog, Transition, WizardPointer, WizardSession,
    WizardState,
};
use tempfile::TempDir;

const TWO_STEP_CATALOG: &str = r"
steps:
  - name: First
    sub_steps:
      - {name: a, component: first/a, title: A}
      - {name: b, component: first/b, title: B}
      - {name: c, component: first/c, title: C}
  - name: Second
    sub_steps:
      - {name: d, component: second/d, title: D}
";

fn two_step_provider() -> StaticContentProvider {
    ["first/a", "first/b", "first/c", "second/d"]
        .into_iter()
        .fold(StaticContentProvider::new(), |provider, component| {
            provider.with(StepContent::from_yaml(component, "fields: []\n").unwrap())
        })
}

fn building_session(storage: Arc<dyn FormStorage>) -> WizardSession {
    WizardSession::new(Arc::new(StepCatalog::building().unwrap()), storage)
}

/// Fill every required field of the current sub-step with something valid
fn fill_required(session: &mut WizardSession) {
    let required = session.current_sub_step().unwrap().required_fields.clone();
    for name in required {
        assert!(session.set_field(&name, FieldValue::text("1")), "field {name} not rendered");
    }
}

// ─── Navigation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_advancing_through_building_catalog_completes() {
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(MemoryStorage::new()));
    session.load_current(&provider).await;

    let total = session.catalog().total_sub_steps();
    assert_eq!(total, 10);

    for i in 0..total {
        assert_eq!(session.state(), WizardState::InProgress(session.pointer()));
        let transition = session.advance().await.unwrap();
        if i + 1 < total {
            assert!(matches!(transition, Transition::Moved(_)));
            assert!(session.load_current(&provider).await);
        } else {
            assert_eq!(transition, Transition::Completed);
        }
    }

    assert_eq!(session.state(), WizardState::Completed);
    assert_eq!(session.progress(), 100);
    assert_eq!(session.form_data().len(), 10);
}

#[tokio::test]
async fn test_two_step_catalog_progress() {
    let provider = two_step_provider();
    let catalog = Arc::new(StepCatalog::from_yaml(TWO_STEP_CATALOG).unwrap());
    let mut session = WizardSession::new(catalog, Arc::new(MemoryStorage::new()));
    session.load_current(&provider).await;

    for _ in 0..3 {
        session.advance().await.unwrap();
        session.load_current(&provider).await;
    }

    assert_eq!(session.pointer(), WizardPointer::new(2, 1));
    assert_eq!(session.progress(), 75);
    assert!(session.sub_step_progress().is_none());
}

#[tokio::test]
async fn test_jump_then_first_step_returns_to_start() {
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(MemoryStorage::new()));
    session.load_current(&provider).await;

    session.go_to_sub_step(2, 3).await.unwrap();
    assert_eq!(session.pointer(), WizardPointer::new(2, 3));
    session.load_current(&provider).await;

    session.go_to_step(1).await.unwrap();
    assert_eq!(session.pointer(), WizardPointer::START);
}

#[tokio::test]
async fn test_retreat_at_start_is_noop() {
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(MemoryStorage::new()));
    session.load_current(&provider).await;

    assert_eq!(session.retreat().await.unwrap(), Transition::Unchanged);
    assert_eq!(session.pointer(), WizardPointer::START);
}

// ─── Validation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_component_rules_drive_continue() {
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(MemoryStorage::new()));
    session.go_to_sub_step(1, 2).await.unwrap();
    session.load_current(&provider).await;

    fill_required(&mut session);
    assert!(session.can_continue());

    // The component knows total-floors has an upper bound the catalog does not
    let content = match session.content() {
        ContentState::Ready(content) => content.clone(),
        other => panic!("content not ready: {other:?}"),
    };
    let validator = ContentValidator::new(&content).unwrap();
    session.set_field("total-floors", FieldValue::text("1000"));
    let verdict = validator.report(
        &session.reporter(),
        session.current_key(),
        session.live_fields(),
    );
    assert_eq!(verdict.issue_for("total-floors"), Some("Must be at most 300"));

    session.drain_reports().await.unwrap();
    assert!(!session.can_continue());
}

#[tokio::test]
async fn test_report_from_another_task() {
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(MemoryStorage::new()));
    session.load_current(&provider).await;

    let reporter = session.reporter();
    let key = session.current_key();
    tokio::spawn(async move {
        reporter.report(FormStatus {
            is_valid: true,
            data: None,
            step_key: Some(key),
        });
    })
    .await
    .unwrap();

    assert_eq!(session.drain_reports().await.unwrap(), 1);
    assert!(session.is_current_step_valid());
}

// ─── Persistence ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_file_storage_survives_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let provider = StaticContentProvider::building().unwrap();

    {
        let mut session = building_session(Arc::new(FileStorage::new(temp_dir.path())));
        session.load_current(&provider).await;
        session.set_field("building-name", FieldValue::text("Riverside"));
        session.set_field("country", FieldValue::text("Denmark"));
        session.save().await.unwrap();
    }

    let path = temp_dir.path().join(format!("{FORM_DATA_KEY}.json"));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"step-1-1\""));

    let mut session = building_session(Arc::new(FileStorage::new(temp_dir.path())));
    session.load_current(&provider).await;
    assert_eq!(
        session.field("building-name"),
        Some(&FieldValue::text("Riverside"))
    );
    assert_eq!(session.field("country"), Some(&FieldValue::text("Denmark")));
    assert_eq!(session.field("address"), Some(&FieldValue::text("")));
}

#[tokio::test]
async fn test_custom_storage_key() {
    let temp_dir = TempDir::new().unwrap();
    let provider = StaticContentProvider::building().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path()));

    let mut session = building_session(storage.clone()).with_storage_key("second-building");
    session.load_current(&provider).await;
    session.set_field("building-name", FieldValue::text("Annex"));
    session.save().await.unwrap();

    assert!(storage.get("second-building").await.unwrap().is_some());
    assert!(storage.get(FORM_DATA_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_file_restores_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(format!("{FORM_DATA_KEY}.json")),
        "{ not json",
    )
    .unwrap();

    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(FileStorage::new(temp_dir.path())));
    session.load_current(&provider).await;

    assert!(session.form_data().is_empty());
    assert_eq!(session.field("building-name"), Some(&FieldValue::text("")));
}

#[tokio::test]
async fn test_reset_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let provider = StaticContentProvider::building().unwrap();
    let mut session = building_session(Arc::new(FileStorage::new(temp_dir.path())));
    session.load_current(&provider).await;
    fill_required(&mut session);
    session.save().await.unwrap();

    let path = temp_dir.path().join(format!("{FORM_DATA_KEY}.json"));
    assert!(path.exists());

    let ticket = session.reset().await.unwrap();
    assert_eq!(ticket.pointer, WizardPointer::START);
    assert!(!path.exists());
    assert!(session.form_data().is_empty());
}

// ─── Content sources ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_directory_provider_feeds_session() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("first");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("a.yaml"),
        "heading: From disk\nfields:\n  - {name: label, label: Label, required: true}\n",
    )
    .unwrap();

    let provider = DirectoryContentProvider::new(temp_dir.path());
    assert_eq!(provider.name(), "directory");

    let catalog = Arc::new(StepCatalog::from_yaml(TWO_STEP_CATALOG).unwrap());
    let mut session = WizardSession::new(catalog, Arc::new(MemoryStorage::new()));
    assert!(session.load_current(&provider).await);
    assert_eq!(session.field("label"), Some(&FieldValue::text("")));

    // Next component is missing on disk
    session.skip().await.unwrap();
    session.load_current(&provider).await;
    assert!(matches!(
        session.content(),
        ContentState::Failed { .. }
    ));
}
