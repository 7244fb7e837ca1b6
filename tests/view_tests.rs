//! Tests for ViewController
//!
//! Tests verify:
//! - Mount fetches columns then records
//! - Create/edit form flows and their failure handling
//! - Delete confirmation flow
//! - Invalid transitions leave the state untouched
//! - The in-flight guard rejects overlapping operations
//! - Render snapshots (headers, empty states, form fields)

mod common;

use std::sync::Arc;
use std::time::Duration;

use samplebook::columns::FieldKind;
use samplebook::storage::MemoryBlobStore;
use samplebook::view::{EmptyState, FormMode, Phase, PhaseKind};
use samplebook::{Config, LatencyProfile, Value, ViewController, ViewError};

use common::{drain, flaky_store, ids, memory_store, store_over};

// =============================================================================
// Helper Functions
// =============================================================================

async fn mounted_view() -> ViewController {
    let (store, _blobs, _notifications) = memory_store();
    let view = ViewController::new(store);
    view.mount().await.unwrap();
    view
}

fn slow_write_view(write: Duration) -> ViewController {
    let latency = LatencyProfile {
        write,
        ..LatencyProfile::none()
    };
    let config = Config::builder().latency(latency).build();
    let (store, _notifications) = store_over(config, Arc::new(MemoryBlobStore::new()));
    ViewController::new(store)
}

// =============================================================================
// Mount Tests
// =============================================================================

#[tokio::test]
async fn test_initial_phase_is_loading() {
    let (store, _blobs, _notifications) = memory_store();
    let view = ViewController::new(store);

    assert_eq!(view.phase_kind(), PhaseKind::Loading);
    let snapshot = view.snapshot();
    assert!(snapshot.table.is_none());
    assert!(snapshot.form.is_none());
}

#[tokio::test]
async fn test_mount_loads_columns_and_records() {
    let view = mounted_view().await;

    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(view.schema().columns(), ["id", "name", "description"]);
    assert_eq!(ids(&view.records()), vec![1, 2, 3]);

    let table = view.snapshot().table.unwrap();
    assert_eq!(table.headers, vec!["id", "name", "description"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0].id, 1);
    assert_eq!(table.rows[0].cells, vec!["1", "Sample 1", "First sample entry"]);
    assert_eq!(table.empty, None);
}

#[tokio::test]
async fn test_mount_with_failing_reads_shows_empty_store() {
    let (store, blobs, notifications) = flaky_store();
    blobs.fail_reads(true);
    let view = ViewController::new(store);

    view.mount().await.unwrap();

    assert_eq!(view.phase_kind(), PhaseKind::Loaded);
    let table = view.snapshot().table.unwrap();
    assert_eq!(table.empty, Some(EmptyState::NoRecords));
    assert_eq!(drain(&notifications)[0].message, "Failed to load data");
}

#[tokio::test]
async fn test_mount_without_columns_still_lists_records() {
    let config = Config::builder().columns(["name", "description"]).build();
    let (store, _notifications) = store_over(config, Arc::new(MemoryBlobStore::new()));
    let view = ViewController::new(store);

    view.mount().await.unwrap();

    let table = view.snapshot().table.unwrap();
    assert!(table.headers.is_empty());
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.empty, None);
}

// =============================================================================
// Create Flow Tests
// =============================================================================

#[tokio::test]
async fn test_add_new_opens_blank_create_form() {
    let view = mounted_view().await;

    view.add_new().unwrap();

    match view.phase() {
        Phase::FormOpen(form) => {
            assert_eq!(form.mode, FormMode::Create);
            assert_eq!(form.draft.get("name"), Some(""));
            assert_eq!(form.draft.get("id"), None);
        }
        other => panic!("unexpected phase {:?}", other),
    }

    let form = view.snapshot().form.unwrap();
    assert_eq!(form.title, "Add New Record");
    assert_eq!(form.submit_label, "Create");
    assert_eq!(form.fields.len(), 2);
    assert_eq!(form.fields[0].name, "name");
    assert_eq!(form.fields[0].placeholder, "Enter name");
    assert_eq!(form.fields[0].kind, FieldKind::SingleLine);
    assert_eq!(form.fields[1].kind, FieldKind::MultiLine);
}

#[tokio::test]
async fn test_submit_create_refreshes_list() {
    let view = mounted_view().await;

    view.add_new().unwrap();
    view.set_field("name", "X").unwrap();
    view.set_field("description", "Y").unwrap();
    let saved = view.submit().await.unwrap();

    assert_eq!(saved.id(), Some(4));
    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(ids(&view.records()), vec![1, 2, 3, 4]);
    assert!(view.snapshot().form.is_none());
}

#[tokio::test]
async fn test_submit_create_leaves_untouched_fields_out() {
    let view = mounted_view().await;

    view.add_new().unwrap();
    view.set_field("name", "Only name").unwrap();
    let saved = view.submit().await.unwrap();

    assert_eq!(saved.get("name"), Some(&Value::text("Only name")));
    assert_eq!(saved.get("description"), None);
    assert_eq!(view.records()[3], saved);
}

#[tokio::test]
async fn test_submit_failure_keeps_form_open() {
    let (store, blobs, notifications) = flaky_store();
    let view = ViewController::new(store);
    view.mount().await.unwrap();
    drain(&notifications);

    view.add_new().unwrap();
    view.set_field("name", "X").unwrap();
    blobs.fail_writes(true);

    let result = view.submit().await;

    assert!(matches!(result, Err(ViewError::Store(_))));
    match view.phase() {
        Phase::FormOpen(form) => {
            assert!(form.error.is_some());
            assert!(!form.submitting);
            assert_eq!(form.draft.get("name"), Some("X"));
        }
        other => panic!("unexpected phase {:?}", other),
    }
    assert!(view.last_error().is_some());
    assert_eq!(drain(&notifications).len(), 1);

    // Retry once the backend recovers
    blobs.fail_writes(false);
    view.submit().await.unwrap();
    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(view.records().len(), 4);
    assert!(view.last_error().is_none());
}

#[tokio::test]
async fn test_cancel_form_discards_without_persisting() {
    let (store, blobs, notifications) = memory_store();
    let view = ViewController::new(store);
    view.mount().await.unwrap();
    let before = blobs.snapshot("samples");

    view.add_new().unwrap();
    view.set_field("name", "never saved").unwrap();
    view.cancel_form().unwrap();

    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(blobs.snapshot("samples"), before);
    assert!(drain(&notifications).is_empty());

    // A new form starts blank again
    view.add_new().unwrap();
    let form = view.snapshot().form.unwrap();
    assert_eq!(form.fields[0].value, "");
}

#[tokio::test]
async fn test_set_field_rejects_unknown_column() {
    let view = mounted_view().await;
    view.add_new().unwrap();

    assert!(matches!(
        view.set_field("id", "9"),
        Err(ViewError::UnknownColumn(_))
    ));
    assert!(matches!(
        view.set_field("status", "x"),
        Err(ViewError::UnknownColumn(_))
    ));
}

// =============================================================================
// Edit Flow Tests
// =============================================================================

#[tokio::test]
async fn test_edit_row_prefills_form() {
    let view = mounted_view().await;

    view.edit_row(2).unwrap();

    match view.phase() {
        Phase::FormOpen(form) => {
            assert!(matches!(form.mode, FormMode::Edit { id: 2, .. }));
            assert_eq!(form.draft.get("name"), Some("Sample 2"));
            assert_eq!(form.draft.get("description"), Some("Second sample entry"));
        }
        other => panic!("unexpected phase {:?}", other),
    }

    let form = view.snapshot().form.unwrap();
    assert_eq!(form.title, "Edit Record");
    assert_eq!(form.submit_label, "Update");
}

#[tokio::test]
async fn test_submit_edit_updates_only_touched_fields() {
    let (store, _blobs, _notifications) = memory_store();
    store
        .update(1, samplebook::Record::new().with("description", Value::number(5)))
        .await
        .unwrap();
    let view = ViewController::new(store);
    view.mount().await.unwrap();

    view.edit_row(1).unwrap();
    view.set_field("name", "Z").unwrap();
    let saved = view.submit().await.unwrap();

    assert_eq!(saved.id(), Some(1));
    assert_eq!(saved.get("name"), Some(&Value::text("Z")));
    // untouched numeric value keeps its type
    assert_eq!(saved.get("description"), Some(&Value::number(5)));
    assert_eq!(view.records()[0], saved);
}

#[tokio::test]
async fn test_edit_unknown_row() {
    let view = mounted_view().await;

    assert!(matches!(
        view.edit_row(99),
        Err(ViewError::UnknownRecord { id: 99 })
    ));
    assert_eq!(view.phase(), Phase::Loaded);
}

#[tokio::test]
async fn test_edit_of_concurrently_deleted_record_fails_and_stays_open() {
    let (store, _blobs, _notifications) = memory_store();
    let view = ViewController::new(Arc::clone(&store));
    view.mount().await.unwrap();

    view.edit_row(3).unwrap();
    store.delete(3).await.unwrap();
    view.set_field("name", "late").unwrap();

    let result = view.submit().await;

    assert!(matches!(
        result,
        Err(ViewError::Store(samplebook::StoreError::NotFound { id: 3 }))
    ));
    assert_eq!(view.phase_kind(), PhaseKind::FormOpen);
}

// =============================================================================
// Delete Flow Tests
// =============================================================================

#[tokio::test]
async fn test_delete_confirm_flow() {
    let view = mounted_view().await;

    view.request_delete(2).unwrap();
    assert_eq!(view.phase(), Phase::DeleteConfirm { id: 2 });
    assert_eq!(view.snapshot().delete_confirm, Some(2));
    // Table stays visible behind the dialog
    assert!(view.snapshot().table.is_some());

    view.confirm_delete().await.unwrap();

    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(ids(&view.records()), vec![1, 3]);
}

#[tokio::test]
async fn test_delete_cancel_is_noop() {
    let (store, blobs, notifications) = memory_store();
    let view = ViewController::new(store);
    view.mount().await.unwrap();
    let before = blobs.snapshot("samples");

    view.request_delete(1).unwrap();
    view.cancel_delete().unwrap();

    assert_eq!(view.phase(), Phase::Loaded);
    assert_eq!(blobs.snapshot("samples"), before);
    assert!(drain(&notifications).is_empty());
}

#[tokio::test]
async fn test_delete_failure_returns_to_loaded_with_error() {
    let (store, blobs, _notifications) = flaky_store();
    let view = ViewController::new(store);
    view.mount().await.unwrap();

    view.request_delete(1).unwrap();
    blobs.fail_writes(true);
    let result = view.confirm_delete().await;

    assert!(matches!(result, Err(ViewError::Store(_))));
    assert_eq!(view.phase(), Phase::Loaded);
    assert!(view.last_error().is_some());
    assert_eq!(ids(&view.records()), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_delete_last_record_shows_empty_store() {
    let view = mounted_view().await;

    for id in [1, 2, 3] {
        view.request_delete(id).unwrap();
        view.confirm_delete().await.unwrap();
    }

    let table = view.snapshot().table.unwrap();
    assert_eq!(table.empty, Some(EmptyState::NoRecords));
    assert_eq!(
        table.empty.unwrap().message(),
        "No records found in the samples table."
    );
}

// =============================================================================
// Invalid Transition Tests
// =============================================================================

#[tokio::test]
async fn test_actions_before_mount_are_rejected() {
    let (store, _blobs, _notifications) = memory_store();
    let view = ViewController::new(store);

    assert!(matches!(
        view.add_new(),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.edit_row(1),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.request_delete(1),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert_eq!(view.phase(), Phase::Loading);
}

#[tokio::test]
async fn test_wrong_phase_actions_leave_state_untouched() {
    let view = mounted_view().await;

    assert!(matches!(
        view.submit().await,
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.confirm_delete().await,
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.cancel_form(),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.cancel_delete(),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert_eq!(view.phase(), Phase::Loaded);

    view.add_new().unwrap();
    assert!(matches!(
        view.edit_row(1),
        Err(ViewError::InvalidTransition { .. })
    ));
    assert!(matches!(
        view.refresh().await,
        Err(ViewError::InvalidTransition { .. })
    ));
    assert_eq!(view.phase_kind(), PhaseKind::FormOpen);
}

// =============================================================================
// In-flight Guard Tests
// =============================================================================

#[tokio::test]
async fn test_double_submit_is_rejected() {
    let view = slow_write_view(Duration::from_millis(100));
    view.mount().await.unwrap();
    view.add_new().unwrap();
    view.set_field("name", "once").unwrap();

    let (first, second) = tokio::join!(view.submit(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(view.is_busy());
        assert!(matches!(
            view.set_field("name", "twice"),
            Err(ViewError::OperationInFlight)
        ));
        assert!(matches!(view.cancel_form(), Err(ViewError::OperationInFlight)));
        view.submit().await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(ViewError::OperationInFlight)));
    assert_eq!(view.records().len(), 4);
    assert!(!view.is_busy());
}

#[tokio::test]
async fn test_form_shows_submitting_while_in_flight() {
    let view = slow_write_view(Duration::from_millis(100));
    view.mount().await.unwrap();
    view.add_new().unwrap();

    let (_, submitting) = tokio::join!(view.submit(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        view.snapshot().form.map(|f| f.submitting)
    });

    assert_eq!(submitting, Some(true));
}

#[tokio::test]
async fn test_guard_released_when_submit_is_dropped() {
    let view = slow_write_view(Duration::from_millis(200));
    view.mount().await.unwrap();
    view.add_new().unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), view.submit()).await;
    assert!(timed_out.is_err());

    assert!(!view.is_busy());
    view.cancel_form().unwrap();
    assert_eq!(view.phase(), Phase::Loaded);
    view.refresh().await.unwrap();
    assert_eq!(view.records().len(), 3);
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_filters_table() {
    let view = mounted_view().await;

    view.set_search("SAMPLE 2");
    let table = view.snapshot().table.unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].id, 2);

    view.set_search("nothing like this");
    let table = view.snapshot().table.unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(table.empty, Some(EmptyState::NoMatches));

    view.set_search("");
    assert_eq!(view.snapshot().table.unwrap().rows.len(), 3);
}

#[tokio::test]
async fn test_search_survives_refresh() {
    let view = mounted_view().await;
    view.set_search("third");

    view.add_new().unwrap();
    view.set_field("name", "Another third one").unwrap();
    view.submit().await.unwrap();

    let snapshot = view.snapshot();
    assert_eq!(snapshot.search, "third");
    let rows: Vec<u64> = snapshot.table.unwrap().rows.iter().map(|r| r.id).collect();
    assert_eq!(rows, vec![3, 4]);
}
