//! View controller
//!
//! Drives the phase machine against a `RecordStore`.
//!
//! ## Concurrency
//! Actions take `&self` so a controller can be shared between tasks.
//! - `data` is a `parking_lot::Mutex`, never held across an await
//! - `in_flight` admits one store-touching action at a time; a second one
//!   fails with `OperationInFlight` instead of queueing behind the first

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::columns::ColumnModel;
use crate::error::ViewError;
use crate::record::{Collection, Record, RecordId, Schema};
use crate::store::RecordStore;

use super::render::{FormView, TableView, ViewSnapshot};
use super::state::{FormMode, Phase, PhaseKind};

/// State guarded by the controller lock
struct ViewData {
    phase: Phase,
    schema: Schema,
    columns: ColumnModel,
    records: Collection,
    search: String,
    last_error: Option<String>,
}

/// Holds `in_flight` for the lifetime of one action, also when its future
/// is dropped half way
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ViewError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ViewError::OperationInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The list/form view over one record store
pub struct ViewController {
    store: Arc<RecordStore>,
    data: Mutex<ViewData>,
    in_flight: AtomicBool,
}

impl ViewController {
    /// Create a controller in the initial `Loading` phase
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            data: Mutex::new(ViewData {
                phase: Phase::Loading,
                schema: Schema::empty(),
                columns: ColumnModel::default(),
                records: Collection::new(),
                search: String::new(),
                last_error: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Store-touching Actions
    // =========================================================================

    /// Initial fetch: Loading → Loaded
    pub async fn mount(&self) -> Result<(), ViewError> {
        self.refresh().await
    }

    /// Re-fetch columns and records from Loading or Loaded
    pub async fn refresh(&self) -> Result<(), ViewError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        {
            let mut data = self.data.lock();
            data.phase = data.phase.begin_refresh()?;
        }
        self.reload().await;
        Ok(())
    }

    /// Submit the open form
    ///
    /// On success the list is re-fetched and the form closes. On failure the
    /// form stays open with the error attached.
    pub async fn submit(&self) -> Result<Record, ViewError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let (mode, record) = {
            let mut data = self.data.lock();
            let describe = data.phase.describe();
            let Phase::FormOpen(form) = &mut data.phase else {
                return Err(ViewError::InvalidTransition {
                    action: "submit the form",
                    phase: describe,
                });
            };
            form.submitting = true;
            form.error = None;
            let record = form.draft.to_record();
            let mode = form.mode.clone();
            data.last_error = None;
            (mode, record)
        };

        let result = match &mode {
            FormMode::Create => self.store.create(record).await,
            FormMode::Edit { id, .. } => self.store.update(*id, record).await,
        };

        match result {
            Ok(saved) => {
                tracing::debug!(id = ?saved.id(), "form submitted");
                self.reload().await;
                Ok(saved)
            }
            Err(e) => {
                let message = e.to_string();
                let mut data = self.data.lock();
                if let Phase::FormOpen(form) = &mut data.phase {
                    form.submitting = false;
                    form.error = Some(message.clone());
                }
                data.last_error = Some(message);
                Err(e.into())
            }
        }
    }

    /// Delete the record awaiting confirmation, then re-fetch
    ///
    /// The list is re-fetched even when the delete fails.
    pub async fn confirm_delete(&self) -> Result<(), ViewError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let id = {
            let mut data = self.data.lock();
            let (next, id) = data.phase.confirm_delete()?;
            data.phase = next;
            data.last_error = None;
            id
        };

        let result = self.store.delete(id).await;
        self.reload().await;

        if let Err(e) = result {
            self.data.lock().last_error = Some(e.to_string());
            return Err(e.into());
        }
        Ok(())
    }

    // =========================================================================
    // Local Actions
    // =========================================================================

    /// "Add new": Loaded → FormOpen(create)
    pub fn add_new(&self) -> Result<(), ViewError> {
        let mut data = self.data.lock();
        data.phase = data.phase.open_create(&data.columns)?;
        Ok(())
    }

    /// "Edit row": Loaded → FormOpen(edit, record)
    pub fn edit_row(&self, id: RecordId) -> Result<(), ViewError> {
        let mut data = self.data.lock();
        data.phase.ensure_loaded("edit a record")?;
        let record = data
            .records
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or(ViewError::UnknownRecord { id })?;
        data.phase = data.phase.open_edit(&record, &data.columns)?;
        Ok(())
    }

    /// Change one field of the open form
    pub fn set_field(&self, column: &str, text: impl Into<String>) -> Result<(), ViewError> {
        if self.is_busy() {
            return Err(ViewError::OperationInFlight);
        }
        let mut data = self.data.lock();
        let describe = data.phase.describe();
        let Phase::FormOpen(form) = &mut data.phase else {
            return Err(ViewError::InvalidTransition {
                action: "edit a field",
                phase: describe,
            });
        };
        if !form.draft.set(column, text) {
            return Err(ViewError::UnknownColumn(column.to_string()));
        }
        Ok(())
    }

    /// FormOpen → Loaded without touching the store
    pub fn cancel_form(&self) -> Result<(), ViewError> {
        if self.is_busy() {
            return Err(ViewError::OperationInFlight);
        }
        let mut data = self.data.lock();
        data.phase = data.phase.cancel_form()?;
        Ok(())
    }

    /// Row delete icon: Loaded → DeleteConfirm(id)
    pub fn request_delete(&self, id: RecordId) -> Result<(), ViewError> {
        let mut data = self.data.lock();
        data.phase.ensure_loaded("delete a record")?;
        if !data.records.iter().any(|r| r.id() == Some(id)) {
            return Err(ViewError::UnknownRecord { id });
        }
        data.phase = data.phase.request_delete(id)?;
        Ok(())
    }

    /// DeleteConfirm → Loaded
    pub fn cancel_delete(&self) -> Result<(), ViewError> {
        let mut data = self.data.lock();
        data.phase = data.phase.cancel_delete()?;
        Ok(())
    }

    /// Set the search query (any phase)
    pub fn set_search(&self, query: impl Into<String>) {
        self.data.lock().search = query.into();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.data.lock().phase.clone()
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.data.lock().phase.kind()
    }

    /// Copy of the last fetched records
    pub fn records(&self) -> Collection {
        self.data.lock().records.clone()
    }

    pub fn schema(&self) -> Schema {
        self.data.lock().schema.clone()
    }

    pub fn column_model(&self) -> ColumnModel {
        self.data.lock().columns.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.data.lock().last_error.clone()
    }

    /// A store-touching action is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Render model of the current state
    pub fn snapshot(&self) -> ViewSnapshot {
        let data = self.data.lock();

        let table = match data.phase {
            Phase::Loading => None,
            _ => Some(TableView::build(&data.records, &data.columns, &data.search)),
        };
        let form = match &data.phase {
            Phase::FormOpen(form) => Some(FormView::build(form, &data.columns)),
            _ => None,
        };
        let delete_confirm = match data.phase {
            Phase::DeleteConfirm { id } => Some(id),
            _ => None,
        };

        ViewSnapshot {
            phase: data.phase.kind(),
            table,
            form,
            delete_confirm,
            search: data.search.clone(),
            last_error: data.last_error.clone(),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Loading → fetch columns, then records → Loaded
    ///
    /// Store reads never fail (they degrade to empty), so this always ends
    /// in `Loaded`.
    async fn reload(&self) {
        self.data.lock().phase = Phase::Loading;

        let schema = self.store.get_columns().await;
        let records = self.store.get_records().await;

        let config = self.store.config();
        let columns = ColumnModel::derive(
            &schema,
            &config.hidden_columns,
            &config.multiline_columns,
        );

        let mut data = self.data.lock();
        tracing::debug!(
            columns = schema.len(),
            records = records.len(),
            "view reloaded"
        );
        data.schema = schema;
        data.columns = columns;
        data.records = records;
        data.phase = Phase::Loaded;
    }
}
