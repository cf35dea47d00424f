//! Multi-step wizard core
//!
//! A [`WizardSession`] owns everything mutable about one run of the wizard:
//! the pointer into the [`StepCatalog`], captured form data, reported
//! validation verdicts and the state of the current sub-step's content.
//! Navigation, validation and persistence are implemented as `impl` blocks in
//! the sibling modules.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::content::{ContentError, ContentProvider, StepContent};
use crate::storage::{FormStorage, StorageError, FORM_DATA_KEY};

mod catalog;
mod form;
mod navigator;
mod persister;
mod pointer;
mod progress;
mod validator;
mod view;

pub use catalog::{CatalogError, StepCatalog, StepDefinition, SubStepDefinition};
pub use form::{FieldMap, FieldValue, FormDataStore};
pub use navigator::Transition;
pub use persister::read_snapshot;
pub use pointer::{StepKey, WizardPointer};
pub use progress::{progress_percentage, SubStepProgress};
pub use validator::{FormStatus, StatusReporter, ValidationRecord};
pub use view::{ActionState, StepInfo, StepStatus, StepperRow, StepperView, JumpTarget};

#[cfg(test)]
mod tests;

/// Errors from wizard operations
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("step {0} does not exist")]
    StepOutOfRange(usize),

    #[error("sub-step {1} of step {0} does not exist")]
    SubStepOutOfRange(usize, usize),

    #[error("invalid step key '{0}'")]
    InvalidStepKey(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Wizard-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    InProgress(WizardPointer),
    /// Terminal; only a reset leaves it
    Completed,
}

/// Tag attached to every content fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub pointer: WizardPointer,
    pub generation: u64,
    pub component: String,
}

/// State of the content area for the current sub-step
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState {
    Idle,
    Loading(LoadTicket),
    Ready(StepContent),
    Failed { component: String, message: String },
}

/// One run of the wizard
pub struct WizardSession {
    id: Uuid,
    catalog: Arc<StepCatalog>,
    pointer: WizardPointer,
    completed: bool,
    form_data: FormDataStore,
    validation: HashMap<StepKey, ValidationRecord>,
    /// Values of the fields of the currently rendered sub-step
    live_fields: FieldMap,
    content: ContentState,
    generation: u64,
    storage: Arc<dyn FormStorage>,
    storage_key: String,
    reporter: StatusReporter,
    reports: mpsc::UnboundedReceiver<FormStatus>,
}

impl WizardSession {
    pub fn new(catalog: Arc<StepCatalog>, storage: Arc<dyn FormStorage>) -> Self {
        let (reporter, reports) = StatusReporter::channel();
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, steps = catalog.total_steps(), "Wizard session created");

        Self {
            id,
            catalog,
            pointer: WizardPointer::START,
            completed: false,
            form_data: FormDataStore::new(),
            validation: HashMap::new(),
            live_fields: FieldMap::new(),
            content: ContentState::Idle,
            generation: 0,
            storage,
            storage_key: FORM_DATA_KEY.to_string(),
            reporter,
            reports,
        }
    }

    /// Use a different storage key for the form data snapshot
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn pointer(&self) -> WizardPointer {
        self.pointer
    }

    pub fn current_key(&self) -> StepKey {
        self.pointer.key()
    }

    pub fn state(&self) -> WizardState {
        if self.completed {
            WizardState::Completed
        } else {
            WizardState::InProgress(self.pointer)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    /// Generation of the most recently issued load; changes whenever the
    /// content area is reloaded
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.content, ContentState::Loading(_))
    }

    pub fn current_sub_step(&self) -> Option<&SubStepDefinition> {
        self.catalog.sub_step(self.pointer)
    }

    // ─── Content Loading ────────────────────────────────────────────────────

    /// Start loading the current sub-step's content.
    ///
    /// Returns `None` once the wizard is completed.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.completed {
            return None;
        }
        Some(self.issue_ticket())
    }

    /// Retry a failed load; `None` unless the last load failed
    pub fn retry_load(&mut self) -> Option<LoadTicket> {
        match self.content {
            ContentState::Failed { .. } => {
                tracing::info!(session = %self.id, pointer = %self.pointer, "Retrying content load");
                self.begin_load()
            }
            _ => None,
        }
    }

    /// Apply the result of a fetch issued for `ticket`.
    ///
    /// Results for superseded tickets are dropped so they cannot overwrite
    /// the view of the sub-step the user has since moved to. Returns whether
    /// the result was applied.
    pub async fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<StepContent, ContentError>,
    ) -> bool {
        let current = matches!(
            &self.content,
            ContentState::Loading(pending) if pending == ticket && ticket.pointer == self.pointer
        );
        if !current {
            tracing::debug!(
                session = %self.id,
                generation = ticket.generation,
                pointer = %ticket.pointer,
                "Discarding stale content load"
            );
            return false;
        }

        match result {
            Ok(content) => {
                tracing::info!(
                    session = %self.id,
                    component = %ticket.component,
                    fields = content.fields.len(),
                    "Loaded step content"
                );
                self.live_fields = content.blank_fields();
                self.content = ContentState::Ready(content);
                self.validation.remove(&self.pointer.key());
                self.restore().await;
            }
            Err(e) => {
                tracing::warn!(
                    session = %self.id,
                    component = %ticket.component,
                    error = %e,
                    "Failed to load step content"
                );
                self.content = ContentState::Failed {
                    component: ticket.component.clone(),
                    message: e.to_string(),
                };
            }
        }
        true
    }

    /// Fetch and apply content for the current sub-step in one go, reusing a
    /// pending ticket if there is one
    pub async fn load_current(&mut self, provider: &dyn ContentProvider) -> bool {
        let ticket = match &self.content {
            ContentState::Loading(pending) => pending.clone(),
            _ => match self.begin_load() {
                Some(ticket) => ticket,
                None => return false,
            },
        };

        let result = provider.fetch(&ticket.component).await;
        self.finish_load(&ticket, result).await
    }

    /// Bump the generation and mark the current sub-step as loading
    fn issue_ticket(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            pointer: self.pointer,
            generation: self.generation,
            component: self
                .current_sub_step()
                .map(|s| s.component.clone())
                .unwrap_or_default(),
        };

        // The destination must re-validate rather than reuse a stale verdict
        self.validation.remove(&self.pointer.key());
        self.live_fields.clear();
        self.content = ContentState::Loading(ticket.clone());
        ticket
    }
}
