//! Saving and restoring form data through the storage backend

use super::{ContentState, FormDataStore, LoadTicket, WizardError, WizardPointer, WizardSession};
use crate::storage::{FormStorage, StorageError};

/// Read and parse the stored snapshot.
///
/// Missing, unreadable and malformed snapshots all come back as `None`.
pub async fn read_snapshot(storage: &dyn FormStorage, key: &str) -> Option<FormDataStore> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored form data");
            return None;
        }
    };

    match FormDataStore::from_json(&raw) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed stored form data");
            None
        }
    }
}

impl WizardSession {
    pub fn form_data(&self) -> &FormDataStore {
        &self.form_data
    }

    /// Capture the rendered fields under the current key, then write the
    /// whole store to storage
    pub async fn save(&mut self) -> Result<(), WizardError> {
        if matches!(self.content, ContentState::Ready(_)) {
            self.form_data
                .replace(self.pointer.key(), self.live_fields.clone());
        }
        self.persist().await
    }

    /// Reload the stored snapshot and fill the rendered fields of the current
    /// sub-step from it. Returns how many fields were filled.
    pub async fn restore(&mut self) -> usize {
        if let Some(stored) = read_snapshot(self.storage.as_ref(), &self.storage_key).await {
            self.form_data = stored;
        }

        let Some(saved) = self.form_data.get(&self.pointer.key()) else {
            return 0;
        };

        let mut filled = 0;
        for (name, value) in saved {
            if let Some(slot) = self.live_fields.get_mut(name) {
                *slot = value.clone();
                filled += 1;
            }
        }

        tracing::debug!(session = %self.id, key = %self.pointer.key(), filled, "Restored form data");
        filled
    }

    /// Clear stored and in-memory data and return to (1, 1)
    pub async fn reset(&mut self) -> Result<LoadTicket, WizardError> {
        self.storage.remove(&self.storage_key).await?;

        self.form_data.clear();
        self.validation.clear();
        self.pointer = WizardPointer::START;
        self.completed = false;

        tracing::info!(session = %self.id, "Wizard reset");
        Ok(self.issue_ticket())
    }

    pub(super) async fn persist(&self) -> Result<(), WizardError> {
        let json = self
            .form_data
            .to_json()
            .map_err(|e| StorageError::Write(self.storage_key.clone(), e.to_string()))?;
        self.storage.set(&self.storage_key, &json).await?;
        Ok(())
    }
}
