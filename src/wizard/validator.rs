//! Gating of the continue action

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{ContentState, FieldMap, FieldValue, StepKey, WizardError, WizardSession};

/// Verdict published by the content side of a sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub is_valid: bool,
    /// Field values to merge into the form data store
    pub data: Option<FieldMap>,
    /// Sub-step the verdict is for; the current one when `None`
    pub step_key: Option<StepKey>,
}

/// Last reported verdict for a sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRecord {
    pub is_valid: bool,
    pub data: FieldMap,
    pub timestamp: DateTime<Utc>,
}

/// Handle given to rendered content for publishing form status.
///
/// Cloneable and detached from the session, so the content side never needs
/// a reference to the wizard itself.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    tx: mpsc::UnboundedSender<FormStatus>,
}

impl StatusReporter {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FormStatus>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn report(&self, status: FormStatus) {
        if self.tx.send(status).is_err() {
            tracing::debug!("Form status dropped: wizard session is gone");
        }
    }
}

impl WizardSession {
    /// Reporter to hand to the content of the current sub-step
    pub fn reporter(&self) -> StatusReporter {
        self.reporter.clone()
    }

    /// Record an externally reported verdict.
    ///
    /// When the report carries data it is merged into the form data store and
    /// persisted right away.
    pub async fn handle_form_status(&mut self, status: FormStatus) -> Result<(), WizardError> {
        let key = status.step_key.unwrap_or_else(|| self.pointer.key());
        if !self.catalog.contains(key.pointer()) {
            tracing::warn!(session = %self.id, key = %key, "Ignoring form status for unknown sub-step");
            return Ok(());
        }

        tracing::debug!(session = %self.id, key = %key, is_valid = status.is_valid, "Form status reported");
        self.validation.insert(
            key,
            ValidationRecord {
                is_valid: status.is_valid,
                data: status.data.clone().unwrap_or_default(),
                timestamp: Utc::now(),
            },
        );

        if let Some(data) = status.data {
            self.form_data.merge(key, data);
            self.persist().await?;
        }
        Ok(())
    }

    /// Apply every report queued on the reporter channel
    pub async fn drain_reports(&mut self) -> Result<usize, WizardError> {
        let mut applied = 0;
        while let Ok(status) = self.reports.try_recv() {
            self.handle_form_status(status).await?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn validation_record(&self, key: &StepKey) -> Option<&ValidationRecord> {
        self.validation.get(key)
    }

    /// Whether the current sub-step may be left via continue.
    ///
    /// A reported verdict wins; otherwise every required field must be
    /// present among the rendered fields and filled.
    pub fn is_current_step_valid(&self) -> bool {
        if let Some(record) = self.validation.get(&self.pointer.key()) {
            return record.is_valid;
        }

        let Some(sub_step) = self.current_sub_step() else {
            return false;
        };

        sub_step.required_fields.iter().all(|name| {
            self.live_fields
                .get(name)
                .is_some_and(FieldValue::is_filled)
        })
    }

    /// Continue needs rendered content; a failed load can only be skipped
    pub fn can_continue(&self) -> bool {
        !self.completed
            && matches!(self.content, ContentState::Ready(_))
            && self.is_current_step_valid()
    }

    pub fn can_go_back(&self) -> bool {
        !self.completed && !self.pointer.is_start()
    }

    pub fn live_fields(&self) -> &FieldMap {
        &self.live_fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.live_fields.get(name)
    }

    /// Update a rendered field; returns `false` if no such field is rendered
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        if !matches!(self.content, ContentState::Ready(_)) {
            return false;
        }
        match self.live_fields.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
