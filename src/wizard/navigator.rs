//! Pointer movement through the catalog

use super::{ContentState, LoadTicket, WizardError, WizardPointer, WizardSession};

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Pointer moved; content for the ticket must be fetched
    Moved(LoadTicket),
    /// Advanced past the last sub-step
    Completed,
    /// Already at the start; nothing moved
    Unchanged,
    /// Dropped because a load is pending or the wizard is completed
    Ignored,
}

impl Transition {
    pub fn ticket(&self) -> Option<&LoadTicket> {
        match self {
            Transition::Moved(ticket) => Some(ticket),
            _ => None,
        }
    }
}

impl WizardSession {
    /// Jump to the first sub-step of `step`
    pub async fn go_to_step(&mut self, step: usize) -> Result<Transition, WizardError> {
        if self.catalog.step(step).is_none() {
            return Err(WizardError::StepOutOfRange(step));
        }
        self.go_to_sub_step(step, 1).await
    }

    /// Jump to any sub-step, including ones not yet completed
    pub async fn go_to_sub_step(
        &mut self,
        step: usize,
        sub_step: usize,
    ) -> Result<Transition, WizardError> {
        let count = self
            .catalog
            .sub_step_count(step)
            .ok_or(WizardError::StepOutOfRange(step))?;
        if sub_step == 0 || sub_step > count {
            return Err(WizardError::SubStepOutOfRange(step, sub_step));
        }
        if self.navigation_blocked("jump") {
            return Ok(Transition::Ignored);
        }

        self.save().await?;
        Ok(self.move_to(WizardPointer::new(step, sub_step)))
    }

    /// Save, then move forward one sub-step or complete the wizard
    pub async fn advance(&mut self) -> Result<Transition, WizardError> {
        if self.navigation_blocked("advance") {
            return Ok(Transition::Ignored);
        }

        self.save().await?;
        match self.next_pointer() {
            Some(next) => Ok(self.move_to(next)),
            None => {
                self.complete();
                Ok(Transition::Completed)
            }
        }
    }

    /// Save, then move back one sub-step; a no-op at the start
    pub async fn retreat(&mut self) -> Result<Transition, WizardError> {
        if self.navigation_blocked("retreat") {
            return Ok(Transition::Ignored);
        }

        self.save().await?;
        match self.previous_pointer() {
            Some(previous) => Ok(self.move_to(previous)),
            None => Ok(Transition::Unchanged),
        }
    }

    /// Advance without regard to validation, keeping whatever was entered
    pub async fn skip(&mut self) -> Result<Transition, WizardError> {
        tracing::info!(session = %self.id, pointer = %self.pointer, "Skipping sub-step");
        self.advance().await
    }

    fn next_pointer(&self) -> Option<WizardPointer> {
        let WizardPointer { step, sub_step } = self.pointer;
        let count = self.catalog.sub_step_count(step)?;

        if sub_step < count {
            Some(WizardPointer::new(step, sub_step + 1))
        } else if step < self.catalog.total_steps() {
            Some(WizardPointer::new(step + 1, 1))
        } else {
            None
        }
    }

    fn previous_pointer(&self) -> Option<WizardPointer> {
        let WizardPointer { step, sub_step } = self.pointer;

        if sub_step > 1 {
            Some(WizardPointer::new(step, sub_step - 1))
        } else if step > 1 {
            let last = self.catalog.sub_step_count(step - 1)?;
            Some(WizardPointer::new(step - 1, last))
        } else {
            None
        }
    }

    fn navigation_blocked(&self, action: &str) -> bool {
        if self.completed {
            tracing::debug!(session = %self.id, action, "Ignoring navigation: wizard completed");
            return true;
        }
        if self.is_loading() {
            tracing::debug!(session = %self.id, action, "Ignoring navigation: content load pending");
            return true;
        }
        false
    }

    fn move_to(&mut self, destination: WizardPointer) -> Transition {
        let from = self.pointer;
        self.pointer = destination;
        tracing::info!(
            session = %self.id,
            from = %from,
            to = %destination,
            progress = self.progress(),
            "Navigated"
        );
        Transition::Moved(self.issue_ticket())
    }

    fn complete(&mut self) {
        self.completed = true;
        self.generation += 1;
        self.live_fields.clear();
        self.content = ContentState::Idle;
        tracing::info!(
            session = %self.id,
            sub_steps = self.form_data.len(),
            "Wizard completed"
        );
    }
}
