//! View model of the wizard chrome: stepper, actions and step info

use super::{WizardPointer, WizardSession};

/// Display status of a step or sub-step in the stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// What selecting a stepper row navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Step(usize),
    SubStep(usize, usize),
}

/// One line of the stepper; sub-step rows only appear for steps with more
/// than one sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepperRow {
    pub target: JumpTarget,
    pub label: String,
    pub status: StepStatus,
    /// 0 for steps, 1 for sub-steps
    pub depth: u8,
}

/// Flattened stepper for the navigation panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepperView {
    pub rows: Vec<StepperRow>,
}

impl StepperView {
    pub fn active_index(&self) -> Option<usize> {
        self.rows
            .iter()
            .rposition(|r| r.status == StepStatus::Active)
    }
}

/// Enablement of the back / skip / continue actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionState {
    pub visible: bool,
    pub can_go_back: bool,
    pub can_skip: bool,
    pub can_continue: bool,
    pub continue_label: &'static str,
}

/// Details of the current sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    pub step: usize,
    pub sub_step: usize,
    pub step_name: String,
    pub sub_step_name: String,
    pub component: String,
    pub required_fields: Vec<String>,
    pub title: String,
    pub description: String,
}

impl WizardSession {
    pub fn stepper(&self) -> StepperView {
        let mut rows = Vec::new();

        for step in self.catalog.steps() {
            let status = if self.completed || step.index < self.pointer.step {
                StepStatus::Completed
            } else if step.index == self.pointer.step {
                StepStatus::Active
            } else {
                StepStatus::Pending
            };

            rows.push(StepperRow {
                target: JumpTarget::Step(step.index),
                label: step.name.clone(),
                status,
                depth: 0,
            });

            if step.sub_steps.len() < 2 {
                continue;
            }

            for (i, sub) in step.sub_steps.iter().enumerate() {
                let number = i + 1;
                let sub_status = match status {
                    StepStatus::Active if number < self.pointer.sub_step => StepStatus::Completed,
                    StepStatus::Active if number == self.pointer.sub_step => StepStatus::Active,
                    StepStatus::Active => StepStatus::Pending,
                    other => other,
                };
                rows.push(StepperRow {
                    target: JumpTarget::SubStep(step.index, number),
                    label: sub.name.clone(),
                    status: sub_status,
                    depth: 1,
                });
            }
        }

        StepperView { rows }
    }

    pub fn actions(&self) -> ActionState {
        let at_end = self.pointer == self.catalog.last();
        ActionState {
            visible: !self.completed,
            can_go_back: self.can_go_back() && !self.is_loading(),
            can_skip: !self.completed && !self.is_loading(),
            can_continue: self.can_continue(),
            continue_label: if at_end {
                "Complete Setup"
            } else {
                "Save & continue"
            },
        }
    }

    pub fn current_step_info(&self) -> Option<StepInfo> {
        let step = self.catalog.step(self.pointer.step)?;
        let sub = self.catalog.sub_step(self.pointer)?;

        Some(StepInfo {
            step: self.pointer.step,
            sub_step: self.pointer.sub_step,
            step_name: step.name.clone(),
            sub_step_name: sub.name.clone(),
            component: sub.component.clone(),
            required_fields: sub.required_fields.clone(),
            title: sub.title.clone(),
            description: sub.description.clone(),
        })
    }
}

impl JumpTarget {
    pub fn pointer(&self) -> WizardPointer {
        match *self {
            JumpTarget::Step(step) => WizardPointer::new(step, 1),
            JumpTarget::SubStep(step, sub_step) => WizardPointer::new(step, sub_step),
        }
    }
}
