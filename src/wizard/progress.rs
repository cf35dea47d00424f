//! Progress through the catalog

use super::{StepCatalog, WizardPointer, WizardSession};

/// Position within a multi-sub-step step ("2 out of 6 steps")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubStepProgress {
    pub current: usize,
    pub total: usize,
}

/// Percentage of sub-steps passed before `pointer`, rounded to nearest
pub fn progress_percentage(catalog: &StepCatalog, pointer: WizardPointer) -> u8 {
    let total = catalog.total_sub_steps();
    if total == 0 {
        return 0;
    }

    let passed: usize = catalog
        .steps()
        .iter()
        .take(pointer.step.saturating_sub(1))
        .map(|s| s.sub_steps.len())
        .sum();
    let completed = passed + pointer.sub_step.saturating_sub(1);

    ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

impl WizardSession {
    /// Overall completion percentage; 100 once completed
    pub fn progress(&self) -> u8 {
        if self.completed {
            100
        } else {
            progress_percentage(&self.catalog, self.pointer)
        }
    }

    /// Sub-step position, only for steps with more than one sub-step
    pub fn sub_step_progress(&self) -> Option<SubStepProgress> {
        let total = self.catalog.sub_step_count(self.pointer.step)?;
        (total > 1).then_some(SubStepProgress {
            current: self.pointer.sub_step,
            total,
        })
    }
}
