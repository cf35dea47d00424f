//! Immutable, ordered catalog of wizard steps and sub-steps

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::WizardPointer;

/// Errors raised while loading a step catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file '{0}': {1}")]
    Read(String, String),

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("catalog has no steps")]
    Empty,

    #[error("step {0} ('{1}') has no sub-steps")]
    EmptyStep(usize, String),

    #[error("sub-step '{1}' of step {0} has no component reference")]
    MissingComponent(usize, String),
}

/// One sub-step: the smallest navigable unit of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStepDefinition {
    pub name: String,
    /// Locator handed to the content provider
    pub component: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A top-level step grouping one or more sub-steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// 1-based position, assigned from catalog order on load
    #[serde(skip)]
    pub index: usize,
    pub name: String,
    pub sub_steps: Vec<SubStepDefinition>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    steps: Vec<StepDefinition>,
}

/// Ordered step catalog shared by every collaborator of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<StepDefinition>,
}

impl StepCatalog {
    /// Build a catalog from step definitions, assigning indices by position
    pub fn new(mut steps: Vec<StepDefinition>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (position, step) in steps.iter_mut().enumerate() {
            step.index = position + 1;
            if step.sub_steps.is_empty() {
                return Err(CatalogError::EmptyStep(step.index, step.name.clone()));
            }
            if let Some(sub) = step
                .sub_steps
                .iter()
                .find(|s| s.component.trim().is_empty())
            {
                return Err(CatalogError::MissingComponent(step.index, sub.name.clone()));
            }
        }

        Ok(Self { steps })
    }

    /// Parse a catalog from YAML (`steps: [...]`)
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.steps)
    }

    /// Load a catalog from a YAML file on disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Read(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// The add-building catalog shipped with the binary
    pub fn building() -> Result<Self, CatalogError> {
        Self::from_yaml(include_str!("../../catalog/building.yaml"))
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn total_sub_steps(&self) -> usize {
        self.steps.iter().map(|s| s.sub_steps.len()).sum()
    }

    pub fn step(&self, step: usize) -> Option<&StepDefinition> {
        step.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn sub_step_count(&self, step: usize) -> Option<usize> {
        self.step(step).map(|s| s.sub_steps.len())
    }

    pub fn sub_step(&self, pointer: WizardPointer) -> Option<&SubStepDefinition> {
        self.step(pointer.step)
            .and_then(|s| pointer.sub_step.checked_sub(1).and_then(|i| s.sub_steps.get(i)))
    }

    pub fn contains(&self, pointer: WizardPointer) -> bool {
        self.sub_step(pointer).is_some()
    }

    /// Position of the last sub-step of the last step
    pub fn last(&self) -> WizardPointer {
        let step = self.steps.len();
        WizardPointer::new(step, self.steps[step - 1].sub_steps.len())
    }

    /// Every valid pointer in catalog order
    pub fn pointers(&self) -> impl Iterator<Item = WizardPointer> + '_ {
        self.steps.iter().flat_map(|step| {
            (1..=step.sub_steps.len()).map(move |sub| WizardPointer::new(step.index, sub))
        })
    }
}
