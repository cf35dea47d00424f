//! Wizard position and the step key used to index per-sub-step data

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::WizardError;

/// Current position in the catalog (both components are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WizardPointer {
    pub step: usize,
    pub sub_step: usize,
}

impl WizardPointer {
    /// The initial position, (1, 1)
    pub const START: WizardPointer = WizardPointer {
        step: 1,
        sub_step: 1,
    };

    pub fn new(step: usize, sub_step: usize) -> Self {
        Self { step, sub_step }
    }

    pub fn is_start(&self) -> bool {
        *self == Self::START
    }

    pub fn key(&self) -> StepKey {
        StepKey {
            step: self.step,
            sub_step: self.sub_step,
        }
    }
}

impl Default for WizardPointer {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for WizardPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.step, self.sub_step)
    }
}

/// Identity of a sub-step in storage and in status reports: `step-{step}-{sub_step}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepKey {
    pub step: usize,
    pub sub_step: usize,
}

impl StepKey {
    pub fn new(step: usize, sub_step: usize) -> Self {
        Self { step, sub_step }
    }

    pub fn pointer(&self) -> WizardPointer {
        WizardPointer::new(self.step, self.sub_step)
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step-{}-{}", self.step, self.sub_step)
    }
}

impl FromStr for StepKey {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WizardError::InvalidStepKey(s.to_string());

        let rest = s.strip_prefix("step-").ok_or_else(invalid)?;
        let (step, sub_step) = rest.split_once('-').ok_or_else(invalid)?;
        let step: usize = step.parse().map_err(|_| invalid())?;
        let sub_step: usize = sub_step.parse().map_err(|_| invalid())?;

        if step == 0 || sub_step == 0 {
            return Err(invalid());
        }

        Ok(StepKey { step, sub_step })
    }
}

impl Serialize for StepKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StepKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
