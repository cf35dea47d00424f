//! Content provider backed by an in-memory component table

use async_trait::async_trait;
use std::collections::HashMap;

use super::{ContentError, ContentProvider, StepContent};

/// Component documents compiled into the binary, keyed by reference
const BUILDING_COMPONENTS: &[(&str, &str)] = &[
    (
        "building-information/building-name-location",
        include_str!("../../components/building-information/building-name-location.yaml"),
    ),
    (
        "building-information/building-details",
        include_str!("../../components/building-information/building-details.yaml"),
    ),
    (
        "operational-details/operational-schedule-temperature",
        include_str!(
            "../../components/operational-details/operational-schedule-temperature.yaml"
        ),
    ),
    (
        "operational-details/cooling-system",
        include_str!("../../components/operational-details/cooling-system.yaml"),
    ),
    (
        "operational-details/ventilation-system",
        include_str!("../../components/operational-details/ventilation-system.yaml"),
    ),
    (
        "operational-details/lighting-system",
        include_str!("../../components/operational-details/lighting-system.yaml"),
    ),
    (
        "operational-details/lift-escalator-system",
        include_str!("../../components/operational-details/lift-escalator-system.yaml"),
    ),
    (
        "operational-details/hot-water-system",
        include_str!("../../components/operational-details/hot-water-system.yaml"),
    ),
    (
        "operational-data-entry/operational-data-entry",
        include_str!("../../components/operational-data-entry/operational-data-entry.yaml"),
    ),
    (
        "building-structural-components/building-structural-components",
        include_str!(
            "../../components/building-structural-components/building-structural-components.yaml"
        ),
    ),
];

/// Serves components from a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticContentProvider {
    components: HashMap<String, StepContent>,
}

impl StaticContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The add-building components shipped with the binary
    pub fn building() -> Result<Self, ContentError> {
        let mut provider = Self::new();
        for (component, yaml) in BUILDING_COMPONENTS {
            provider.insert(StepContent::from_yaml(component, yaml)?);
        }
        Ok(provider)
    }

    pub fn insert(&mut self, content: StepContent) {
        self.components.insert(content.component.clone(), content);
    }

    pub fn with(mut self, content: StepContent) -> Self {
        self.insert(content);
        self
    }

    pub fn contains(&self, component: &str) -> bool {
        self.components.contains_key(component)
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    fn name(&self) -> &'static str {
        "builtin"
    }

    async fn fetch(&self, component: &str) -> Result<StepContent, ContentError> {
        self.components
            .get(component)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(component.to_string()))
    }
}
