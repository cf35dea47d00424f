//! Sub-step content: field definitions resolved from a component reference
//!
//! The wizard core only knows component references. A [`ContentProvider`]
//! turns a reference into a [`StepContent`] describing the fields to render;
//! the component's own validation rules live in [`ContentValidator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod builtin;
mod directory;
mod http;
mod rules;

pub use builtin::StaticContentProvider;
pub use directory::DirectoryContentProvider;
pub use http::HttpContentProvider;
pub use rules::{ContentValidator, FieldIssue, Verdict};

use crate::wizard::{FieldMap, FieldValue};

/// Errors from resolving a component reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("component '{0}' not found")]
    NotFound(String),

    #[error("failed to fetch component '{0}': {1}")]
    Transport(String, String),

    #[error("component '{0}' is invalid: {1}")]
    Invalid(String, String),
}

/// Kind of input a field renders as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Select,
    Toggle,
}

/// Definition of one input-bearing field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FieldSpec {
    /// Value of the field before the user touches it
    pub fn initial_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Toggle => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// Renderable content of a sub-step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepContent {
    /// Reference this content was resolved from
    #[serde(default)]
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl StepContent {
    /// Parse and check a component document
    pub fn from_yaml(component: &str, yaml: &str) -> Result<Self, ContentError> {
        let mut content: StepContent = serde_yaml::from_str(yaml)
            .map_err(|e| ContentError::Invalid(component.to_string(), e.to_string()))?;
        content.component = component.to_string();
        content.check()?;
        Ok(content)
    }

    fn check(&self) -> Result<(), ContentError> {
        let invalid = |message: String| ContentError::Invalid(self.component.clone(), message);

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(invalid("field with empty name".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
            if field.kind == FieldKind::Select && field.options.is_empty() {
                return Err(invalid(format!("select field '{}' has no options", field.name)));
            }
        }

        // Surfaces bad patterns at load time rather than on every keystroke
        ContentValidator::new(self).map(|_| ())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Initial live field values for this content
    pub fn blank_fields(&self) -> FieldMap {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.initial_value()))
            .collect()
    }
}

/// Resolves component references to content
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    async fn fetch(&self, component: &str) -> Result<StepContent, ContentError>;
}
