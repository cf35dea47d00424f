//! Component-owned validation of field values

use regex::Regex;

use super::{ContentError, FieldKind, FieldSpec, StepContent};
use crate::wizard::{FieldMap, FieldValue, FormStatus, StatusReporter, StepKey};

/// Problem found with a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Outcome of evaluating all fields of a sub-step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub issues: Vec<FieldIssue>,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|i| i.field == field)
            .map(|i| i.message.as_str())
    }
}

/// Rules of one rendered component, compiled once per load
#[derive(Debug, Clone)]
pub struct ContentValidator {
    fields: Vec<FieldSpec>,
    patterns: Vec<(String, Regex)>,
}

impl ContentValidator {
    pub fn new(content: &StepContent) -> Result<Self, ContentError> {
        let mut patterns = Vec::new();
        for field in &content.fields {
            if let Some(pattern) = &field.pattern {
                let regex = Regex::new(pattern).map_err(|e| {
                    ContentError::Invalid(
                        content.component.clone(),
                        format!("field '{}' has invalid pattern: {}", field.name, e),
                    )
                })?;
                patterns.push((field.name.clone(), regex));
            }
        }

        Ok(Self {
            fields: content.fields.clone(),
            patterns,
        })
    }

    /// Check every field against its rules
    pub fn evaluate(&self, values: &FieldMap) -> Verdict {
        let issues = self
            .fields
            .iter()
            .filter_map(|field| {
                self.check_field(field, values.get(&field.name))
                    .map(|message| FieldIssue {
                        field: field.name.clone(),
                        message,
                    })
            })
            .collect();

        Verdict { issues }
    }

    /// Evaluate `values` and publish the verdict for `key`
    pub fn report(&self, reporter: &StatusReporter, key: StepKey, values: &FieldMap) -> Verdict {
        let verdict = self.evaluate(values);
        reporter.report(FormStatus {
            is_valid: verdict.is_valid(),
            data: Some(values.clone()),
            step_key: Some(key),
        });
        verdict
    }

    fn check_field(&self, field: &FieldSpec, value: Option<&FieldValue>) -> Option<String> {
        let filled = value.is_some_and(FieldValue::is_filled);
        if !filled {
            return field.required.then(|| "This field is required".to_string());
        }

        let text = match value {
            Some(FieldValue::Text(text)) => text.trim(),
            _ => return None,
        };

        match field.kind {
            FieldKind::Number => {
                let Ok(number) = text.parse::<f64>() else {
                    return Some("Enter a number".to_string());
                };
                if let Some(min) = field.min {
                    if number < min {
                        return Some(format!("Must be at least {min}"));
                    }
                }
                if let Some(max) = field.max {
                    if number > max {
                        return Some(format!("Must be at most {max}"));
                    }
                }
            }
            FieldKind::Select => {
                if !field.options.iter().any(|o| o == text) {
                    return Some("Choose one of the listed options".to_string());
                }
            }
            FieldKind::Text | FieldKind::Toggle => {}
        }

        let pattern = self
            .patterns
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, regex)| regex);
        if let Some(regex) = pattern {
            if !regex.is_match(text) {
                return Some("Invalid format".to_string());
            }
        }

        None
    }
}
