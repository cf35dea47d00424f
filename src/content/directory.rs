//! Content provider reading component documents from a directory

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{ContentError, ContentProvider, StepContent};

/// Resolves `<root>/<component>.yaml`
#[derive(Debug, Clone)]
pub struct DirectoryContentProvider {
    root: PathBuf,
}

impl DirectoryContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a component; `None` if the reference escapes the root
    pub fn path_for(&self, component: &str) -> Option<PathBuf> {
        let relative = Path::new(component);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !confined || component.is_empty() {
            return None;
        }
        Some(self.root.join(format!("{component}.yaml")))
    }
}

#[async_trait]
impl ContentProvider for DirectoryContentProvider {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, component: &str) -> Result<StepContent, ContentError> {
        let path = self
            .path_for(component)
            .ok_or_else(|| ContentError::NotFound(component.to_string()))?;

        let yaml = match tokio::fs::read_to_string(&path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContentError::NotFound(component.to_string()))
            }
            Err(e) => return Err(ContentError::Transport(component.to_string(), e.to_string())),
        };

        StepContent::from_yaml(component, &yaml)
    }
}
