//! Content provider fetching component documents over HTTP

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::{ContentError, ContentProvider, StepContent};

/// Fetches `<base_url>/<component>.yaml`
#[derive(Debug, Clone)]
pub struct HttpContentProvider {
    client: Client,
    base_url: String,
}

impl HttpContentProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Transport(base_url.to_string(), e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, component: &str) -> String {
        format!(
            "{}/{}.yaml",
            self.base_url,
            component.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentProvider for HttpContentProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, component: &str) -> Result<StepContent, ContentError> {
        let url = self.url_for(component);
        tracing::debug!(url = %url, "Fetching step component");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ContentError::Transport(component.to_string(), e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ContentError::NotFound(component.to_string())),
            status if !status.is_success() => {
                return Err(ContentError::Transport(
                    component.to_string(),
                    format!("HTTP error! status: {}", status.as_u16()),
                ))
            }
            _ => {}
        }

        let yaml = response
            .text()
            .await
            .map_err(|e| ContentError::Transport(component.to_string(), e.to_string()))?;

        StepContent::from_yaml(component, &yaml)
    }
}
