use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::auth::TokenSource;
use crate::error::{SurgeError, SurgeResult};

const DEFAULT_BASE_URL: &str = "https://workflowexecutions.googleapis.com";

/// Fully qualified reference to one deployed workflow.
#[derive(Debug, Clone)]
pub struct WorkflowRef {
    pub project: String,
    pub location: String,
    pub workflow: String,
}

impl WorkflowRef {
    pub fn path(&self) -> String {
        format!(
            "projects/{}/locations/{}/workflows/{}",
            self.project, self.location, self.workflow
        )
    }
}

/// Opaque handle for one accepted execution. Nothing beyond `name` is
/// inspected downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Execution {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

pub struct WorkflowsClient {
    client: Client,
    base_url: String,
    token_source: TokenSource,
}

impl WorkflowsClient {
    pub fn new(token_source: TokenSource) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_source,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Starts one execution of `workflow`, optionally carrying a JSON text
    /// argument. Exactly one POST, no retry; calling again starts a second,
    /// independent execution.
    pub async fn create_execution(
        &self,
        workflow: &WorkflowRef,
        argument: Option<String>,
    ) -> SurgeResult<Execution> {
        let token = self.token_source.token().await?;
        let url = format!("{}/v1/{}/executions", self.base_url, workflow.path());

        let body = match argument {
            Some(argument) => json!({ "argument": argument }),
            None => json!({}),
        };

        debug!("Creating execution for {}", workflow.path());

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SurgeError::Remote {
                service: "workflow executions",
                status,
                message,
            });
        }

        let execution: Execution = response.json().await?;
        info!("Started workflow execution: {}", execution.name);
        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_path_matches_resource_format() {
        let workflow = WorkflowRef {
            project: "demo".to_string(),
            location: "northamerica-south1".to_string(),
            workflow: "workflow-alloydb-run".to_string(),
        };
        assert_eq!(
            workflow.path(),
            "projects/demo/locations/northamerica-south1/workflows/workflow-alloydb-run"
        );
    }
}
