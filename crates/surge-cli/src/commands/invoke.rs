use anyhow::Result;
use clap::Args;

use surge_core::auth::TokenSource;
use surge_core::config::BenchConfig;
use surge_core::workflows::{WorkflowRef, WorkflowsClient};

#[derive(Args)]
pub struct Invoke {
    /// Attach {"clientId": N} as the execution argument
    #[arg(long)]
    client_id: Option<u32>,
}

impl Invoke {
    pub async fn execute(self) -> Result<()> {
        let config = BenchConfig::from_env()?;
        let workflow = WorkflowRef {
            project: config.project,
            location: config.location,
            workflow: config.workflow,
        };
        let client = WorkflowsClient::new(TokenSource::Gcp);
        let argument = self
            .client_id
            .map(|id| format!(r#"{{"clientId": {}}}"#, id));

        let execution = client.create_execution(&workflow, argument).await?;

        println!("✓ Started execution: {}", execution.name);
        if let Some(state) = execution.state {
            println!("  State: {}", state);
        }
        Ok(())
    }
}
