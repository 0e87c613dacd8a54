use anyhow::Result;
use clap::Args;

use surge_core::auth::TokenSource;
use surge_core::bench::{run_level, ArgsMode, BenchReport};
use surge_core::config::BenchConfig;
use surge_core::workflows::{WorkflowRef, WorkflowsClient};

#[derive(Args)]
pub struct Bench {
    /// Concurrency levels to run, in order (repeatable)
    #[arg(short, long = "concurrency", default_values_t = vec![5, 10, 50, 100])]
    concurrency: Vec<usize>,

    /// Attach a distinct {"clientId": N} argument to every execution
    #[arg(long, default_value_t = false)]
    with_client_ids: bool,
}

impl Bench {
    pub async fn execute(self) -> Result<()> {
        let config = BenchConfig::from_env()?;
        let workflow = WorkflowRef {
            project: config.project,
            location: config.location,
            workflow: config.workflow,
        };
        let client = WorkflowsClient::new(TokenSource::Gcp);
        let args_mode = if self.with_client_ids {
            ArgsMode::ClientIds
        } else {
            ArgsMode::None
        };

        for concurrency in self.concurrency {
            let report = run_level(&client, &workflow, concurrency, args_mode).await?;
            print_report(&report);
        }

        Ok(())
    }
}

fn print_report(report: &BenchReport) {
    println!("Concurrency: {}", report.concurrency);
    println!("Elapsed Time: {:.2} seconds", report.elapsed.as_secs_f64());
    println!("Total Results: {}", report.outcomes.len());
    if report.failed() > 0 {
        println!("Failed: {}", report.failed());
    }
    println!("{}", "-".repeat(20));
}
