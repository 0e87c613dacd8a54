use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use rand::seq::index::sample;
use tracing::error;

use crate::error::{SurgeError, SurgeResult};
use crate::workflows::{Execution, WorkflowRef, WorkflowsClient};

/// Range the synthetic client ids are drawn from, without replacement.
pub const CLIENT_ID_RANGE: usize = 1000;

/// Whether each invocation carries a `{"clientId": N}` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsMode {
    None,
    ClientIds,
}

/// One invocation's result, in completion order.
#[derive(Debug)]
pub struct BenchOutcome {
    pub client_id: Option<u32>,
    pub result: SurgeResult<Execution>,
}

#[derive(Debug)]
pub struct BenchReport {
    pub concurrency: usize,
    pub elapsed: Duration,
    pub outcomes: Vec<BenchOutcome>,
}

impl BenchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Fires `concurrency` create-execution calls at once and waits for all of
/// them. One in-flight slot per request, so parallelism is maximal. Outcomes
/// are collected in completion order; a failed invocation becomes an error
/// entry instead of aborting the batch. Elapsed time is measured after the
/// last call completes.
pub async fn run_level(
    client: &WorkflowsClient,
    workflow: &WorkflowRef,
    concurrency: usize,
    args_mode: ArgsMode,
) -> SurgeResult<BenchReport> {
    if concurrency == 0 {
        return Err(SurgeError::Config("concurrency must be at least 1".into()));
    }

    let client_ids = synthetic_client_ids(concurrency, args_mode)?;

    let start = Instant::now();

    let outcomes = stream::iter(client_ids)
        .map(|client_id| async move {
            let argument = client_id.map(|id| format!(r#"{{"clientId": {}}}"#, id));
            let result = client.create_execution(workflow, argument).await;
            if let Err(ref e) = result {
                error!("Execution dispatch failed: {}", e);
            }
            BenchOutcome { client_id, result }
        })
        .buffer_unordered(concurrency)
        .collect::<Vec<_>>()
        .await;

    Ok(BenchReport {
        concurrency,
        elapsed: start.elapsed(),
        outcomes,
    })
}

fn synthetic_client_ids(
    concurrency: usize,
    args_mode: ArgsMode,
) -> SurgeResult<Vec<Option<u32>>> {
    match args_mode {
        ArgsMode::None => Ok(vec![None; concurrency]),
        ArgsMode::ClientIds => {
            if concurrency > CLIENT_ID_RANGE {
                return Err(SurgeError::Config(format!(
                    "cannot sample {} distinct client ids from 0..{}",
                    concurrency, CLIENT_ID_RANGE
                )));
            }
            Ok(sample(&mut rand::thread_rng(), CLIENT_ID_RANGE, concurrency)
                .into_iter()
                .map(|id| Some(id as u32))
                .collect())
        }
    }
}
