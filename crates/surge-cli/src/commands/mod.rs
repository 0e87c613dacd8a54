mod bench;
mod invoke;

use clap::Subcommand;

pub use bench::Bench;
pub use invoke::Invoke;

#[derive(Subcommand)]
pub enum Commands {
    /// Fire concurrent workflow executions and report timings
    Bench(Bench),
    /// Start a single workflow execution
    Invoke(Invoke),
}
