mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::Commands;

#[derive(Parser)]
#[command(name = "surge")]
#[command(about = "Load driver for Cloud Workflows executions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    // A global subscriber may already be installed when invoked from tests.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench(cmd) => cmd.execute().await?,
        Commands::Invoke(cmd) => cmd.execute().await?,
    }

    Ok(())
}
