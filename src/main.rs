//! Command-line interface for order-workload
//!
//! # Usage Examples
//!
//! ```bash
//! # Apply schema, seed data and functions
//! order-workload init --sql-dir sql
//!
//! # 4 workers x 250 orders
//! PGUSER=app PGPASSWORD=secret order-workload burst --workers 4 --orders-per-worker 250
//!
//! # 10 orders every 20 seconds until Ctrl+C
//! order-workload continuous --batch-size 10 --interval 20s
//!
//! # Dashboard numbers for the last 15 minutes
//! order-workload kpis --window-minutes 15 --category books,games
//! ```

use clap::Parser;
use order_workload::cli::{Cli, Commands};
use order_workload::commands;
use workload_runner::ctrl_c_shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the reports
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Burst { args } => {
            let provider = commands::postgresql_provider(&args.run.connection)?;
            commands::run_burst(provider, &args).await?;
        }
        Commands::Continuous { args } => {
            let provider = commands::postgresql_provider(&args.run.connection)?;
            commands::run_continuous(provider, &args, ctrl_c_shutdown()).await?;
        }
        Commands::Init { args } => {
            commands::run_init(&args).await?;
        }
        Commands::Kpis { args } => {
            commands::run_kpis(&args).await?;
        }
    }

    Ok(())
}
