//! Runs against a real PostgreSQL that already has `place_order` installed.
//!
//! Connection settings come from the usual PG* environment variables.
//! Run with `cargo test -- --ignored`.

use clap::Parser;
use order_workload::cli::{Cli, Commands};
use order_workload::commands::{postgresql_provider, run_burst};

#[tokio::test]
#[ignore = "requires a running PostgreSQL with place_order installed"]
async fn test_postgresql_burst() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "order-workload",
        "burst",
        "--workers",
        "2",
        "--orders-per-worker",
        "5",
        "--seed",
        "11",
    ])?;
    let Commands::Burst { args } = cli.command else {
        panic!("expected burst");
    };

    let provider = postgresql_provider(&args.run.connection)?;
    let report = run_burst(provider, &args).await?;

    assert_eq!(report.summary.attempts, 10);
    assert!(report.summary.is_balanced());
    Ok(())
}
