//! Subcommand implementations.
//!
//! The run modes are generic over [`SessionProvider`] so they can be driven
//! by the PostgreSQL provider in production and by an in-memory provider in
//! tests.

use crate::cli::{BurstArgs, ContinuousArgs, InitArgs, KpisArgs, OutputFormat, RunArgs};
use crate::report;
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use workload_core::SessionProvider;
use workload_postgresql::init::{apply_sql_files, collect_sql_files};
use workload_postgresql::kpis::{fetch_summary_kpis, SummaryKpis};
use workload_postgresql::{client, ConnectionArgs, ConnectionConfig, PostgreSQLProvider};
use workload_runner::{
    BurstReport, ContinuousReport, PacedScheduler, Shutdown, UnitOfWorkExecutor, WorkerPool,
};

/// Build the PostgreSQL provider from the connection flags.
pub fn postgresql_provider(args: &ConnectionArgs) -> anyhow::Result<PostgreSQLProvider> {
    let config = ConnectionConfig::from_args(args).context("Invalid PostgreSQL configuration")?;
    info!(
        "Using PostgreSQL at {} (pool size {})",
        config.describe(),
        args.pool_size
    );
    Ok(PostgreSQLProvider::new(config).with_pool_size(args.pool_size))
}

async fn prepare<P: SessionProvider>(
    provider: P,
    run: &RunArgs,
) -> anyhow::Result<Arc<UnitOfWorkExecutor<P>>> {
    let executor = Arc::new(UnitOfWorkExecutor::new(provider));
    if run.skip_preflight {
        info!("Skipping preflight connection check");
    } else {
        executor.preflight().await.map_err(|e| {
            error!("{e}");
            e
        })?;
    }
    Ok(executor)
}

/// Run one burst and print its summary.
pub async fn run_burst<P: SessionProvider + 'static>(
    provider: P,
    args: &BurstArgs,
) -> anyhow::Result<BurstReport> {
    let config = args.to_config()?;
    let executor = prepare(provider, &args.run).await?;
    let pool = WorkerPool::new(executor, config)?;

    if args.run.output == OutputFormat::Table {
        println!(
            "{}",
            report::burst_banner(args.workers, args.orders_per_worker)
        );
    }

    let burst = pool.run().await?;

    match args.run.output {
        OutputFormat::Table => print!("{}", report::format_burst_table(&burst)),
        OutputFormat::Json => println!("{}", report::to_json(&burst)?),
    }

    if let Some(path) = &args.run.report_file {
        report::write_report_file(path, "burst", &burst)?;
        info!("Report written to {:?}", path);
    }

    Ok(burst)
}

/// Run paced batches until `shutdown` fires or the batch limit is hit.
pub async fn run_continuous<P: SessionProvider>(
    provider: P,
    args: &ContinuousArgs,
    shutdown: Shutdown,
) -> anyhow::Result<ContinuousReport> {
    let config = args.to_config()?;
    let executor = prepare(provider, &args.run).await?;
    let scheduler = PacedScheduler::new(executor, config)?;
    let output = args.run.output;

    let continuous = scheduler
        .run(shutdown, |batch| match output {
            OutputFormat::Table => println!("{}", report::format_batch_line(batch)),
            OutputFormat::Json => match serde_json::to_string(batch) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Failed to serialize batch {}: {e}", batch.batch),
            },
        })
        .await;

    match output {
        OutputFormat::Table => print!("{}", report::format_continuous_summary(&continuous)),
        OutputFormat::Json => println!("{}", report::to_json(&continuous)?),
    }

    if let Some(path) = &args.run.report_file {
        report::write_report_file(path, "continuous", &continuous)?;
        info!("Report written to {:?}", path);
    }

    Ok(continuous)
}

/// Apply the SQL files of `args.sql_dir` in name order.
pub async fn run_init(args: &InitArgs) -> anyhow::Result<usize> {
    let config =
        ConnectionConfig::from_args(&args.connection).context("Invalid PostgreSQL configuration")?;
    let files = collect_sql_files(&args.sql_dir)
        .with_context(|| format!("Failed to read SQL files from {:?}", args.sql_dir))?;

    let mut client = client::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.describe()))?;
    let applied = apply_sql_files(&mut client, &files)
        .await
        .context("Failed to apply SQL files")?;

    println!("Applied {applied} SQL files to {}", config.describe());
    Ok(applied)
}

/// Print the summary KPIs for the configured window.
pub async fn run_kpis(args: &KpisArgs) -> anyhow::Result<SummaryKpis> {
    let config =
        ConnectionConfig::from_args(&args.connection).context("Invalid PostgreSQL configuration")?;
    let client = client::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.describe()))?;

    let kpis = fetch_summary_kpis(&client, args.window_minutes, &args.categories)
        .await
        .context("Failed to query fn_summary_kpis")?;

    match args.output {
        OutputFormat::Table => println!("{}", report::format_kpis_table(&kpis, args.window_minutes)),
        OutputFormat::Json => println!("{}", report::to_json(&kpis)?),
    }
    Ok(kpis)
}
