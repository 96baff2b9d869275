//! Command-line definitions.

use crate::duration::parse_duration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use workload_core::OrderBounds;
use workload_postgresql::ConnectionArgs;
use workload_runner::{BurstConfig, ContinuousConfig};

#[derive(Parser)]
#[command(name = "order-workload")]
#[command(about = "Drive place_order transactions against PostgreSQL")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Place a fixed number of orders across a pool of concurrent workers
    Burst {
        #[command(flatten)]
        args: BurstArgs,
    },

    /// Place orders in paced batches until interrupted
    Continuous {
        #[command(flatten)]
        args: ContinuousArgs,
    },

    /// Apply the *.sql files of a directory to the database, in name order
    Init {
        #[command(flatten)]
        args: InitArgs,
    },

    /// Print the summary KPIs reported by fn_summary_kpis
    Kpis {
        #[command(flatten)]
        args: KpisArgs,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Ranges the random order fields are drawn from.
#[derive(Args, Debug, Clone)]
pub struct BoundsArgs {
    /// Customer ids are drawn from 1..=max-customers
    #[arg(long, default_value = "10")]
    pub max_customers: i32,

    /// Product ids are drawn from 1..=max-products
    #[arg(long, default_value = "10")]
    pub max_products: i32,
}

impl BoundsArgs {
    pub fn to_bounds(&self) -> anyhow::Result<OrderBounds> {
        Ok(OrderBounds::new(self.max_customers, self.max_products)?)
    }
}

/// Options shared by both run modes.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub bounds: BoundsArgs,

    /// Base seed for reproducible order streams (default: OS entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not open a test session before starting
    #[arg(long)]
    pub skip_preflight: bool,

    /// Output format for the final summary
    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Also write the final report as JSON to this file
    #[arg(long)]
    pub report_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BurstArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Number of concurrent workers
    #[arg(long, default_value = "4")]
    pub workers: usize,

    /// Orders each worker places
    #[arg(long, default_value = "250")]
    pub orders_per_worker: u64,
}

impl BurstArgs {
    pub fn to_config(&self) -> anyhow::Result<BurstConfig> {
        if self.workers == 0 {
            anyhow::bail!("--workers must be at least 1");
        }
        Ok(BurstConfig {
            workers: self.workers,
            orders_per_worker: self.orders_per_worker,
            bounds: self.run.bounds.to_bounds()?,
            seed: self.run.seed,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct ContinuousArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Pause between batches (e.g. 20, 20s, 500ms, 5m)
    #[arg(long, default_value = "20s", value_parser = parse_duration)]
    pub interval: Duration,

    /// Orders per batch
    #[arg(long, default_value = "10")]
    pub batch_size: u64,

    /// Stop after this many batches (default: run until Ctrl+C)
    #[arg(long)]
    pub max_batches: Option<u64>,
}

impl ContinuousArgs {
    pub fn to_config(&self) -> anyhow::Result<ContinuousConfig> {
        if self.batch_size == 0 {
            anyhow::bail!("--batch-size must be at least 1");
        }
        if self.max_batches == Some(0) {
            anyhow::bail!("--max-batches must be at least 1");
        }
        Ok(ContinuousConfig {
            batch_size: self.batch_size,
            interval: self.interval,
            bounds: self.run.bounds.to_bounds()?,
            seed: self.run.seed,
            max_batches: self.max_batches,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Directory holding the *.sql files to apply
    #[arg(long, default_value = "sql")]
    pub sql_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct KpisArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Size of the recent window, in minutes
    #[arg(long, default_value = "10")]
    pub window_minutes: i32,

    /// Restrict to these product categories (comma separated, default: all)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}
