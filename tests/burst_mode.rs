//! Burst mode driven end to end through the CLI layer with an in-memory store.

use clap::Parser;
use order_workload::cli::{BurstArgs, Cli, Commands};
use order_workload::commands::run_burst;
use workload_core::TransactionFailure;
use workload_runner::testing::{Injected, ScriptedProvider};

fn burst_args(extra: &[&str]) -> BurstArgs {
    let mut argv = vec!["order-workload", "burst", "--skip-preflight", "--output", "json"];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Commands::Burst { args } => args,
        _ => panic!("expected burst"),
    }
}

#[tokio::test]
async fn test_burst_all_succeed() {
    let provider = ScriptedProvider::new();
    let args = burst_args(&["--workers", "4", "--orders-per-worker", "5", "--seed", "1"]);

    let report = run_burst(provider.clone(), &args).await.unwrap();

    assert_eq!(report.summary.attempts, 20);
    assert_eq!(report.summary.successes, 20);
    assert_eq!(report.summary.failures, 0);
    assert!(report.summary.is_balanced());
    assert_eq!(report.tallies.len(), 4);
    assert!(report.tallies.iter().all(|t| t.attempts == 5));

    let stats = provider.stats();
    assert_eq!(stats.committed, 20);
    assert_eq!(stats.opened, stats.released);
    assert_eq!(stats.open_transactions, 0);
}

#[tokio::test]
async fn test_burst_counts_injected_failures() {
    // Attempts 3, 8, 13 fail at place_order, 17 cannot connect.
    let provider = ScriptedProvider::new().with_plan(|attempt| match attempt {
        3 | 8 | 13 => Some(Injected::PlaceOrder(TransactionFailure::InsufficientResource)),
        17 => Some(Injected::Open),
        _ => None,
    });
    let args = burst_args(&["--workers", "4", "--orders-per-worker", "5"]);

    let report = run_burst(provider.clone(), &args).await.unwrap();

    assert_eq!(report.summary.attempts, 20);
    assert_eq!(report.summary.failures, 4);
    assert_eq!(report.summary.successes, 16);
    assert_eq!(report.summary.failure_breakdown.insufficient_resource, 3);
    assert_eq!(report.summary.failure_breakdown.connection, 1);

    let stats = provider.stats();
    assert_eq!(stats.committed, 16);
    assert_eq!(stats.rolled_back, 3);
    assert_eq!(stats.opened, 19);
    assert_eq!(stats.released, 19);
    assert_eq!(stats.open_transactions, 0);
}

#[tokio::test]
async fn test_burst_requests_stay_in_bounds() {
    let provider = ScriptedProvider::new();
    let args = burst_args(&[
        "--workers",
        "3",
        "--orders-per-worker",
        "50",
        "--max-customers",
        "2",
        "--max-products",
        "7",
    ]);

    run_burst(provider.clone(), &args).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 150);
    for request in requests {
        assert!((1..=2).contains(&request.customer_id));
        assert!((1..=7).contains(&request.product_id));
        assert!((1..=3).contains(&request.quantity));
    }
}

#[tokio::test]
async fn test_burst_preflight_failure_is_fatal() {
    let provider = ScriptedProvider::new().with_plan(|_| Some(Injected::Open));
    let mut args = burst_args(&["--workers", "2", "--orders-per-worker", "3"]);
    args.run.skip_preflight = false;

    let err = run_burst(provider.clone(), &args).await.unwrap_err();

    assert!(format!("{err:#}").contains("Preflight"));
    // Nothing beyond the preflight attempt ran.
    assert_eq!(provider.stats().attempts, 1);
}

#[tokio::test]
async fn test_burst_writes_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("burst.json");
    let provider = ScriptedProvider::new();
    let path_arg = path.to_string_lossy().to_string();
    let args = burst_args(&[
        "--workers",
        "2",
        "--orders-per-worker",
        "3",
        "--report-file",
        &path_arg,
    ]);

    run_burst(provider, &args).await.unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["mode"], "burst");
    assert_eq!(value["report"]["summary"]["successes"], 6);
    assert_eq!(value["report"]["tallies"].as_array().unwrap().len(), 2);
}
