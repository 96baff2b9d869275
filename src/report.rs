//! Operator-facing output for burst, continuous and KPI runs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use std::fs;
use std::path::Path;
use workload_core::RunSummary;
use workload_postgresql::kpis::SummaryKpis;
use workload_runner::{BatchReport, BurstReport, ContinuousReport, StopReason};

/// Envelope written by `--report-file`.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a, T: Serialize> {
    pub mode: &'static str,
    pub generated_at: DateTime<Utc>,
    pub report: &'a T,
}

/// Write `report` as pretty JSON, wrapped with the mode and a timestamp.
pub fn write_report_file<T: Serialize>(path: &Path, mode: &'static str, report: &T) -> Result<()> {
    let envelope = ReportEnvelope {
        mode,
        generated_at: Utc::now(),
        report,
    };
    let json = serde_json::to_string_pretty(&envelope).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {path:?}"))?;
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}

/// The announcement printed before a burst starts.
pub fn burst_banner(workers: usize, orders_per_worker: u64) -> String {
    format!(
        "Starting workload: {} orders ({} per worker, {} workers).",
        workers as u64 * orders_per_worker,
        orders_per_worker,
        workers
    )
}

/// Plain summary lines for a finished burst.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Elapsed time: {:.2} seconds\n", summary.elapsed_seconds));
    output.push_str(&format!("Successful orders: {}\n", summary.successes));
    output.push_str(&format!("Failed orders: {}\n", summary.failures));
    output.push_str(&format!("Throughput: {}\n", summary.throughput));

    let breakdown = summary.failure_breakdown.non_zero();
    if !breakdown.is_empty() {
        output.push_str("Failures by kind:\n");
        for (kind, count) in breakdown {
            output.push_str(&format!("  {kind}: {}\n", format_number(count)));
        }
    }
    output
}

/// Burst summary followed by a per-worker table.
pub fn format_burst_table(report: &BurstReport) -> String {
    let mut output = String::from("Workload complete.\n");
    output.push_str(&format_summary(&report.summary));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Worker", "Attempts", "Successes", "Failures", "Status"]);

    for tally in &report.tallies {
        let status_cell = if tally.failures == 0 {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new("FAILURES").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(tally.worker_id),
            Cell::new(format_number(tally.attempts)),
            Cell::new(format_number(tally.successes)),
            Cell::new(format_number(tally.failures)),
            status_cell,
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(report.summary.attempts)),
        Cell::new(format_number(report.summary.successes)),
        Cell::new(format_number(report.summary.failures)),
        Cell::new(format_duration(report.summary.elapsed_seconds)),
    ]);

    output.push('\n');
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// One line per finished batch.
pub fn format_batch_line(report: &BatchReport) -> String {
    let mut line = format!(
        "Batch {} complete. successes={}, failures={}",
        report.batch, report.summary.successes, report.summary.failures
    );
    if report.interrupted {
        line.push_str(&format!(
            " (interrupted after {} of {})",
            report.summary.attempts, report.requested
        ));
    }
    line
}

pub fn format_continuous_summary(report: &ContinuousReport) -> String {
    let mut output = String::new();
    match report.stop_reason {
        StopReason::Shutdown => output.push_str("Stopping continuous ingestion.\n"),
        StopReason::BatchLimit => output.push_str("Batch limit reached.\n"),
    }
    output.push_str(&format!(
        "Batches: {}  Duration: {}\n",
        report.batches,
        format_duration(report.totals.elapsed_seconds)
    ));
    output.push_str(&format_summary(&report.totals));
    output
}

pub fn format_kpis_table(kpis: &SummaryKpis, window_minutes: i32) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["KPI", "Value"]);
    let window = format!("last {window_minutes}m");

    let rows: Vec<(String, String)> = vec![
        ("Total orders".into(), format_number(kpis.total_orders.max(0) as u64)),
        ("Total revenue".into(), format!("{:.2}", kpis.total_revenue)),
        (format!("Orders ({window})"), format_number(kpis.orders_window.max(0) as u64)),
        (format!("Revenue ({window})"), format!("{:.2}", kpis.revenue_window)),
        (
            format!("Active customers ({window})"),
            format_number(kpis.active_customers_window.max(0) as u64),
        ),
        ("Avg order value".into(), format!("{:.2}", kpis.avg_order_value_all)),
        (format!("Avg order value ({window})"), format!("{:.2}", kpis.avg_order_value_window)),
        (format!("Orders/min ({window})"), format!("{:.2}", kpis.orders_per_min_window)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    table.to_string()
}

/// Format duration in human-readable format.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
