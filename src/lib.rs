//! order-workload: a transactional `place_order` workload driver for
//! PostgreSQL.
//!
//! The binary exposes two run modes, `burst` and `continuous`, plus the
//! `init` and `kpis` helpers. The run modes live in [`commands`] and are
//! generic over the store, so tests drive them with
//! [`workload_runner::testing::ScriptedProvider`].

pub mod cli;
pub mod commands;
pub mod duration;
pub mod report;

pub use workload_core;
pub use workload_postgresql;
pub use workload_runner;
