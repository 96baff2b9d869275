//! PostgreSQL backing store for the order-workload driver.
//!
//! Provides the connection provider ([`PostgreSQLProvider`]) that the
//! workload runner drives, plus the two read/maintenance helpers the CLI
//! exposes: applying SQL files ([`init`]) and reading summary KPIs
//! ([`kpis`]).

pub mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod init;
pub mod kpis;
pub mod provider;
pub mod session;

pub use args::ConnectionArgs;
pub use config::ConnectionConfig;
pub use error::{classify_error, PostgreSQLStoreError};
pub use provider::PostgreSQLProvider;
pub use session::PostgreSQLSession;
