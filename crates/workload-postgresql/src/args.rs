//! CLI argument definitions for the PostgreSQL connection.

use clap::Args;
use std::fmt;

/// Connection arguments, sourced from the standard libpq environment.
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// PostgreSQL host
    #[arg(long = "pg-host", env = "PGHOST", default_value = "localhost")]
    pub host: String,

    /// PostgreSQL port
    #[arg(long = "pg-port", env = "PGPORT", default_value = "5432")]
    pub port: u16,

    /// PostgreSQL user
    #[arg(long = "pg-user", env = "PGUSER")]
    pub user: Option<String>,

    /// PostgreSQL password
    #[arg(long = "pg-password", env = "PGPASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database holding the place_order function
    #[arg(long = "pg-database", env = "PGDATABASE", default_value = "postgres")]
    pub database: String,

    /// Keep up to this many idle sessions for reuse (0 = a new connection per order)
    #[arg(long, default_value = "0")]
    pub pool_size: usize,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}
