//! Validated connection configuration.

use crate::args::ConnectionArgs;
use crate::error::PostgreSQLStoreError;
use std::fmt;

const APPLICATION_NAME: &str = "order-workload";

/// Everything needed to open a session, checked once up front.
#[derive(Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    database: String,
}

impl ConnectionConfig {
    /// Build a configuration, rejecting values that can never connect.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: Option<String>,
        password: Option<String>,
        database: impl Into<String>,
    ) -> Result<Self, PostgreSQLStoreError> {
        let host = host.into();
        let database = database.into();

        if host.trim().is_empty() {
            return Err(PostgreSQLStoreError::Config(
                "PGHOST must not be empty".to_string(),
            ));
        }
        if port == 0 {
            return Err(PostgreSQLStoreError::Config(
                "PGPORT must be a non-zero port".to_string(),
            ));
        }
        let user = match user {
            Some(user) if !user.trim().is_empty() => user,
            _ => {
                return Err(PostgreSQLStoreError::Config(
                    "PGUSER is not set".to_string(),
                ))
            }
        };
        if database.trim().is_empty() {
            return Err(PostgreSQLStoreError::Config(
                "PGDATABASE must not be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
        })
    }

    pub fn from_args(args: &ConnectionArgs) -> Result<Self, PostgreSQLStoreError> {
        Self::new(
            args.host.clone(),
            args.port,
            args.user.clone(),
            args.password.clone(),
            args.database.clone(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// The tokio-postgres configuration for this endpoint.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.database)
            .application_name(APPLICATION_NAME);
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }

    /// Endpoint description safe to log (no password).
    pub fn describe(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}
