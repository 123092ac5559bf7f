//! Database connection pool management

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection as _, PgPool};

use crate::{
    bootstrap::{Bootstrapper, Connector},
    config::DatabaseConfig,
    error::{DatabaseError, DatabaseOperation, Result},
};

/// Opens PostgreSQL pools from a [`DatabaseConfig`]
pub struct PgConnector {
    config: DatabaseConfig,
}

impl PgConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgPool;

    async fn connect(&self) -> std::result::Result<PgPool, DatabaseError> {
        PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.connect_timeout())
            .connect_with(self.config.connect_options())
            .await
            .map_err(|e| {
                DatabaseError::connection_failed(format!(
                    "Failed to connect to database at '{}': {} ({})",
                    self.config.display_url(),
                    categorize_db_error(&e),
                    e
                ))
            })
    }

    async fn ping(&self, pool: &PgPool) -> std::result::Result<(), DatabaseError> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| DatabaseError::from_sqlx(DatabaseOperation::Ping, &e))?;
        conn.ping()
            .await
            .map_err(|e| DatabaseError::from_sqlx(DatabaseOperation::Ping, &e))
    }
}

/// Create the PostgreSQL connection pool, retrying until the configured timeout
///
/// Used once at startup. Failure is fatal to the caller.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::info!("Trying to connect to {}", config.display_url());

    let connector = PgConnector::new(config.clone());
    let mut bootstrapper = Bootstrapper::new(config.retry_interval(), config.bootstrap_timeout())?;
    let pool = bootstrapper.run(&connector).await?;

    tracing::info!(
        "Database connection pool created: max={}",
        config.max_connections
    );
    Ok(pool)
}

/// Categorize database error for better operator guidance
fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "Configuration error",
        Error::Database(_) => "Database error - check credentials and database name",
        Error::Io(_) => "Network I/O error - check connectivity",
        Error::Tls(_) => "TLS/SSL error - check certificate configuration",
        Error::PoolTimedOut => "Connection pool timeout - database may be unreachable",
        Error::PoolClosed => "Connection pool closed",
        _ => "Connection error",
    }
}
