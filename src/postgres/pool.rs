//! PostgreSQL connection pool lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Point-in-time snapshot of pool state.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Connections currently open
    pub size: u32,

    /// Open connections sitting idle
    pub idle: usize,

    /// Whether the pool has been closed
    pub closed: bool,
}

/// Shared PostgreSQL connection pool with managed shutdown.
///
/// The pool is created lazily: no connection is opened until the first
/// query runs. `shutdown` closes it exactly once and waits for in-flight
/// queries to finish; clones share the shutdown state.
pub struct PostgresPool {
    /// The underlying connection pool
    pool: PgPool,

    /// Set by the first shutdown call
    closed: Arc<AtomicBool>,

    /// Connection coordinates without the password (for logging)
    summary: String,
}

impl PostgresPool {
    /// Create a pool from configuration without opening any connections.
    ///
    /// With an idle timeout configured, the driver spawns its eviction task
    /// here, so construction must then happen inside the async runtime.
    pub fn new(config: &DatabaseConfig) -> Self {
        let mut options = PgPoolOptions::new()
            .max_connections(config.max_pool_size)
            // Connections are never recycled by age; only the idle timeout evicts
            .max_lifetime(None)
            .idle_timeout(config.idle_timeout());

        // An unset acquire timeout leaves the driver's default in place
        if let Some(timeout) = config.connect_timeout() {
            options = options.acquire_timeout(timeout);
        }

        let pool = options.connect_lazy_with(config.connect_options());

        tracing::info!(
            database = %config.connection_summary(),
            max_pool_size = config.max_pool_size,
            "PostgreSQL connection pool created"
        );

        Self {
            pool,
            closed: Arc::new(AtomicBool::new(false)),
            summary: config.connection_summary(),
        }
    }

    /// Create a pool from the `PG*` environment variables.
    pub fn from_env() -> Self {
        Self::new(&DatabaseConfig::from_env())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Verify connectivity with a `SELECT 1` round trip.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Point-in-time pool statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            closed: self.pool.is_closed(),
        }
    }

    /// Close the pool and wait for in-flight queries to finish.
    ///
    /// New acquires fail immediately once the close starts. Safe to call
    /// more than once: only the first call touches the pool.
    pub async fn shutdown(&self, signal: Option<&str>) {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("PostgreSQL connection pool already shut down");
            return;
        }

        tracing::info!(
            signal = %signal.unwrap_or("none"),
            database = %self.summary,
            "Shutting down PostgreSQL connection pool"
        );

        self.pool.close().await;

        tracing::info!("PostgreSQL connection pool closed");
    }
}

impl Clone for PostgresPool {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            closed: self.closed.clone(),
            summary: self.summary.clone(),
        }
    }
}
