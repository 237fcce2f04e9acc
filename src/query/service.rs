//! File-backed query execution service.
//!
//! Query text lives in a directory of SQL files addressed by an opaque
//! identifier. Execution goes through the shared pool, either as a single
//! auto-committed statement or inside an explicit transaction.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{QueryServiceError, Result};
use crate::query::param::SqlParam;
use crate::query::prepare::{build_prepare_script, PrepareParams};
use crate::query::row::row_to_record;

/// Default location of the query file store, relative to the working
/// directory.
pub const DEFAULT_QUERIES_DIR: &str = "../queries";

/// Executes file-backed SQL queries against a shared PostgreSQL pool.
pub struct QueryService {
    /// PostgreSQL connection pool
    pool: PgPool,

    /// Directory containing the query files
    queries_dir: PathBuf,
}

impl QueryService {
    /// Create a service reading queries from the default directory.
    pub fn new(pool: PgPool) -> Self {
        Self::with_queries_dir(pool, DEFAULT_QUERIES_DIR)
    }

    /// Create a service reading queries from a specific directory.
    pub fn with_queries_dir(pool: PgPool, queries_dir: impl AsRef<Path>) -> Self {
        Self {
            pool,
            queries_dir: queries_dir.as_ref().to_path_buf(),
        }
    }

    /// Load the text of a query by identifier.
    ///
    /// The identifier is joined onto the queries directory as-is, with no
    /// validation or sandboxing; callers must not pass untrusted
    /// identifiers.
    pub async fn fetch_query(&self, query_id: &str) -> Result<String> {
        let path = self.queries_dir.join(query_id);

        tracing::debug!(
            query_id = %query_id,
            path = %path.display(),
            "Fetching query text"
        );

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| QueryServiceError::NotFound {
                query_id: query_id.to_string(),
                source,
            })
    }

    /// Execute a query by identifier with positional bind parameters.
    ///
    /// Runs as a single auto-committed statement; the pool borrows and
    /// returns a connection for the call. Returns all result rows as JSON
    /// records.
    pub async fn execute_query(
        &self,
        query_id: &str,
        bind_params: &[SqlParam],
    ) -> Result<Vec<Value>> {
        let sql = self.fetch_query(query_id).await?;

        tracing::debug!(
            query_id = %query_id,
            sql = %sql,
            params = ?bind_params,
            "Executing query"
        );

        let rows = bind_params
            .iter()
            .fold(sqlx::query(&sql), |query, param| param.bind_to(query))
            .fetch_all(&self.pool)
            .await?;

        let records: Vec<Value> = rows.iter().map(row_to_record).collect();

        tracing::debug!(
            query_id = %query_id,
            rows = records.len(),
            "Query executed"
        );

        Ok(records)
    }

    /// Execute a query by identifier inside an explicit transaction.
    ///
    /// One connection is held for the whole call: BEGIN, then the query,
    /// then COMMIT. Any failure after BEGIN triggers a ROLLBACK and the
    /// original error is returned; a failed rollback propagates in its
    /// place. The connection returns to the pool on every path.
    pub async fn execute_query_with_client(
        &self,
        query_id: &str,
        bind_params: &[SqlParam],
    ) -> Result<Vec<Value>> {
        let mut tx = self.pool.begin().await?;

        tracing::debug!(query_id = %query_id, "Transaction started");

        match self.execute_in_transaction(&mut tx, query_id, bind_params).await {
            Ok(records) => {
                tx.commit().await?;
                tracing::debug!(
                    query_id = %query_id,
                    rows = records.len(),
                    "Transaction committed"
                );
                Ok(records)
            }
            Err(err) => {
                tracing::warn!(
                    query_id = %query_id,
                    error = %err,
                    "Rolling back transaction"
                );
                tx.rollback().await.map_err(QueryServiceError::Rollback)?;
                Err(err)
            }
        }
    }

    async fn execute_in_transaction(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        query_id: &str,
        bind_params: &[SqlParam],
    ) -> Result<Vec<Value>> {
        let sql = self.fetch_query(query_id).await?;

        tracing::debug!(
            query_id = %query_id,
            sql = %sql,
            params = ?bind_params,
            "Executing query in transaction"
        );

        let rows = bind_params
            .iter()
            .fold(sqlx::query(&sql), |query, param| param.bind_to(query))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    /// Compose a PREPARE/EXECUTE script for a query by identifier.
    ///
    /// The identifier doubles as the prepared statement name. Returns the
    /// composed SQL text without executing anything; values are
    /// interpolated unescaped (see [`build_prepare_script`]).
    pub async fn prepare_query(
        &self,
        query_id: &str,
        prepare_params: &PrepareParams,
    ) -> Result<String> {
        let body = self.fetch_query(query_id).await?;
        Ok(build_prepare_script(query_id, &body, prepare_params))
    }
}
