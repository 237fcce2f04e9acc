//! Cross-component integration tests
//!
//! These tests exercise configuration, pool lifecycle, and the query
//! service together without a running PostgreSQL server: the pool is
//! lazy, so every path below stays local until a query would actually
//! reach the database.

use std::fs;

use ara_query_service::config::DatabaseConfig;
use ara_query_service::error::QueryServiceError;
use ara_query_service::postgres::PostgresPool;
use ara_query_service::query::{PrepareParams, QueryService, SqlParam};

/// Create a lazy pool plus a service reading from a fresh queries directory
fn create_test_environment() -> TestEnvironment {
    let queries_dir = tempfile::tempdir().unwrap();
    let pool = PostgresPool::new(&DatabaseConfig::default());
    let service = QueryService::with_queries_dir(pool.pool().clone(), queries_dir.path());

    TestEnvironment {
        pool,
        service,
        queries_dir,
    }
}

struct TestEnvironment {
    pool: PostgresPool,
    service: QueryService,
    queries_dir: tempfile::TempDir,
}

impl TestEnvironment {
    fn write_query(&self, query_id: &str, sql: &str) {
        let path = self.queries_dir.path().join(query_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, sql).unwrap();
    }
}

// =============================================================================
// Query Fetch Tests
// =============================================================================

mod fetch_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_exact_file_contents() {
        let env = create_test_environment();
        env.write_query("list_users", "SELECT id, name\nFROM users\nORDER BY id\n");

        let sql = env.service.fetch_query("list_users").await.unwrap();

        assert_eq!(sql, "SELECT id, name\nFROM users\nORDER BY id\n");
    }

    #[tokio::test]
    async fn test_fetch_resolves_nested_identifiers() {
        // Identifiers are joined verbatim, so path separators reach into
        // subdirectories
        let env = create_test_environment();
        env.write_query("reports/daily", "SELECT 1");

        let sql = env.service.fetch_query("reports/daily").await.unwrap();

        assert_eq!(sql, "SELECT 1");
    }

    #[tokio::test]
    async fn test_fetch_unknown_identifier_is_not_found() {
        let env = create_test_environment();

        let err = env.service.fetch_query("missing").await.unwrap_err();

        assert!(matches!(err, QueryServiceError::NotFound { .. }));
        assert!(err.to_string().contains("missing"));
    }
}

// =============================================================================
// Prepare Script Tests
// =============================================================================

mod prepare_tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_builds_expected_script() {
        let env = create_test_environment();
        env.write_query("q1", "SELECT $1, $2");

        let params = PrepareParams {
            types: vec!["int".to_string(), "text".to_string()],
            values: vec![
                vec![SqlParam::Int(1), SqlParam::Text("a".to_string())],
                vec![SqlParam::Int(2), SqlParam::Text("b".to_string())],
            ],
        };

        let script = env.service.prepare_query("q1", &params).await.unwrap();

        assert_eq!(
            script,
            "PREPARE q1 (int, text) AS\nSELECT $1, $2\nEXECUTE q1 (1, 'a')\nEXECUTE q1 (2, 'b')"
        );
    }

    #[tokio::test]
    async fn test_prepare_with_mixed_value_types() {
        let env = create_test_environment();
        env.write_query("mixed", "INSERT INTO events VALUES ($1, $2, $3)");

        let params = PrepareParams {
            types: vec![
                "bigint".to_string(),
                "boolean".to_string(),
                "text".to_string(),
            ],
            values: vec![vec![
                SqlParam::Int(10),
                SqlParam::Bool(false),
                SqlParam::Null,
            ]],
        };

        let script = env.service.prepare_query("mixed", &params).await.unwrap();

        assert_eq!(
            script,
            "PREPARE mixed (bigint, boolean, text) AS\nINSERT INTO events VALUES ($1, $2, $3)\nEXECUTE mixed (10, false, NULL)"
        );
    }
}

// =============================================================================
// Shutdown Lifecycle Tests
// =============================================================================

mod shutdown_tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_rejects_later_queries() {
        let env = create_test_environment();
        env.write_query("ping", "SELECT 1");

        env.pool.shutdown(Some("SIGTERM")).await;

        // Fails promptly instead of hanging on a dead pool
        let err = env.service.execute_query("ping", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            QueryServiceError::Database(sqlx::Error::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_transactional_queries() {
        let env = create_test_environment();
        env.write_query("ping", "SELECT 1");

        env.pool.shutdown(Some("SIGINT")).await;

        let err = env
            .service
            .execute_query_with_client("ping", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QueryServiceError::Database(sqlx::Error::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_repeated_shutdown_is_harmless() {
        let env = create_test_environment();

        env.pool.shutdown(Some("SIGTERM")).await;
        env.pool.shutdown(None).await;
        env.pool.shutdown(Some("SIGTERM")).await;

        assert!(env.pool.stats().closed);
    }

    #[tokio::test]
    async fn test_fetch_still_works_after_shutdown() {
        // Fetching touches only the filesystem, not the pool
        let env = create_test_environment();
        env.write_query("ping", "SELECT 1");

        env.pool.shutdown(Some("SIGTERM")).await;

        let sql = env.service.fetch_query("ping").await.unwrap();
        assert_eq!(sql, "SELECT 1");
    }
}
