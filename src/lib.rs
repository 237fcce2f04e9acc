// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod postgres;

// Domain layer (query execution)
pub mod query;

// Re-export the primary types at the crate root
pub use config::DatabaseConfig;
pub use error::{QueryServiceError, Result};
pub use postgres::{PoolStats, PostgresPool};
pub use query::{PrepareParams, QueryService, SqlParam};
