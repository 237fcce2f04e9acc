use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryServiceError {
    #[error("Query not found: {query_id}")]
    NotFound {
        query_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Rollback failed: {0}")]
    Rollback(#[source] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, QueryServiceError>;
