mod pool;

pub use pool::{PoolStats, PostgresPool};
