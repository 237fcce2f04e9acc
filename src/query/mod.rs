//! Query loading, parameter binding, and execution.

mod param;
mod prepare;
mod row;
mod service;

pub use param::SqlParam;
pub use prepare::{build_prepare_script, PrepareParams};
pub use row::row_to_record;
pub use service::{QueryService, DEFAULT_QUERIES_DIR};
