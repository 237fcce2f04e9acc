//! Textual PREPARE/EXECUTE script composition.

use super::param::SqlParam;

/// Parameter type names and value rows for a prepared statement script.
#[derive(Debug, Clone, Default)]
pub struct PrepareParams {
    /// Type names in placeholder order ($1, $2, ...)
    pub types: Vec<String>,
    /// One row of values per EXECUTE line
    pub values: Vec<Vec<SqlParam>>,
}

/// Compose a PREPARE statement followed by one EXECUTE line per value row.
///
/// Output shape:
///
/// ```text
/// PREPARE <name> (<types>) AS
/// <body>
/// EXECUTE <name> (<values>)
/// ```
///
/// Values are interpolated as literals with no escaping; the caller is
/// responsible for validating them. Nothing is executed here.
pub fn build_prepare_script(statement_name: &str, body: &str, params: &PrepareParams) -> String {
    let header = format!("PREPARE {} ({}) AS", statement_name, params.types.join(", "));

    let executes: Vec<String> = params
        .values
        .iter()
        .map(|row| {
            let rendered: Vec<String> = row.iter().map(SqlParam::to_sql_literal).collect();
            format!("EXECUTE {} ({})", statement_name, rendered.join(", "))
        })
        .collect();

    [header, body.to_string(), executes.join("\n")].join("\n")
}
