//! Bind parameter values for query execution.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

/// A single bind parameter for a parameterized query.
///
/// The closed set of variants keeps driver binding and literal rendering
/// exhaustive: adding a variant forces every dispatch site to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Text value
    Text(String),
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// Timestamp with time zone
    Timestamp(DateTime<Utc>),
}

impl SqlParam {
    /// Returns true if the parameter is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlParam::Null)
    }

    /// Attach this parameter to a query through driver-side binding.
    ///
    /// `Null` binds as a text-typed null, so a statement placing it in a
    /// non-text slot needs an explicit cast on the placeholder.
    pub fn bind_to<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlParam::Null => query.bind(None::<String>),
            SqlParam::Bool(v) => query.bind(*v),
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Float(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
            SqlParam::Bytes(v) => query.bind(v.clone()),
            SqlParam::Timestamp(v) => query.bind(*v),
        }
    }

    /// Render the parameter as a SQL literal for textual statement
    /// composition.
    ///
    /// Text is wrapped in single quotes with no escaping of the contents,
    /// so this is only safe for trusted values.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlParam::Null => "NULL".to_string(),
            SqlParam::Bool(v) => v.to_string(),
            SqlParam::Int(v) => v.to_string(),
            SqlParam::Float(v) => v.to_string(),
            SqlParam::Text(v) => format!("'{}'", v),
            SqlParam::Bytes(v) => format!("'\\x{}'", hex_encode(v)),
            SqlParam::Timestamp(v) => format!("'{}'", v.to_rfc3339()),
        }
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(i64::from(v))
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Float(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<Vec<u8>> for SqlParam {
    fn from(v: Vec<u8>) -> Self {
        SqlParam::Bytes(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

impl<T> From<Option<T>> for SqlParam
where
    T: Into<SqlParam>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(value) => value.into(),
            None => SqlParam::Null,
        }
    }
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(SqlParam::Null.to_sql_literal(), "NULL");
        assert_eq!(SqlParam::Bool(true).to_sql_literal(), "true");
        assert_eq!(SqlParam::Bool(false).to_sql_literal(), "false");
        assert_eq!(SqlParam::Int(42).to_sql_literal(), "42");
        assert_eq!(SqlParam::Int(-7).to_sql_literal(), "-7");
        assert_eq!(SqlParam::Float(1.5).to_sql_literal(), "1.5");
        assert_eq!(SqlParam::Text("a".to_string()).to_sql_literal(), "'a'");
        assert_eq!(
            SqlParam::Bytes(vec![0xde, 0xad, 0xbe, 0xef]).to_sql_literal(),
            "'\\xdeadbeef'"
        );
    }

    #[test]
    fn test_timestamp_literal_is_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(
            SqlParam::Timestamp(ts).to_sql_literal(),
            "'2024-05-01T10:00:00+00:00'"
        );
    }

    #[test]
    fn test_text_contents_are_not_escaped() {
        // Embedded quotes pass through untouched; validation is on the caller
        let literal = SqlParam::Text("O'Brien".to_string()).to_sql_literal();
        assert_eq!(literal, "'O'Brien'");
    }

    #[test]
    fn test_is_null() {
        assert!(SqlParam::Null.is_null());
        assert!(!SqlParam::Int(0).is_null());
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(SqlParam::from(true), SqlParam::Bool(true));
        assert_eq!(SqlParam::from(5i32), SqlParam::Int(5));
        assert_eq!(SqlParam::from(5i64), SqlParam::Int(5));
        assert_eq!(SqlParam::from(2.5), SqlParam::Float(2.5));
        assert_eq!(SqlParam::from("x"), SqlParam::Text("x".to_string()));
        assert_eq!(
            SqlParam::from(vec![1u8, 2]),
            SqlParam::Bytes(vec![1, 2])
        );
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some(3i64)), SqlParam::Int(3));
    }
}
