//! Result row conversion to JSON records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, ValueRef};
use uuid::Uuid;

use super::param::hex_encode;

/// Convert a result row into a JSON object keyed by column name.
///
/// The common PostgreSQL scalar types are decoded directly; an
/// undecodable column becomes JSON null rather than failing the row.
pub fn row_to_record(row: &PgRow) -> Value {
    let mut record = serde_json::Map::new();

    for (index, column) in row.columns().iter().enumerate() {
        record.insert(column.name().to_string(), column_to_json(row, index));
    }

    Value::Object(record)
}

fn column_to_json(row: &PgRow, index: usize) -> Value {
    if let Ok(raw) = row.try_get_raw(index) {
        if raw.is_null() {
            return Value::Null;
        }
    }

    if let Ok(v) = row.try_get::<String, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<i16, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<i32, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<i64, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<f32, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<f64, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<bool, _>(index) {
        json!(v)
    } else if let Ok(v) = row.try_get::<Uuid, _>(index) {
        json!(v.to_string())
    } else if let Ok(v) = row.try_get::<DateTime<Utc>, _>(index) {
        json!(v.to_rfc3339())
    } else if let Ok(v) = row.try_get::<NaiveDateTime, _>(index) {
        json!(v.to_string())
    } else if let Ok(v) = row.try_get::<NaiveDate, _>(index) {
        json!(v.to_string())
    } else if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        json!(format!("\\x{}", hex_encode(&v)))
    } else if let Ok(v) = row.try_get::<Value, _>(index) {
        v
    } else {
        Value::Null
    }
}
