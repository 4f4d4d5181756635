//! JSON loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order; keys missing
//! from a row become nulls. Column types are inferred from the JSON values
//! (ISO date/time strings are recognized as timestamps); nested arrays and
//! objects are stringified as text.

use std::fs;
use std::path::Path;

use serde_json::Value as Json;

use crate::error::{ImportError, ImportResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::infer::parse_timestamp;

/// Load JSON into a typed [`DataSet`].
pub fn load_json_from_path(path: impl AsRef<Path>) -> ImportResult<DataSet> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load JSON from an in-memory string.
pub fn load_json_from_str(input: &str) -> ImportResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ImportError::invalid("json input is empty"));
    }

    // First try parsing as a single JSON value (array or object), then fall
    // back to NDJSON.
    let objects: Vec<Json> = if let Ok(v) = serde_json::from_str::<Json>(trimmed) {
        match v {
            Json::Array(items) => items,
            obj @ Json::Object(_) => vec![obj],
            _ => {
                return Err(ImportError::invalid(
                    "json must be an object, an array of objects, or NDJSON",
                ));
            }
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<Json>(line).map_err(|e| {
                ImportError::invalid(format!("invalid ndjson at line {}: {}", i + 1, e))
            })?;
            values.push(v);
        }
        values
    };

    build_dataset(&objects)
}

fn build_dataset(objects: &[Json]) -> ImportResult<DataSet> {
    // Union of keys, first-seen order.
    let mut columns: Vec<String> = Vec::new();
    for (idx0, v) in objects.iter().enumerate() {
        let obj = v
            .as_object()
            .ok_or_else(|| ImportError::invalid(format!("row {} is not a json object", idx0 + 1)))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut fields = Vec::with_capacity(columns.len());
    for name in &columns {
        let dt = infer_json_column(objects.iter().filter_map(|v| v.get(name)));
        fields.push(Field::new(name.clone(), dt));
    }
    let schema = Schema::new(fields);

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(objects.len());
    for v in objects {
        let mut row = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let cell = v.get(&field.name).unwrap_or(&Json::Null);
            row.push(convert_json_value(field.data_type, cell));
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

fn infer_json_column<'a, I>(cells: I) -> DataType
where
    I: Iterator<Item = &'a Json>,
{
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut all_ts = true;

    for v in cells {
        if v.is_null() {
            continue;
        }
        any = true;
        all_int = all_int && v.as_i64().is_some();
        all_float = all_float && v.as_f64().is_some();
        all_bool = all_bool && v.is_boolean();
        all_ts = all_ts
            && v.as_str().map(|s| parse_timestamp(s.trim()).is_some()).unwrap_or(false);
        if !(all_int || all_float || all_bool || all_ts) {
            return DataType::Utf8;
        }
    }

    if !any {
        return DataType::Utf8;
    }
    if all_int {
        DataType::Int64
    } else if all_float {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else if all_ts {
        DataType::Timestamp
    } else {
        DataType::Utf8
    }
}

fn convert_json_value(data_type: DataType, v: &Json) -> Value {
    if v.is_null() {
        return Value::Null;
    }

    match data_type {
        // Inference guarantees these conversions succeed for non-null cells.
        DataType::Int64 => v.as_i64().map(Value::Int64).unwrap_or(Value::Null),
        DataType::Float64 => v.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        DataType::Bool => v.as_bool().map(Value::Bool).unwrap_or(Value::Null),
        DataType::Timestamp => v
            .as_str()
            .and_then(|s| parse_timestamp(s.trim()))
            .map(Value::Timestamp)
            .unwrap_or(Value::Null),
        DataType::Utf8 => match v {
            Json::String(s) => Value::Utf8(s.clone()),
            other => Value::Utf8(other.to_string()),
        },
    }
}
