//! Column type inference for text-based formats.
//!
//! CSV cells (and Excel/JSON string cells) carry no type information, so the
//! loader infers one [`DataType`] per column before any row is converted.
//! Candidate types are tried in a fixed order (integer, float, bool,
//! timestamp) and a column only gets a type if *every* non-empty cell parses
//! as it; anything else falls back to text.
//!
//! Empty cells become [`Value::Null`] and do not vote.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ImportError, ImportResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Infer the [`DataType`] of a column from its raw cells.
///
/// A column of only empty cells is text.
pub fn infer_column_type<'a, I>(cells: I) -> DataType
where
    I: Iterator<Item = &'a str>,
{
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut all_ts = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        any = true;
        all_int = all_int && cell.parse::<i64>().is_ok();
        all_float = all_float && cell.parse::<f64>().is_ok();
        all_bool = all_bool && parse_bool(cell).is_ok();
        all_ts = all_ts && parse_timestamp(cell).is_some();
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

/// Build a typed [`DataSet`] from raw string cells.
///
/// `rows` may be ragged; short rows are padded with nulls to the header
/// width, matching how dataframe readers fill missing trailing fields.
pub fn dataset_from_strings(
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
) -> ImportResult<DataSet> {
    let mut fields = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let dt = infer_column_type(rows.iter().filter_map(|r| r.get(idx).map(String::as_str)));
        fields.push(Field::new(name.clone(), dt));
    }
    let schema = Schema::new(fields);

    let mut out_rows: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for (row_idx0, row) in rows.iter().enumerate() {
        // Report 1-based row number; +1 again because the header is row 1.
        let user_row = row_idx0 + 2;
        let mut out = Vec::with_capacity(schema.fields.len());
        for (idx, field) in schema.fields.iter().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            out.push(typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        out_rows.push(out);
    }

    Ok(DataSet::new(schema, out_rows))
}

/// Convert one raw cell into a [`Value`] of the inferred type.
pub fn typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> ImportResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().map(Value::Int64).map_err(|e| {
            ImportError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Float64 => trimmed.parse::<f64>().map(Value::Float64).map_err(|e| {
            ImportError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(|message| {
            ImportError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message,
            }
        }),
        DataType::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp).ok_or_else(|| {
            ImportError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: "expected date/time".to_string(),
            }
        }),
    }
}

pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" => Ok(true),
        "false" | "f" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/yes/no)".to_string()),
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
