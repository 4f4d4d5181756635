#![cfg(feature = "excel")]

//! Excel loading (`.xlsx`, `.xls`).
//!
//! Reads one sheet (the first, or a named one), takes the first non-empty
//! row as the header, and infers column types from the cell variants below
//! it. Excel serial date/times and ISO strings both map to the timestamp
//! type.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{ImportError, ImportResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::infer::parse_timestamp;

/// Load an Excel sheet into a typed [`DataSet`].
///
/// Picks `sheet_name` if provided, otherwise the first sheet in the workbook.
pub fn load_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> ImportResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::invalid("workbook has no sheets"))?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    load_sheet_range(&range)
}

fn load_sheet_range(range: &calamine::Range<Data>) -> ImportResult<DataSet> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| ImportError::invalid("sheet has no non-empty rows (no header row found)"))?;

    let columns: Vec<String> = range
        .rows()
        .nth(header_row_idx)
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();

    let data_rows: Vec<&[Data]> = range.rows().skip(header_row_idx + 1).collect();

    let mut fields = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let dt = infer_excel_column(data_rows.iter().map(|r| r.get(idx).unwrap_or(&Data::Empty)));
        fields.push(Field::new(name.clone(), dt));
    }
    let schema = Schema::new(fields);

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(data_rows.len());
    for (idx0, row) in data_rows.iter().enumerate() {
        // Report 1-based, Excel-like row numbers.
        let user_row = header_row_idx + idx0 + 2;
        let mut out = Vec::with_capacity(schema.fields.len());
        for (col_idx, field) in schema.fields.iter().enumerate() {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            out.push(convert_cell(user_row, &field.name, field.data_type, cell)?);
        }
        rows.push(out);
    }

    Ok(DataSet::new(schema, rows))
}

fn infer_excel_column<'a, I>(cells: I) -> DataType
where
    I: Iterator<Item = &'a Data>,
{
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut all_ts = true;

    for c in cells {
        if matches!(c, Data::Empty) {
            continue;
        }
        any = true;
        all_int = all_int && cell_as_i64(c).is_some();
        all_float = all_float && cell_as_f64(c).is_some();
        all_bool = all_bool && matches!(c, Data::Bool(_));
        all_ts = all_ts && cell_as_timestamp(c).is_some();
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

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> ImportResult<Value> {
    if matches!(c, Data::Empty) {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| ImportError::Parse {
        row,
        column: column.to_string(),
        raw: c.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(cell_to_string(c))),
        DataType::Int64 => cell_as_i64(c)
            .map(Value::Int64)
            .ok_or_else(|| parse_err("expected integer")),
        DataType::Float64 => cell_as_f64(c)
            .map(Value::Float64)
            .ok_or_else(|| parse_err("expected number")),
        DataType::Bool => match c {
            Data::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(parse_err("expected bool")),
        },
        DataType::Timestamp => cell_as_timestamp(c)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_err("expected date/time")),
    }
}

fn cell_as_i64(c: &Data) -> Option<i64> {
    match c {
        Data::Int(i) => Some(*i),
        // xlsx stores all numbers as floats; whole-valued floats count as
        // integers for inference.
        Data::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Data::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn cell_as_f64(c: &Data) -> Option<f64> {
    match c {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn cell_as_timestamp(c: &Data) -> Option<NaiveDateTime> {
    match c {
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

/// Convert an Excel serial date (days since 1899-12-30) to a naive datetime.
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let secs = (serial.fract() * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(secs))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        _ => c.to_string(),
    }
}
