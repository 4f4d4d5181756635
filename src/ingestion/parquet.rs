//! Parquet loading.
//!
//! The schema comes from the file's own leaf columns; physical and converted
//! types are folded onto the crate's five logical types. Rows are read
//! through the Parquet record API (`RowIter`).

use std::collections::HashMap;
use std::path::Path;

use chrono::DateTime;
use parquet::basic::{ConvertedType, Type as PhysicalType};
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field as PqField;
use parquet::schema::types::ColumnDescriptor;

use crate::error::{ImportError, ImportResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load a Parquet file into a typed [`DataSet`].
pub fn load_parquet_from_path(path: impl AsRef<Path>) -> ImportResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let fields: Vec<Field> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|col| Field::new(col.path().string(), map_column_type(col)))
        .collect();
    let schema = Schema::new(fields);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let mut by_name: HashMap<&str, &PqField> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            by_name.insert(name.as_str(), field);
        }

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for f in &schema.fields {
            let cell = by_name.get(f.name.as_str()).copied().unwrap_or(&PqField::Null);
            out_row.push(convert_parquet_field(row_num, &f.name, f.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema, rows))
}

fn map_column_type(col: &ColumnDescriptor) -> DataType {
    match col.converted_type() {
        ConvertedType::TIMESTAMP_MILLIS
        | ConvertedType::TIMESTAMP_MICROS
        | ConvertedType::DATE => return DataType::Timestamp,
        ConvertedType::UTF8 => return DataType::Utf8,
        _ => {}
    }

    match col.physical_type() {
        PhysicalType::BOOLEAN => DataType::Bool,
        PhysicalType::INT32 | PhysicalType::INT64 => DataType::Int64,
        PhysicalType::INT96 => DataType::Timestamp,
        PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
        PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => DataType::Utf8,
    }
}

fn convert_parquet_field(
    row: usize,
    column: &str,
    data_type: DataType,
    f: &PqField,
) -> ImportResult<Value> {
    if matches!(f, PqField::Null) {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| ImportError::Parse {
        row,
        column: column.to_string(),
        raw: f.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => match f {
            PqField::Str(s) => Ok(Value::Utf8(s.clone())),
            other => Ok(Value::Utf8(other.to_string())),
        },
        DataType::Bool => match f {
            PqField::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(parse_err("expected bool")),
        },
        DataType::Int64 => match f {
            PqField::Byte(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::Short(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::Int(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::Long(v) => Ok(Value::Int64(*v)),
            PqField::UByte(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::UShort(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::UInt(v) => Ok(Value::Int64(i64::from(*v))),
            PqField::ULong(v) => i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| parse_err("u64 out of range for i64")),
            _ => Err(parse_err("expected integer")),
        },
        DataType::Float64 => match f {
            PqField::Float(v) => Ok(Value::Float64(f64::from(*v))),
            PqField::Double(v) => Ok(Value::Float64(*v)),
            _ => Err(parse_err("expected number")),
        },
        DataType::Timestamp => match f {
            PqField::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
                .map(|dt| Value::Timestamp(dt.naive_utc()))
                .ok_or_else(|| parse_err("timestamp out of range")),
            PqField::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
                .map(|dt| Value::Timestamp(dt.naive_utc()))
                .ok_or_else(|| parse_err("timestamp out of range")),
            PqField::Date(days) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
                .map(|dt| Value::Timestamp(dt.naive_utc()))
                .ok_or_else(|| parse_err("date out of range")),
            _ => Err(parse_err("expected date/time")),
        },
    }
}
