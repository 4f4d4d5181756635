//! Feather loading (Arrow IPC file format).
//!
//! The arrow schema is folded onto the crate's five logical types; record
//! batches are converted column-wise by casting each column to the target
//! arrow type once, then pulling typed values out row by row. Arrow types
//! without a bucket of their own are rendered as text.

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType as ArrowType, TimeUnit};
use arrow::ipc::reader::FileReader;
use arrow::util::display::array_value_to_string;
use chrono::DateTime;

use crate::error::{ImportError, ImportResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load a Feather file into a typed [`DataSet`].
pub fn load_feather_from_path(path: impl AsRef<Path>) -> ImportResult<DataSet> {
    let file = File::open(path)?;
    let reader = FileReader::try_new(file, None)?;

    let arrow_schema = reader.schema();
    let fields: Vec<Field> = arrow_schema
        .fields()
        .iter()
        .map(|f| Field::new(f.name().clone(), map_arrow_type(f.data_type())))
        .collect();
    let schema = Schema::new(fields);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns: Vec<ColumnValues> = batch
            .columns()
            .iter()
            .zip(schema.fields.iter())
            .map(|(array, field)| ColumnValues::convert(array, field.data_type))
            .collect::<ImportResult<_>>()?;

        for i in 0..batch.num_rows() {
            rows.push(columns.iter().map(|c| c.value(i)).collect());
        }
    }

    Ok(DataSet::new(schema, rows))
}

fn map_arrow_type(t: &ArrowType) -> DataType {
    match t {
        ArrowType::Boolean => DataType::Bool,
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => DataType::Int64,
        ArrowType::Float16 | ArrowType::Float32 | ArrowType::Float64 => DataType::Float64,
        ArrowType::Timestamp(_, _) | ArrowType::Date32 | ArrowType::Date64 => DataType::Timestamp,
        _ => DataType::Utf8,
    }
}

/// One batch column, cast to its target representation.
enum ColumnValues {
    Int64(Int64Array),
    Float64(Float64Array),
    Bool(BooleanArray),
    Timestamp(TimestampMicrosecondArray),
    Utf8(StringArray),
    /// Arrow types with no usable cast to Utf8 fall back to display
    /// formatting of the original array.
    Display(ArrayRef),
}

impl ColumnValues {
    fn convert(array: &ArrayRef, data_type: DataType) -> ImportResult<Self> {
        let out = match data_type {
            DataType::Int64 => Self::Int64(
                cast(array, &ArrowType::Int64)?
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .ok_or_else(|| ImportError::invalid("int64 cast produced unexpected array"))?
                    .clone(),
            ),
            DataType::Float64 => Self::Float64(
                cast(array, &ArrowType::Float64)?
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| ImportError::invalid("float64 cast produced unexpected array"))?
                    .clone(),
            ),
            DataType::Bool => Self::Bool(
                cast(array, &ArrowType::Boolean)?
                    .as_any()
                    .downcast_ref::<BooleanArray>()
                    .ok_or_else(|| ImportError::invalid("bool cast produced unexpected array"))?
                    .clone(),
            ),
            DataType::Timestamp => Self::Timestamp(
                cast(array, &ArrowType::Timestamp(TimeUnit::Microsecond, None))?
                    .as_any()
                    .downcast_ref::<TimestampMicrosecondArray>()
                    .ok_or_else(|| {
                        ImportError::invalid("timestamp cast produced unexpected array")
                    })?
                    .clone(),
            ),
            DataType::Utf8 => match cast(array, &ArrowType::Utf8) {
                Ok(strings) => Self::Utf8(
                    strings
                        .as_any()
                        .downcast_ref::<StringArray>()
                        .ok_or_else(|| {
                            ImportError::invalid("utf8 cast produced unexpected array")
                        })?
                        .clone(),
                ),
                Err(_) => Self::Display(array.clone()),
            },
        };
        Ok(out)
    }

    fn value(&self, i: usize) -> Value {
        match self {
            Self::Int64(a) if a.is_null(i) => Value::Null,
            Self::Int64(a) => Value::Int64(a.value(i)),
            Self::Float64(a) if a.is_null(i) => Value::Null,
            Self::Float64(a) => Value::Float64(a.value(i)),
            Self::Bool(a) if a.is_null(i) => Value::Null,
            Self::Bool(a) => Value::Bool(a.value(i)),
            Self::Timestamp(a) if a.is_null(i) => Value::Null,
            Self::Timestamp(a) => DateTime::from_timestamp_micros(a.value(i))
                .map(|dt| Value::Timestamp(dt.naive_utc()))
                .unwrap_or(Value::Null),
            Self::Utf8(a) if a.is_null(i) => Value::Null,
            Self::Utf8(a) => Value::Utf8(a.value(i).to_string()),
            Self::Display(a) if a.is_null(i) => Value::Null,
            Self::Display(a) => Value::Utf8(array_value_to_string(a, i).unwrap_or_default()),
        }
    }
}
