//! Core data model types for the import pipeline.
//!
//! Ingestion loads supported formats into an in-memory [`DataSet`], whose
//! [`Schema`] is inferred from the file contents (a list of typed [`Field`]s).
//! The store then maps each [`DataType`] onto one of five SQL column types.

use chrono::NaiveDateTime;

/// Logical data type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// Date/time without timezone.
    Timestamp,
    /// UTF-8 string. Catch-all for anything that is not one of the above.
    Utf8,
}

impl DataType {
    /// SQL column type for a materialized table.
    ///
    /// Exactly five buckets; precision and width distinctions do not
    /// survive the mapping.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Int64 => "INTEGER",
            Self::Float64 => "FLOAT",
            Self::Bool => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::Utf8 => "TEXT",
        }
    }

    /// Label recorded in the catalog's `columns_info`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Timestamp => "datetime",
            Self::Utf8 => "text",
        }
    }

    /// Inverse of [`DataType::label`], used when decoding stored rows.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "int64" => Some(Self::Int64),
            "float64" => Some(Self::Float64),
            "bool" => Some(Self::Bool),
            "datetime" => Some(Self::Timestamp),
            "text" => Some(Self::Utf8),
            _ => None,
        }
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Inferred field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of ingested data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// Date/time without timezone.
    Timestamp(NaiveDateTime),
    /// UTF-8 string.
    Utf8(String),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`]
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` rows, cloned. Used for pending-import previews.
    pub fn head(&self, n: usize) -> Vec<Vec<Value>> {
        self.rows.iter().take(n).cloned().collect()
    }
}
