use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType as ArrowType, Field as ArrowField, Schema as ArrowSchema, TimeUnit};
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;

use tabular_import::ingestion::feather::load_feather_from_path;
use tabular_import::ingestion::{load_table_from_path, LoadOptions};
use tabular_import::types::{DataType, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-import-{name}-{nanos}.feather"))
}

fn write_people_feather(path: &PathBuf) {
    let schema = Arc::new(ArrowSchema::new(vec![
        ArrowField::new("id", ArrowType::Int32, false),
        ArrowField::new("name", ArrowType::Utf8, false),
        ArrowField::new("score", ArrowType::Float64, true),
        ArrowField::new("active", ArrowType::Boolean, false),
        ArrowField::new(
            "hired",
            ArrowType::Timestamp(TimeUnit::Second, None),
            false,
        ),
    ]));

    // 2024-01-01T00:00:00Z and 2024-06-30T12:00:00Z.
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2])),
        Arc::new(StringArray::from(vec!["Ada", "Grace"])),
        Arc::new(Float64Array::from(vec![Some(98.5), None])),
        Arc::new(BooleanArray::from(vec![true, false])),
        Arc::new(TimestampSecondArray::from(vec![
            1_704_067_200_i64,
            1_719_748_800_i64,
        ])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = File::create(path).unwrap();
    let mut writer = FileWriter::try_new(file, &schema).unwrap();
    writer.write(&batch).unwrap();
    writer.finish().unwrap();
}

#[test]
fn load_feather_maps_arrow_schema() {
    let path = tmp_file("people");
    write_people_feather(&path);

    let ds = load_feather_from_path(&path).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Bool);
    assert_eq!(ds.schema.fields[4].data_type, DataType::Timestamp);

    assert_eq!(ds.rows[0][0], Value::Int64(1));
    assert_eq!(ds.rows[1][1], Value::Utf8("Grace".to_string()));
    // Null float cell survives the cast.
    assert_eq!(ds.rows[1][2], Value::Null);
    match &ds.rows[0][4] {
        Value::Timestamp(dt) => assert_eq!(dt.to_string(), "2024-01-01 00:00:00"),
        other => panic!("expected timestamp, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_feather_via_unified_by_extension() {
    let path = tmp_file("unified");
    write_people_feather(&path);

    let ds = load_table_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 2);

    let _ = std::fs::remove_file(&path);
}
