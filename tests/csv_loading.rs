use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tabular_import::ingestion::csv::load_csv_from_path;
use tabular_import::ingestion::{load_table_from_path, LoadOptions};
use tabular_import::types::{DataType, Value};

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-import-{name}-{nanos}.{ext}"))
}

#[test]
fn load_csv_from_path_infers_types() {
    let path = tmp_file("people", "csv");
    std::fs::write(&path, "id,name,score,active\n1,Ada,98.5,true\n2,Grace,87.25,false\n").unwrap();

    let ds = load_csv_from_path(&path, None).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Bool);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn semicolon_delimiter_is_detected() {
    let path = tmp_file("semicolon", "csv");
    std::fs::write(&path, "id;name;score\n1;Ada;98,5\n2;Grace;87,25\n").unwrap();

    let ds = load_csv_from_path(&path, None).unwrap();
    assert_eq!(ds.schema.fields.len(), 3);
    assert_eq!(ds.rows[1][1], Value::Utf8("Grace".to_string()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn delimiter_override_wins_over_detection() {
    let path = tmp_file("override", "csv");
    std::fs::write(&path, "a|b\n1|2\n").unwrap();

    let ds = load_csv_from_path(&path, Some(b'|')).unwrap();
    assert_eq!(ds.schema.fields.len(), 2);
    assert_eq!(ds.rows[0][1], Value::Int64(2));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn windows_1252_bytes_are_decoded() {
    let path = tmp_file("latin", "csv");
    // "café" in windows-1252; 0xe9 is not valid UTF-8.
    std::fs::write(&path, b"name\ncaf\xe9\n").unwrap();

    let ds = load_csv_from_path(&path, None).unwrap();
    assert_eq!(ds.rows[0][0], Value::Utf8("caf\u{e9}".to_string()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn utf8_bom_is_stripped() {
    let path = tmp_file("bom", "csv");
    std::fs::write(&path, b"\xef\xbb\xbfid,name\n1,Ada\n").unwrap();

    let ds = load_csv_from_path(&path, None).unwrap();
    let names: Vec<&str> = ds.schema.field_names().collect();
    assert_eq!(names, vec!["id", "name"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_cells_become_nulls_without_breaking_inference() {
    let path = tmp_file("nulls", "csv");
    std::fs::write(&path, "id,score\n1,\n2,3.5\n").unwrap();

    let ds = load_csv_from_path(&path, None).unwrap();
    assert_eq!(ds.schema.fields[1].data_type, DataType::Float64);
    assert_eq!(ds.rows[0][1], Value::Null);
    assert_eq!(ds.rows[1][1], Value::Float64(3.5));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn date_columns_become_timestamps() {
    let path = tmp_file("dates", "csv");
    std::fs::write(
        &path,
        "name,hired\nAda,2023-01-15\nGrace,2024-06-30\n",
    )
    .unwrap();

    let ds = load_table_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(ds.schema.fields[1].data_type, DataType::Timestamp);
    match &ds.rows[0][1] {
        Value::Timestamp(dt) => assert_eq!(dt.to_string(), "2023-01-15 00:00:00"),
        other => panic!("expected timestamp, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}
