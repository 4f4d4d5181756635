use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tabular_import::ingestion::{load_table_from_path, LoadOptions, TableFormat, MAX_UPLOAD_BYTES};
use tabular_import::types::Value;
use tabular_import::ImportError;

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-import-{name}-{nanos}.{ext}"))
}

#[test]
fn unknown_extension_is_rejected_before_reading() {
    // The file does not even exist; detection fails on the name alone.
    let err = load_table_from_path("report.pdf", &LoadOptions::default()).unwrap_err();
    match err {
        ImportError::InvalidInput { message } => assert!(message.contains("pdf")),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn missing_extension_is_rejected() {
    let err = load_table_from_path("report", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::InvalidInput { .. }));
}

#[test]
fn oversize_file_is_rejected_from_metadata() {
    let path = tmp_file("huge", "csv");
    // A sparse 15 MiB file; the size check must fire without reading it.
    let f = std::fs::File::create(&path).unwrap();
    f.set_len(15 * 1024 * 1024).unwrap();
    drop(f);

    let err = load_table_from_path(&path, &LoadOptions::default()).unwrap_err();
    match err {
        ImportError::InvalidInput { message } => {
            assert!(message.contains("too large"));
            assert!(message.contains(&MAX_UPLOAD_BYTES.to_string()));
        }
        other => panic!("expected invalid input, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn format_override_beats_extension() {
    // CSV content saved with a misleading .json extension.
    let path = tmp_file("mislabeled", "json");
    std::fs::write(&path, "id,name\n1,Ada\n").unwrap();

    let opts = LoadOptions {
        format: Some(TableFormat::Csv),
        ..Default::default()
    };
    let ds = load_table_from_path(&path, &opts).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0][1], Value::Utf8("Ada".to_string()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_table_from_path(tmp_file("nope", "csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}
