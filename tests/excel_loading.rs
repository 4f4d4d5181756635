#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::Workbook;

use tabular_import::ingestion::excel::load_excel_from_path;
use tabular_import::ingestion::{load_table_from_path, LoadOptions};
use tabular_import::types::{DataType, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-import-{name}-{nanos}.xlsx"))
}

fn write_people_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();

    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "score").unwrap();
    ws.write_string(0, 3, "active").unwrap();

    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    ws.write_number(1, 2, 98.5).unwrap();
    ws.write_boolean(1, 3, true).unwrap();

    ws.write_number(2, 0, 2).unwrap();
    ws.write_string(2, 1, "Grace").unwrap();
    ws.write_number(2, 2, 87.25).unwrap();
    ws.write_boolean(2, 3, false).unwrap();

    wb.save(path).unwrap();
}

#[test]
fn load_excel_first_sheet_with_inferred_types() {
    let path = tmp_file("people");
    write_people_xlsx(&path);

    let ds = load_excel_from_path(&path, None).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Bool);
    assert_eq!(ds.rows[0][0], Value::Int64(1));
    assert_eq!(ds.rows[1][3], Value::Bool(false));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn named_sheet_selection() {
    let path = tmp_file("sheets");

    let mut wb = Workbook::new();
    let ws1 = wb.add_worksheet();
    ws1.set_name("First").unwrap();
    ws1.write_string(0, 0, "a").unwrap();
    ws1.write_number(1, 0, 1).unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Second").unwrap();
    ws2.write_string(0, 0, "b").unwrap();
    ws2.write_number(1, 0, 2).unwrap();
    wb.save(&path).unwrap();

    let ds = load_excel_from_path(&path, Some("Second")).unwrap();
    let names: Vec<&str> = ds.schema.field_names().collect();
    assert_eq!(names, vec!["b"]);
    assert_eq!(ds.rows[0][0], Value::Int64(2));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn leading_blank_rows_are_skipped_before_header() {
    let path = tmp_file("offset");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    // Header on row 3 (0-based row 2), nothing above it.
    ws.write_string(2, 0, "id").unwrap();
    ws.write_string(2, 1, "name").unwrap();
    ws.write_number(3, 0, 1).unwrap();
    ws.write_string(3, 1, "Ada").unwrap();
    wb.save(&path).unwrap();

    let ds = load_excel_from_path(&path, None).unwrap();
    let names: Vec<&str> = ds.schema.field_names().collect();
    assert_eq!(names, vec!["id", "name"]);
    assert_eq!(ds.row_count(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_excel_via_unified_with_sheet_option() {
    let path = tmp_file("unified");
    write_people_xlsx(&path);

    let opts = LoadOptions {
        sheet: Some("Sheet1".to_string()),
        ..Default::default()
    };
    let ds = load_table_from_path(&path, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][1], Value::Utf8("Ada".to_string()));

    let _ = std::fs::remove_file(&path);
}
