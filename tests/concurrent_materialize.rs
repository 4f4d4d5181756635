use std::sync::Arc;

use tabular_import::ingestion::csv::load_csv_from_str;
use tabular_import::store::TableStore;
use tabular_import::ImportError;

#[test]
fn racing_materializations_produce_one_table_and_one_duplicate_error() {
    let store = Arc::new(TableStore::open_in_memory().unwrap());

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let ds =
                    load_csv_from_str(&format!("n\n{i}\n"), None).unwrap();
                store.materialize("contested", &ds)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let oks = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(oks, 1);
    for r in &results {
        if let Err(e) = r {
            assert!(matches!(e, ImportError::DuplicateName { .. }), "{e}");
        }
    }

    // Exactly one winner, fully materialized.
    let record = store.get_record("contested").unwrap();
    assert_eq!(record.row_count, 1);
    assert_eq!(store.read_page("contested", 1).unwrap().total_rows, 1);
    assert_eq!(store.list_records().unwrap().len(), 1);
}
