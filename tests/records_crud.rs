use chrono::NaiveDate;

use tabular_import::store::{NewPerson, NewProject, TableStore};
use tabular_import::ImportError;

fn ada() -> NewPerson {
    NewPerson {
        name: "Ada Lovelace".to_string(),
        job_title: "Analyst".to_string(),
        birthday: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
    }
}

fn bridge() -> NewProject {
    NewProject {
        name: "Bridge".to_string(),
        address: "1 River Rd".to_string(),
        contractor: "Acme".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
    }
}

#[test]
fn person_crud_roundtrip() {
    let store = TableStore::open_in_memory().unwrap();

    let created = store.create_person(&ada()).unwrap();
    assert!(created.id > 0);

    let fetched = store.get_person(created.id).unwrap();
    assert_eq!(fetched, created);

    let mut updated = fetched.clone();
    updated.job_title = "Mathematician".to_string();
    store.update_person(&updated).unwrap();
    assert_eq!(store.get_person(created.id).unwrap().job_title, "Mathematician");

    assert!(store.delete_person(created.id).unwrap());
    assert!(!store.delete_person(created.id).unwrap());
    assert!(matches!(
        store.get_person(created.id),
        Err(ImportError::NotFound { .. })
    ));
}

#[test]
fn duplicate_person_name_is_rejected() {
    let store = TableStore::open_in_memory().unwrap();
    store.create_person(&ada()).unwrap();

    let mut dup = ada();
    dup.job_title = "Different Title".to_string();
    let err = store.create_person(&dup).unwrap_err();
    assert!(matches!(err, ImportError::DuplicateName { .. }));
}

#[test]
fn persons_list_in_id_order() {
    let store = TableStore::open_in_memory().unwrap();
    store.create_person(&ada()).unwrap();
    store
        .create_person(&NewPerson {
            name: "Grace Hopper".to_string(),
            job_title: "Rear Admiral".to_string(),
            birthday: NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
        })
        .unwrap();

    let all = store.list_persons().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].id < all[1].id);
    assert_eq!(all[1].name, "Grace Hopper");
}

#[test]
fn update_missing_person_is_not_found() {
    let store = TableStore::open_in_memory().unwrap();
    let mut ghost = store.create_person(&ada()).unwrap();
    store.delete_person(ghost.id).unwrap();

    ghost.name = "Nobody".to_string();
    assert!(matches!(
        store.update_person(&ghost),
        Err(ImportError::NotFound { .. })
    ));
}

#[test]
fn project_crud_roundtrip() {
    let store = TableStore::open_in_memory().unwrap();

    let created = store.create_project(&bridge()).unwrap();
    let fetched = store.get_project(created.id).unwrap();
    assert_eq!(fetched, created);

    let mut updated = fetched.clone();
    updated.end_date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    store.update_project(&updated).unwrap();
    assert_eq!(store.get_project(created.id).unwrap().end_date, updated.end_date);

    assert!(store.delete_project(created.id).unwrap());
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn duplicate_project_fields_are_rejected() {
    let store = TableStore::open_in_memory().unwrap();
    store.create_project(&bridge()).unwrap();

    // Same contractor, everything else distinct.
    let mut dup = bridge();
    dup.name = "Tunnel".to_string();
    dup.address = "2 Hill St".to_string();
    let err = store.create_project(&dup).unwrap_err();
    assert!(matches!(err, ImportError::DuplicateName { .. }));
}
