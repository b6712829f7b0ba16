mod common;

use academy_contracts::{
    ApplicantRecord, ContractAssembler, FileSink, OverrideStore, RenderOptions,
};
use common::page_content;

fn blob_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("contract_overrides.json")
}

#[test]
fn file_sink_round_trips_points() {
    let dir = tempfile::tempdir().unwrap();
    let store = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
    store.set("first_name", 120.5, 200.0);
    store.set("amount", 355.0, 360.0);

    let point = store.get("first_name").unwrap();
    assert_eq!(point.x, 120.5);
    assert_eq!(point.y, 200.0);
    assert!(blob_path(&dir).exists());
}

#[test]
fn overrides_survive_a_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
        store.set("folio", 440.0, 58.0);
    }
    let reopened = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
    let point = reopened.get("folio").unwrap();
    assert_eq!(point.x, 440.0);
    assert_eq!(point.y, 58.0);
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
    assert!(store.get("first_name").is_none());
}

#[test]
fn corrupt_file_loads_empty_and_recovers() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(blob_path(&dir), "{\"first_name\": \"oops\"").unwrap();
    let store = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
    assert!(store.get("first_name").is_none());
    store.set("first_name", 1.0, 2.0);
    assert!(store.get("first_name").is_some());
}

#[test]
fn unknown_keys_are_kept_but_inert() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        blob_path(&dir),
        r#"{"field_from_newer_tool": {"x": 9.0, "y": 9.0}}"#,
    )
    .unwrap();
    let store = OverrideStore::new(Box::new(FileSink::new(blob_path(&dir))));
    assert!(store.get("field_from_newer_tool").is_some());
    store.set("first_name", 5.0, 6.0);

    let blob = std::fs::read_to_string(blob_path(&dir)).unwrap();
    assert!(blob.contains("field_from_newer_tool"));
    assert!(blob.contains("first_name"));
}

#[test]
fn calibration_moves_the_rendered_field() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = ContractAssembler::with_store(OverrideStore::new(Box::new(FileSink::new(
        blob_path(&dir),
    ))));
    let record = ApplicantRecord::sample();
    let options = RenderOptions::default();

    let before = assembler.assemble(&record, &options).unwrap();
    assert!(!page_content(&before.bytes, 1).contains("200.00"));

    assembler.calibrate("first_name", 200.0, 300.0);
    let after = assembler.assemble(&record, &options).unwrap();
    assert!(page_content(&after.bytes, 1).contains("200.00"));
}

#[test]
fn reset_restores_built_in_anchors() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = ContractAssembler::with_store(OverrideStore::new(Box::new(FileSink::new(
        blob_path(&dir),
    ))));
    assembler.calibrate("first_name", 200.0, 300.0);
    assembler.reset_calibration();

    let record = ApplicantRecord::sample();
    let output = assembler
        .assemble(&record, &RenderOptions::default())
        .unwrap();
    assert!(!page_content(&output.bytes, 1).contains("200.00"));
    assert!(assembler.overrides().get("first_name").is_none());
}
